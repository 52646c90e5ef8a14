// SPDX-License-Identifier: MPL-2.0

//! QR Scanner - A QR code scanner for the COSMIC desktop environment
//!
//! This library provides the core functionality for the QR Scanner application:
//! camera access, code detection, and handing decoded links and email
//! addresses to other applications.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Main application logic and UI
//! - [`backends`]: Camera discovery and the capture pipeline
//! - [`scanner`]: Frame sampling and QR decoding
//! - [`actions`]: Payload classification, browser and mail client dispatch
//! - [`permission`]: Camera access through the desktop portal
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // qr-scanner
//! ```

pub mod actions;
pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod permission;
pub mod scanner;

// Re-export commonly used types
pub use actions::{EmailTemplate, ScanContent, SystemLauncher, UriLauncher};
pub use app::{AppModel, Message};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use scanner::{QrDetector, ScanResult};
