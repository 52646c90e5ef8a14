// SPDX-License-Identifier: GPL-3.0-only

//! QR code scanning
//!
//! - [`QrDetector`]: decodes codes in camera frames with `rqrr`
//! - [`ScanGate`]: paces sampling and filters repeated results
//! - [`decode_image`]: decodes codes in an image file

mod detector;
mod gate;
pub mod types;

pub use detector::{QrDetector, decode_image};
pub use gate::ScanGate;
pub use types::{FrameRegion, ScanResult};
