// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            App Layer / CLI                  │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                  │
//! │  ┌─────────────┐    ┌──────────────────┐    │
//! │  │  PipeWire   │    │      V4L2        │    │
//! │  └─────────────┘    └──────────────────┘    │
//! │          └────── ScanPipeline ──────┘       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod camera;
