// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   UI Layer (App)    │
//! └──────────┬──────────┘
//!            │ enumerate / source element
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│
//! └──────────┬──────────┘
//!       ┌────┴─────┐
//!       ▼          ▼
//!  ┌────────┐  ┌──────┐
//!  │PipeWire│  │ V4L2 │
//!  └────────┘  └──────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    ScanPipeline     │  ← GStreamer, RGBA frames over a channel
//! └─────────────────────┘
//! ```
//!
//! Backends only discover devices and describe how to open them; frame
//! capture is shared in [`pipeline::ScanPipeline`].

pub mod pipeline;
pub mod pipewire;
pub mod types;
pub mod v4l2;

pub use pipeline::ScanPipeline;
pub use types::*;

/// Camera discovery interface implemented by each backend
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Get supported formats for a specific camera device
    fn get_formats(&self, device: &CameraDevice) -> Vec<CameraFormat>;

    /// Check if this backend is available on the current system
    fn is_available(&self) -> bool;

    /// Get the backend type identifier
    fn backend_type(&self) -> CameraBackendType;

    /// GStreamer source element description for `device`
    ///
    /// The returned string is the first element of a `gst_parse_launch`
    /// description, e.g. `v4l2src device=/dev/video0`.
    fn source_element(&self, device: &CameraDevice) -> String;
}

/// Get a concrete backend instance
pub fn get_backend(backend_type: CameraBackendType) -> Box<dyn CameraBackend> {
    match backend_type {
        CameraBackendType::PipeWire => Box::new(pipewire::PipeWireBackend::new()),
        CameraBackendType::V4l2 => Box::new(v4l2::V4l2Backend::new()),
    }
}

/// Pick the camera to open: the remembered path when it's still present, else the first one
pub fn select_camera(cameras: &[CameraDevice], last_path: Option<&str>) -> Option<usize> {
    if cameras.is_empty() {
        return None;
    }
    last_path
        .and_then(|path| cameras.iter().position(|c| c.path == path))
        .or(Some(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(path: &str) -> CameraDevice {
        CameraDevice {
            name: path.to_string(),
            path: path.to_string(),
            driver: None,
            v4l2_path: None,
        }
    }

    #[test]
    fn test_select_camera_prefers_last_path() {
        let cameras = vec![camera("/dev/video0"), camera("/dev/video2")];
        assert_eq!(select_camera(&cameras, Some("/dev/video2")), Some(1));
        assert_eq!(select_camera(&cameras, Some("/dev/video9")), Some(0));
        assert_eq!(select_camera(&cameras, None), Some(0));
        assert_eq!(select_camera(&[], Some("/dev/video0")), None);
    }

    #[test]
    fn test_get_backend_type() {
        for backend_type in CameraBackendType::ALL {
            assert_eq!(get_backend(backend_type).backend_type(), backend_type);
        }
    }
}
