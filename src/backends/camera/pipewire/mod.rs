// SPDX-License-Identifier: MPL-2.0

//! PipeWire camera backend
//!
//! This backend uses PipeWire for camera enumeration and capture. It's the
//! modern, recommended approach for Linux camera access and the only one that
//! works inside a sandbox once the camera portal granted access.

mod enumeration;

pub use enumeration::{enumerate_pipewire_cameras, is_pipewire_available, parse_pw_cli_nodes};

use super::CameraBackend;
use super::types::*;
use tracing::{debug, info};

/// PipeWire backend implementation
#[derive(Debug, Default)]
pub struct PipeWireBackend;

impl PipeWireBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for PipeWireBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        info!("Using PipeWire backend for camera enumeration");

        if let Some(cameras) = enumerate_pipewire_cameras() {
            info!(count = cameras.len(), "PipeWire cameras enumerated");
            cameras
        } else {
            info!("PipeWire enumeration returned None");
            Vec::new()
        }
    }

    fn get_formats(&self, device: &CameraDevice) -> Vec<CameraFormat> {
        // PipeWire negotiates the mode itself; report what the V4L2 node behind it offers
        match device.v4l2_path.as_deref() {
            Some(path) => super::v4l2::enumerate_formats(path),
            None => {
                debug!(device = %device.name, "No V4L2 node behind PipeWire camera");
                Vec::new()
            }
        }
    }

    fn is_available(&self) -> bool {
        is_pipewire_available()
    }

    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::PipeWire
    }

    fn source_element(&self, device: &CameraDevice) -> String {
        let path = device.path.as_str();
        if path.is_empty() {
            return "pipewiresrc".to_string();
        }
        if let Some(serial) = path.strip_prefix("pipewire-serial-") {
            return format!("pipewiresrc target-object={}", serial);
        }
        if let Some(node_id) = path.strip_prefix("pipewire-") {
            return format!("pipewiresrc target-object={}", node_id);
        }
        if path.starts_with("/dev/video") {
            return format!("pipewiresrc path=v4l2:{}", path);
        }
        format!("pipewiresrc path={}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(path: &str) -> CameraDevice {
        CameraDevice {
            name: "Camera".to_string(),
            path: path.to_string(),
            driver: None,
            v4l2_path: None,
        }
    }

    #[test]
    fn test_source_element() {
        let backend = PipeWireBackend::new();
        assert_eq!(backend.source_element(&device("")), "pipewiresrc");
        assert_eq!(
            backend.source_element(&device("pipewire-serial-2146")),
            "pipewiresrc target-object=2146"
        );
        assert_eq!(
            backend.source_element(&device("pipewire-76")),
            "pipewiresrc target-object=76"
        );
        assert_eq!(
            backend.source_element(&device("/dev/video0")),
            "pipewiresrc path=v4l2:/dev/video0"
        );
    }
}
