// SPDX-License-Identifier: GPL-3.0-only

//! Direct V4L2 camera backend
//!
//! Used outside of PipeWire sessions. Devices are discovered with the `v4l`
//! crate and opened with GStreamer's `v4l2src`.

use super::CameraBackend;
use super::types::*;
use tracing::{debug, info, warn};
use v4l::capability::Flags;
use v4l::framesize::FrameSizeEnum;
use v4l::frameinterval::FrameIntervalEnum;
use v4l::prelude::*;
use v4l::video::Capture;

/// V4L2 backend implementation
#[derive(Debug, Default)]
pub struct V4l2Backend;

impl V4l2Backend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for V4l2Backend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let mut cameras: Vec<CameraDevice> = v4l::context::enum_devices()
            .into_iter()
            .filter_map(|node| {
                let path = node.path().to_string_lossy().to_string();
                let info = query_device(&path)?;
                if !info.capture {
                    // Metadata nodes share the card name with the real capture node
                    debug!(path = %path, "Skipping non-capture V4L2 node");
                    return None;
                }
                Some(CameraDevice {
                    name: info.card,
                    path: path.clone(),
                    driver: Some(info.driver),
                    v4l2_path: Some(path),
                })
            })
            .collect();

        cameras.sort_by(|a, b| a.path.cmp(&b.path));
        info!(count = cameras.len(), "V4L2 cameras enumerated");
        cameras
    }

    fn get_formats(&self, device: &CameraDevice) -> Vec<CameraFormat> {
        match device.v4l2_path.as_deref() {
            Some(path) => enumerate_formats(path),
            None => Vec::new(),
        }
    }

    fn is_available(&self) -> bool {
        !v4l::context::enum_devices().is_empty()
    }

    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::V4l2
    }

    fn source_element(&self, device: &CameraDevice) -> String {
        if device.is_default() {
            "v4l2src".to_string()
        } else {
            format!("v4l2src device={}", device.path)
        }
    }
}

/// Capability summary of a V4L2 node
#[derive(Debug, Clone)]
pub struct V4l2DeviceInfo {
    pub card: String,
    pub driver: String,
    pub capture: bool,
}

/// Query card, driver and capture capability of a V4L2 node
pub fn query_device(path: &str) -> Option<V4l2DeviceInfo> {
    let dev = match Device::with_path(path) {
        Ok(dev) => dev,
        Err(e) => {
            debug!(path, error = %e, "Failed to open V4L2 device");
            return None;
        }
    };
    let caps = match dev.query_caps() {
        Ok(caps) => caps,
        Err(e) => {
            warn!(path, error = %e, "VIDIOC_QUERYCAP failed");
            return None;
        }
    };

    Some(V4l2DeviceInfo {
        card: caps.card,
        driver: caps.driver,
        capture: caps.capabilities.contains(Flags::VIDEO_CAPTURE),
    })
}

/// List discrete capture modes of a V4L2 node
///
/// Stepwise ranges are reported by their maximum size only.
pub fn enumerate_formats(path: &str) -> Vec<CameraFormat> {
    let Ok(dev) = Device::with_path(path) else {
        return Vec::new();
    };
    let Ok(descriptions) = dev.enum_formats() else {
        return Vec::new();
    };

    let mut formats = Vec::new();
    for desc in descriptions {
        let pixel_format = desc.fourcc.str().unwrap_or("????").to_string();
        let Ok(sizes) = dev.enum_framesizes(desc.fourcc) else {
            continue;
        };

        for size in sizes {
            let (width, height) = match size.size {
                FrameSizeEnum::Discrete(d) => (d.width, d.height),
                FrameSizeEnum::Stepwise(s) => (s.max_width, s.max_height),
            };

            let intervals = dev
                .enum_frameintervals(desc.fourcc, width, height)
                .unwrap_or_default();
            let mut rates: Vec<Framerate> = intervals
                .iter()
                .filter_map(|i| match i.interval {
                    // Intervals are seconds per frame; invert for fps
                    FrameIntervalEnum::Discrete(frac) if frac.numerator > 0 => {
                        Some(Framerate::new(frac.denominator, frac.numerator))
                    }
                    _ => None,
                })
                .collect();

            if rates.is_empty() {
                formats.push(CameraFormat {
                    width,
                    height,
                    framerate: None,
                    pixel_format: pixel_format.clone(),
                });
                continue;
            }

            rates.dedup();
            formats.extend(rates.into_iter().map(|fps| CameraFormat {
                width,
                height,
                framerate: Some(fps),
                pixel_format: pixel_format.clone(),
            }));
        }
    }

    debug!(path, count = formats.len(), "Enumerated V4L2 formats");
    formats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_element() {
        let backend = V4l2Backend::new();
        let device = CameraDevice {
            name: "Webcam".to_string(),
            path: "/dev/video2".to_string(),
            driver: Some("uvcvideo".to_string()),
            v4l2_path: Some("/dev/video2".to_string()),
        };
        assert_eq!(backend.source_element(&device), "v4l2src device=/dev/video2");

        let default = CameraDevice {
            path: String::new(),
            ..device
        };
        assert_eq!(backend.source_element(&default), "v4l2src");
    }

    #[test]
    fn test_query_missing_device() {
        assert!(query_device("/nonexistent/video0").is_none());
        assert!(enumerate_formats("/nonexistent/video0").is_empty());
    }
}
