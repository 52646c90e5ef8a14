// SPDX-License-Identifier: GPL-3.0-only

//! Devices, formats and frames shared by the camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Camera backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CameraBackendType {
    /// PipeWire backend (modern Linux standard, required inside Flatpak)
    #[default]
    PipeWire,
    /// Direct V4L2 device access
    V4l2,
}

impl CameraBackendType {
    /// All variants in settings order
    pub const ALL: [CameraBackendType; 2] = [CameraBackendType::PipeWire, CameraBackendType::V4l2];
}

impl std::fmt::Display for CameraBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraBackendType::PipeWire => write!(f, "PipeWire"),
            CameraBackendType::V4l2 => write!(f, "V4L2"),
        }
    }
}

/// A camera as listed by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human readable name shown in the camera dropdown
    pub name: String,
    /// Backend specific address:
    /// `pipewire-serial-<serial>`, `pipewire-<node id>`, `/dev/videoN`,
    /// or empty to let the backend pick its default camera
    pub path: String,
    /// Kernel driver name, when known
    pub driver: Option<String>,
    /// Underlying `/dev/videoN` node, when known
    pub v4l2_path: Option<String>,
}

impl CameraDevice {
    /// Whether this entry stands for "whatever the backend picks"
    pub fn is_default(&self) -> bool {
        self.path.is_empty()
    }
}

/// Framerate as a fraction (numerator/denominator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Framerate {
    pub num: u32,
    pub denom: u32,
}

impl Framerate {
    /// A zero denominator is treated as 1
    pub fn new(num: u32, denom: u32) -> Self {
        Self {
            num,
            denom: if denom == 0 { 1 } else { denom },
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

impl std::fmt::Display for Framerate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.denom != 1 {
            write!(f, "{:.2}", self.as_f64())
        } else {
            write!(f, "{}", self.num)
        }
    }
}

/// A capture mode advertised by a camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    /// None when the device doesn't report discrete intervals
    pub framerate: Option<Framerate>,
    /// FourCC or GStreamer format name (e.g. "MJPG", "YUYV")
    pub pixel_format: String,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)?;
        if let Some(fps) = self.framerate {
            write!(f, " @ {}fps", fps)?;
        }
        write!(f, " ({})", self.pixel_format)
    }
}

/// Pixel format for camera frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8 bits per channel, alpha last
    RGBA,
    /// Single 8-bit luma channel
    Gray8,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::RGBA => 4,
            Self::Gray8 => 1,
        }
    }

    /// Map a GStreamer `format` caps field
    pub fn from_gst_format(format: &str) -> Option<Self> {
        match format {
            "RGBA" | "RGBx" => Some(Self::RGBA),
            "GRAY8" => Some(Self::Gray8),
            _ => None,
        }
    }
}

/// One captured frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Pixel data, `stride` bytes per row
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
    /// Row stride (bytes per row, may include padding)
    pub stride: u32,
    /// When the appsink received the sample
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap tightly packed pixel data
    pub fn packed(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width * format.bytes_per_pixel() as u32,
            data: Arc::from(data),
            format,
            captured_at: Instant::now(),
        }
    }

    /// Luma of the pixel at (x, y), 0 for out-of-range reads
    ///
    /// Uses the integer BT.601 approximation.
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        let bpp = self.format.bytes_per_pixel();
        let offset = y * self.stride as usize + x * bpp;
        match self.format {
            PixelFormat::Gray8 => self.data.get(offset).copied().unwrap_or(0),
            PixelFormat::RGBA => match self.data.get(offset..offset + 3) {
                Some(&[r, g, b]) => {
                    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
                }
                _ => 0,
            },
        }
    }
}

/// Sending end handed to [`super::ScanPipeline`]
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised while building or starting a capture pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// GStreamer could not be initialized or the description didn't parse
    Gstreamer(String),
    /// The pipeline was built but refused to start
    StartFailed(String),
    /// The pipeline is missing an element it needs
    MissingElement(&'static str),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Gstreamer(msg) => write!(f, "GStreamer error: {}", msg),
            BackendError::StartFailed(msg) => write!(f, "Pipeline did not start: {}", msg),
            BackendError::MissingElement(name) => write!(f, "Pipeline has no {} element", name),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<gstreamer::glib::Error> for BackendError {
    fn from(err: gstreamer::glib::Error) -> Self {
        BackendError::Gstreamer(err.to_string())
    }
}

impl From<BackendError> for crate::errors::CameraError {
    fn from(err: BackendError) -> Self {
        crate::errors::CameraError::PipelineFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma() {
        let frame = CameraFrame::packed(
            2,
            1,
            PixelFormat::RGBA,
            vec![0, 0, 0, 255, 255, 255, 255, 255],
        );
        assert_eq!(frame.luma(0, 0), 0);
        assert_eq!(frame.luma(1, 0), 255);
        // Out of range reads are black
        assert_eq!(frame.luma(5, 5), 0);
    }

    #[test]
    fn test_framerate_display() {
        assert_eq!(Framerate::new(30, 1).to_string(), "30");
        assert_eq!(Framerate::new(60000, 1001).to_string(), "59.94");
        assert_eq!(Framerate::new(15, 0).denom, 1);
    }

    #[test]
    fn test_format_display() {
        let format = CameraFormat {
            width: 1280,
            height: 720,
            framerate: Some(Framerate::new(30, 1)),
            pixel_format: "MJPG".to_string(),
        };
        assert_eq!(format.to_string(), "1280x720 @ 30fps (MJPG)");

        let format = CameraFormat {
            framerate: None,
            ..format
        };
        assert_eq!(format.to_string(), "1280x720 (MJPG)");
    }
}
