// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection
//!
//! Frames are converted to grayscale, downscaled and handed to `rqrr`.
//! Positions are reported normalized to the original frame so the overlay
//! can draw them at any display size.

use super::types::{FrameRegion, ScanResult};
use crate::backends::camera::types::{CameraFrame, PixelFormat};
use crate::constants::scan;
use crate::errors::DecodeError;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// QR code detector
///
/// Analyzes camera frames to detect and decode QR codes.
#[derive(Debug, Clone, Copy)]
pub struct QrDetector {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    /// Create a new QR detector with default settings
    pub fn new() -> Self {
        Self {
            max_dimension: scan::MAX_DECODE_DIMENSION,
        }
    }

    /// Create a QR detector with custom max dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }

    /// Detect QR codes in a camera frame
    ///
    /// Runs on the blocking pool; a panicking decoder yields no results.
    pub async fn detect(&self, frame: Arc<CameraFrame>) -> Vec<ScanResult> {
        let detector = *self;
        tokio::task::spawn_blocking(move || detector.detect_sync(&frame))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "QR detection task panicked");
                Vec::new()
            })
    }

    /// Synchronous detection, for callers already off the UI thread
    pub fn detect_sync(&self, frame: &CameraFrame) -> Vec<ScanResult> {
        let start = std::time::Instant::now();
        let width = frame.width;
        let height = frame.height;
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let (proc_width, proc_height) = scaled_size(width, height, self.max_dimension);
        let gray = to_grayscale(frame, proc_width, proc_height);
        let scale_x = width as f32 / proc_width as f32;
        let scale_y = height as f32 / proc_height as f32;

        let pw = proc_width as usize;
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(pw, proc_height as usize, |x, y| {
                gray[y * pw + x]
            });
        let grids = prepared.detect_grids();
        trace!(
            proc_width,
            proc_height,
            grids = grids.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Grid detection complete"
        );

        let mut results = Vec::with_capacity(grids.len());
        for grid in grids {
            let text = match grid.decode() {
                Ok((_meta, text)) => text,
                Err(e) => {
                    debug!(error = ?e, "Failed to decode QR code");
                    continue;
                }
            };

            let corners: Vec<(f32, f32)> = grid
                .bounds
                .iter()
                .map(|p| (p.x as f32 * scale_x, p.y as f32 * scale_y))
                .collect();
            let region = FrameRegion::from_corners(&corners, width, height);

            debug!(
                content = %text,
                x = region.x,
                y = region.y,
                width = region.width,
                height = region.height,
                "Detected QR code"
            );
            results.push(ScanResult::new(text, region));
        }

        if !results.is_empty() {
            debug!(
                count = results.len(),
                total_ms = start.elapsed().as_millis(),
                "QR detection found codes"
            );
        }
        results
    }
}

/// Decode every QR code in an image file
pub fn decode_image(path: &Path) -> Result<Vec<ScanResult>, DecodeError> {
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    let frame = CameraFrame::packed(width, height, PixelFormat::RGBA, image.into_raw());

    // Stills are decoded at full resolution up to a sane cap
    let detector = QrDetector::with_max_dimension(scan::MAX_DECODE_DIMENSION * 4);
    let results = detector.detect_sync(&frame);
    if results.is_empty() {
        return Err(DecodeError::NoCodeFound);
    }
    Ok(results)
}

/// Fit `width` x `height` inside `max_dimension`, keeping aspect ratio
fn scaled_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }
    let scale = (width as f32 / max_dimension as f32).max(height as f32 / max_dimension as f32);
    (
        ((width as f32 / scale) as u32).max(1),
        ((height as f32 / scale) as u32).max(1),
    )
}

/// Convert a frame to tightly packed grayscale using bilinear interpolation
fn to_grayscale(frame: &CameraFrame, dst_width: u32, dst_height: u32) -> Vec<u8> {
    let src_width = frame.width as usize;
    let src_height = frame.height as usize;
    let mut result = Vec::with_capacity((dst_width * dst_height) as usize);

    if dst_width as usize == src_width && dst_height as usize == src_height {
        for y in 0..src_height {
            for x in 0..src_width {
                result.push(frame.luma(x, y));
            }
        }
        return result;
    }

    let x_ratio = src_width as f32 / dst_width as f32;
    let y_ratio = src_height as f32 / dst_height as f32;

    for y in 0..dst_height {
        for x in 0..dst_width {
            let src_x = x as f32 * x_ratio;
            let src_y = y as f32 * y_ratio;

            let x0 = src_x as usize;
            let y0 = src_y as usize;
            let x1 = (x0 + 1).min(src_width - 1);
            let y1 = (y0 + 1).min(src_height - 1);

            let x_frac = src_x - x0 as f32;
            let y_frac = src_y - y0 as f32;

            let p00 = frame.luma(x0, y0) as f32;
            let p01 = frame.luma(x1, y0) as f32;
            let p10 = frame.luma(x0, y1) as f32;
            let p11 = frame.luma(x1, y1) as f32;

            let value = p00 * (1.0 - x_frac) * (1.0 - y_frac)
                + p01 * x_frac * (1.0 - y_frac)
                + p10 * (1.0 - x_frac) * y_frac
                + p11 * x_frac * y_frac;

            result.push(value as u8);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, value: u8) -> CameraFrame {
        let data = vec![value; (width * height * 4) as usize];
        CameraFrame::packed(width, height, PixelFormat::RGBA, data)
    }

    #[test]
    fn test_scaled_size() {
        assert_eq!(scaled_size(320, 240, 640), (320, 240));
        assert_eq!(scaled_size(1920, 1080, 640), (640, 360));
        assert_eq!(scaled_size(1080, 1920, 640), (360, 640));
    }

    #[test]
    fn test_grayscale_downscale() {
        let frame = solid_frame(4, 4, 200);
        let gray = to_grayscale(&frame, 2, 2);
        assert_eq!(gray.len(), 4);
        // (77 + 150 + 29) * 200 >> 8 == 200
        assert!(gray.iter().all(|&v| v == 200));
    }

    #[test]
    fn test_grayscale_respects_stride() {
        // 2x1 frame: black then white pixel, 4 bytes of padding
        let data = vec![0, 0, 0, 255, 255, 255, 255, 255, 9, 9, 9, 9];
        let frame = CameraFrame {
            width: 2,
            height: 1,
            data: Arc::from(data.as_slice()),
            format: PixelFormat::RGBA,
            stride: 12,
            captured_at: std::time::Instant::now(),
        };
        assert_eq!(to_grayscale(&frame, 2, 1), vec![0, 255]);
    }

    #[test]
    fn test_blank_frame_has_no_codes() {
        let detector = QrDetector::new();
        assert!(detector.detect_sync(&solid_frame(1280, 720, 255)).is_empty());
        assert!(detector.detect_sync(&solid_frame(0, 0, 0)).is_empty());
    }

    #[tokio::test]
    async fn test_async_detect_blank_frame() {
        let detector = QrDetector::with_max_dimension(64);
        let results = detector.detect(Arc::new(solid_frame(128, 128, 0))).await;
        assert!(results.is_empty());
    }

    #[test]
    fn test_decode_image_errors() {
        let missing = std::env::temp_dir().join("qr-scanner-missing-image.png");
        assert!(matches!(
            decode_image(&missing),
            Err(DecodeError::ImageLoad(_))
        ));

        let blank = std::env::temp_dir().join(format!(
            "qr-scanner-blank-{}.png",
            std::process::id()
        ));
        image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 255, 255, 255]))
            .save(&blank)
            .expect("write test image");
        assert_eq!(decode_image(&blank), Err(DecodeError::NoCodeFound));
        let _ = std::fs::remove_file(&blank);
    }
}
