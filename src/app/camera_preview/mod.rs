// SPDX-License-Identifier: MPL-2.0

//! Camera preview module
//!
//! Frames are turned into image handles once, in `update`, so `view` only
//! has to place them. The preview is sampled down to
//! [`PREVIEW_MAX_DIMENSION`](crate::constants::ui::PREVIEW_MAX_DIMENSION) in
//! the same pass that strips stride padding and mirrors. Detection still sees
//! the full frame.

pub mod widget;

use crate::backends::camera::types::{CameraFrame, PixelFormat};
use crate::constants::ui;
use cosmic::widget::image::Handle;

/// Image handle for a frame, flipped horizontally when `mirror` is set
pub fn frame_handle(frame: &CameraFrame, mirror: bool) -> Handle {
    let (width, height, pixels) = preview_rgba(frame, ui::PREVIEW_MAX_DIMENSION, mirror);
    Handle::from_rgba(width, height, pixels)
}

/// Preview size keeping the aspect ratio, longest side at most `max_dimension`
///
/// Frames that already fit are never scaled up.
pub fn preview_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension || max_dimension == 0 {
        return (width, height);
    }
    let scale = max_dimension as f64 / longest as f64;
    (
        ((width as f64 * scale).round() as u32).max(1),
        ((height as f64 * scale).round() as u32).max(1),
    )
}

/// Packed RGBA pixels for the preview
///
/// Nearest-neighbour sampling straight from the strided frame data. Gray
/// frames come out opaque gray; reads past the buffer come out black.
pub fn preview_rgba(frame: &CameraFrame, max_dimension: u32, mirror: bool) -> (u32, u32, Vec<u8>) {
    let (width, height) = preview_size(frame.width, frame.height, max_dimension);
    let (dst_w, dst_h) = (width as usize, height as usize);
    let (src_w, src_h) = (frame.width as usize, frame.height as usize);
    let stride = frame.stride as usize;
    let bpp = frame.format.bytes_per_pixel();

    let mut pixels = Vec::with_capacity(dst_w * dst_h * 4);
    for y in 0..dst_h {
        let row_start = (y * src_h / dst_h) * stride;
        for x in 0..dst_w {
            let column = if mirror { dst_w - 1 - x } else { x };
            let offset = row_start + (column * src_w / dst_w) * bpp;
            match frame.format {
                PixelFormat::RGBA => match frame.data.get(offset..offset + 4) {
                    Some(px) => pixels.extend_from_slice(px),
                    None => pixels.extend_from_slice(&[0, 0, 0, 255]),
                },
                PixelFormat::Gray8 => {
                    let v = frame.data.get(offset).copied().unwrap_or(0);
                    pixels.extend_from_slice(&[v, v, v, 255]);
                }
            }
        }
    }

    (width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    /// RGBA frame whose red channel holds the column index
    fn column_frame(width: u32, height: u32, padding: u32) -> CameraFrame {
        let stride = width * 4 + padding;
        let mut data = Vec::new();
        for _ in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, 0, 0, 255]);
            }
            data.extend(std::iter::repeat_n(0xAA, padding as usize));
        }
        CameraFrame {
            width,
            height,
            data: Arc::from(data),
            format: PixelFormat::RGBA,
            stride,
            captured_at: Instant::now(),
        }
    }

    fn red_channel(pixels: &[u8]) -> Vec<u8> {
        pixels.chunks_exact(4).map(|p| p[0]).collect()
    }

    #[test]
    fn test_preview_size() {
        assert_eq!(preview_size(3840, 2160, 1280), (1280, 720));
        assert_eq!(preview_size(1080, 1920, 960), (540, 960));
        // Small frames are left alone
        assert_eq!(preview_size(640, 480, 1280), (640, 480));
        assert_eq!(preview_size(0, 0, 1280), (0, 0));
    }

    #[test]
    fn test_preview_strips_stride_padding() {
        let frame = column_frame(3, 2, 2);
        let (w, h, pixels) = preview_rgba(&frame, 1280, false);

        assert_eq!((w, h), (3, 2));
        assert_eq!(red_channel(&pixels), vec![0, 1, 2, 0, 1, 2]);
        assert!(pixels.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_preview_mirrors_each_row() {
        let frame = column_frame(3, 2, 0);
        let (_, _, pixels) = preview_rgba(&frame, 1280, true);
        assert_eq!(red_channel(&pixels), vec![2, 1, 0, 2, 1, 0]);
    }

    #[test]
    fn test_preview_downscales() {
        let frame = column_frame(8, 4, 4);
        let (w, h, pixels) = preview_rgba(&frame, 4, false);

        assert_eq!((w, h), (4, 2));
        assert_eq!(pixels.len(), 4 * 2 * 4);
        assert_eq!(red_channel(&pixels), vec![0, 2, 4, 6, 0, 2, 4, 6]);

        let (_, _, mirrored) = preview_rgba(&frame, 4, true);
        assert_eq!(red_channel(&mirrored), vec![6, 4, 2, 0, 6, 4, 2, 0]);
    }

    #[test]
    fn test_gray_preview_is_opaque() {
        let frame = CameraFrame::packed(2, 1, PixelFormat::Gray8, vec![10, 200]);
        let (_, _, pixels) = preview_rgba(&frame, 1280, false);
        assert_eq!(pixels, vec![10, 10, 10, 255, 200, 200, 200, 255]);
    }
}
