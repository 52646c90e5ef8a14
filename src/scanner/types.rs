// SPDX-License-Identifier: MPL-2.0

//! Scan result types

use crate::actions::ScanContent;
use serde::Serialize;

/// A rectangular region within a frame
///
/// Coordinates are normalized (0.0 to 1.0) relative to the frame dimensions.
/// This allows easy transformation to screen coordinates regardless of
/// the actual frame size or display scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRegion {
    /// Left edge (0.0 = left of frame, 1.0 = right of frame)
    pub x: f32,
    /// Top edge (0.0 = top of frame, 1.0 = bottom of frame)
    pub y: f32,
    /// Width as fraction of frame width
    pub width: f32,
    /// Height as fraction of frame height
    pub height: f32,
}

impl FrameRegion {
    /// Create a frame region from pixel coordinates
    pub fn from_pixels(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let fw = frame_width.max(1) as f32;
        let fh = frame_height.max(1) as f32;
        Self {
            x: x as f32 / fw,
            y: y as f32 / fh,
            width: width as f32 / fw,
            height: height as f32 / fh,
        }
    }

    /// Bounding box of a set of corner points, in pixels of a `frame_width` x `frame_height` frame
    pub fn from_corners(points: &[(f32, f32)], frame_width: u32, frame_height: u32) -> Self {
        let fw = frame_width as f32;
        let fh = frame_height as f32;
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if points.is_empty() {
            return Self::from_pixels(0, 0, 0, 0, frame_width, frame_height);
        }

        let min_x = min_x.clamp(0.0, fw);
        let min_y = min_y.clamp(0.0, fh);
        let max_x = max_x.clamp(0.0, fw);
        let max_y = max_y.clamp(0.0, fh);

        Self::from_pixels(
            min_x as u32,
            min_y as u32,
            (max_x - min_x) as u32,
            (max_y - min_y) as u32,
            frame_width,
            frame_height,
        )
    }
}

/// A decoded code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    /// Decoded payload
    pub text: String,
    /// Where the code sits in the frame it was decoded from
    pub region: FrameRegion,
}

impl ScanResult {
    pub fn new(text: impl Into<String>, region: FrameRegion) -> Self {
        Self {
            text: text.into(),
            region,
        }
    }

    /// Classify the payload
    pub fn content(&self) -> ScanContent {
        ScanContent::classify(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels() {
        let region = FrameRegion::from_pixels(160, 120, 320, 240, 640, 480);
        assert_eq!(region.x, 0.25);
        assert_eq!(region.y, 0.25);
        assert_eq!(region.width, 0.5);
        assert_eq!(region.height, 0.5);
    }

    #[test]
    fn test_from_corners_clamps_to_frame() {
        let region =
            FrameRegion::from_corners(&[(-10.0, 20.0), (50.0, 20.0), (50.0, 120.0)], 100, 100);
        assert_eq!(region.x, 0.0);
        assert_eq!(region.y, 0.2);
        assert_eq!(region.width, 0.5);
        // Bottom edge clamped at the frame border
        assert_eq!(region.height, 0.8);
    }
}
