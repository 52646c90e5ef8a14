// SPDX-License-Identifier: MPL-2.0

//! QR code overlay module
//!
//! Draws a box around every code found in the latest sampled frame, on top
//! of the camera preview. Box colors tell links, email addresses and plain
//! text apart.
//!
//! # Coordinate System
//!
//! Detections use normalized coordinates (0.0 to 1.0) relative to the
//! camera frame. The overlay widget handles transformation to screen
//! coordinates at render time, accounting for letterboxing and mirroring.

mod widget;

use crate::actions::ScanContent;
use crate::app::state::Message;
use crate::constants::ui::MIN_OVERLAY_SIZE;
use crate::scanner::{FrameRegion, ScanResult};
use cosmic::Element;
use cosmic::iced::{Color, Length};

/// Build the overlay layer for `detections` in a `frame_width` x `frame_height` frame
pub fn build_qr_overlay<'a>(
    detections: &[ScanResult],
    frame_width: u32,
    frame_height: u32,
    mirrored: bool,
) -> Element<'a, Message> {
    if detections.is_empty() || frame_width == 0 || frame_height == 0 {
        return cosmic::widget::Space::new(Length::Fill, Length::Fill).into();
    }

    widget::QrOverlayWidget::new(
        detections
            .iter()
            .map(|d| (d.region, content_color(&d.content())))
            .collect(),
        frame_width,
        frame_height,
        mirrored,
    )
    .into()
}

/// Border color for a payload kind
pub fn content_color(content: &ScanContent) -> Color {
    match content {
        ScanContent::Url(_) => Color::from_rgb(0.29, 0.56, 0.89), // Blue for links
        ScanContent::Email(_) => Color::from_rgb(0.90, 0.49, 0.13), // Orange for email
        ScanContent::Text(_) => Color::from_rgb(0.62, 0.62, 0.62), // Gray for plain text
    }
}

/// Calculate the letterboxed video area within a container
///
/// Returns (offset_x, offset_y, video_width, video_height).
pub fn calculate_video_bounds(
    container_width: f32,
    container_height: f32,
    frame_width: u32,
    frame_height: u32,
) -> (f32, f32, f32, f32) {
    let frame_aspect = frame_width as f32 / frame_height as f32;
    let container_aspect = container_width / container_height;

    let (video_width, video_height) = if frame_aspect > container_aspect {
        // Frame is wider - fit to width
        (container_width, container_width / frame_aspect)
    } else {
        // Frame is taller - fit to height
        (container_height * frame_aspect, container_height)
    };

    let offset_x = (container_width - video_width) / 2.0;
    let offset_y = (container_height - video_height) / 2.0;

    (offset_x, offset_y, video_width, video_height)
}

/// Transform a normalized region to screen coordinates
pub fn transform_region_to_screen(
    region: &FrameRegion,
    offset_x: f32,
    offset_y: f32,
    video_width: f32,
    video_height: f32,
    mirrored: bool,
) -> (f32, f32, f32, f32) {
    let mut x = region.x * video_width;
    let y = region.y * video_height;
    let width = region.width * video_width;
    let height = region.height * video_height;

    if mirrored {
        x = video_width - x - width;
    }

    // Grow tiny boxes around their center
    let screen_width = width.max(MIN_OVERLAY_SIZE);
    let screen_height = height.max(MIN_OVERLAY_SIZE);
    let screen_x = x + offset_x - (screen_width - width) / 2.0;
    let screen_y = y + offset_y - (screen_height - height) / 2.0;

    (screen_x, screen_y, screen_width, screen_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-2
    }

    #[test]
    fn test_video_bounds_letterbox() {
        // 16:9 frame in a square container: bars above and below
        let (ox, oy, w, h) = calculate_video_bounds(1600.0, 1600.0, 1920, 1080);
        assert!(approx(ox, 0.0));
        assert!(approx(w, 1600.0));
        assert!(approx(h, 900.0));
        assert!(approx(oy, 350.0));

        // 4:3 frame in a wide container: bars left and right
        let (ox, oy, w, h) = calculate_video_bounds(1000.0, 300.0, 640, 480);
        assert!(approx(oy, 0.0));
        assert!(approx(h, 300.0));
        assert!(approx(w, 400.0));
        assert!(approx(ox, 300.0));
    }

    #[test]
    fn test_transform_mirrors_horizontally() {
        let region = FrameRegion {
            x: 0.1,
            y: 0.2,
            width: 0.3,
            height: 0.3,
        };
        let (x, y, w, h) = transform_region_to_screen(&region, 0.0, 0.0, 1000.0, 1000.0, false);
        assert!((x - 100.0).abs() < 1e-3);
        assert!((y - 200.0).abs() < 1e-3);
        assert!((w - 300.0).abs() < 1e-3);
        assert!((h - 300.0).abs() < 1e-3);

        let (x, _, _, _) = transform_region_to_screen(&region, 0.0, 0.0, 1000.0, 1000.0, true);
        assert!((x - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_transform_enforces_minimum_size() {
        let region = FrameRegion {
            x: 0.5,
            y: 0.5,
            width: 0.01,
            height: 0.01,
        };
        let (x, y, w, h) = transform_region_to_screen(&region, 10.0, 20.0, 1000.0, 1000.0, false);
        assert_eq!(w, MIN_OVERLAY_SIZE);
        assert_eq!(h, MIN_OVERLAY_SIZE);
        // Still centered on the code
        assert!((x + w / 2.0 - 515.0).abs() < 1e-3);
        assert!((y + h / 2.0 - 525.0).abs() < 1e-3);
    }

    #[test]
    fn test_colors_differ_by_content() {
        let url = content_color(&ScanContent::classify("https://example.com"));
        let email = content_color(&ScanContent::classify("a@example.com"));
        let text = content_color(&ScanContent::classify("hello"));
        assert_ne!(url, email);
        assert_ne!(url, text);
        assert_ne!(email, text);
    }
}
