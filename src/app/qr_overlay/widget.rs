// SPDX-License-Identifier: MPL-2.0

//! Custom QR overlay widget
//!
//! Renders detection boxes directly with the renderer, calculating positions
//! at draw time when the actual layout bounds are known.

use super::{calculate_video_bounds, transform_region_to_screen};
use crate::app::state::Message;
use crate::constants::ui::{OVERLAY_BORDER_RADIUS, OVERLAY_BORDER_WIDTH};
use crate::scanner::FrameRegion;
use cosmic::iced::advanced::widget::Tree;
use cosmic::iced::advanced::{Layout, Widget, layout, mouse, renderer};
use cosmic::iced::{Border, Color, Element, Length, Rectangle, Size};
use cosmic::{Renderer, Theme};

/// Boxes around detected codes
pub struct QrOverlayWidget {
    boxes: Vec<(FrameRegion, Color)>,
    frame_width: u32,
    frame_height: u32,
    mirrored: bool,
}

impl QrOverlayWidget {
    pub fn new(
        boxes: Vec<(FrameRegion, Color)>,
        frame_width: u32,
        frame_height: u32,
        mirrored: bool,
    ) -> Self {
        Self {
            boxes,
            frame_width,
            frame_height,
            mirrored,
        }
    }
}

impl Widget<Message, Theme, Renderer> for QrOverlayWidget {
    fn size(&self) -> Size<Length> {
        Size::new(Length::Fill, Length::Fill)
    }

    fn layout(
        &self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::Node::new(limits.max())
    }

    fn draw(
        &self,
        _tree: &Tree,
        renderer: &mut Renderer,
        _theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use cosmic::iced::advanced::Renderer as _;

        let bounds = layout.bounds();
        let (offset_x, offset_y, video_width, video_height) = calculate_video_bounds(
            bounds.width,
            bounds.height,
            self.frame_width,
            self.frame_height,
        );

        for (region, border_color) in &self.boxes {
            let (x, y, width, height) = transform_region_to_screen(
                region,
                offset_x,
                offset_y,
                video_width,
                video_height,
                self.mirrored,
            );

            renderer.fill_quad(
                renderer::Quad {
                    bounds: Rectangle {
                        x: bounds.x + x,
                        y: bounds.y + y,
                        width,
                        height,
                    },
                    border: Border {
                        color: *border_color,
                        width: OVERLAY_BORDER_WIDTH,
                        radius: OVERLAY_BORDER_RADIUS.into(),
                    },
                    shadow: Default::default(),
                },
                Color::from_rgba(0.0, 0.0, 0.0, 0.3),
            );
        }
    }
}

impl<'a> From<QrOverlayWidget> for Element<'a, Message, Theme, Renderer> {
    fn from(widget: QrOverlayWidget) -> Self {
        Element::new(widget)
    }
}
