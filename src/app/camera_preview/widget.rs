// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview widget implementation

use crate::app::qr_overlay;
use crate::app::state::{AppModel, Message, ScannerStatus};
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Background, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    /// Build the camera preview widget
    ///
    /// Shows a status message until frames arrive, then the latest frame with
    /// detection boxes stacked on top.
    pub fn build_camera_preview(&self) -> Element<'_, Message> {
        let status = self.status();
        let message = match status {
            ScannerStatus::WaitingForPermission => Some(fl!("waiting-for-permission")),
            ScannerStatus::PermissionDenied => Some(fl!("permission-denied")),
            ScannerStatus::Initializing => Some(fl!("initializing-camera")),
            ScannerStatus::NoCamera => Some(fl!("no-camera")),
            ScannerStatus::Paused => Some(fl!("camera-paused")),
            ScannerStatus::Scanning if self.preview.is_none() => Some(fl!("initializing-camera")),
            ScannerStatus::Scanning => None,
        };

        if let Some(message) = message {
            let mut column = widget::column()
                .push(widget::text(message).size(20))
                .spacing(10)
                .align_x(cosmic::iced::alignment::Horizontal::Center);
            if status == ScannerStatus::PermissionDenied {
                column = column.push(
                    widget::button::suggested(fl!("request-permission"))
                        .on_press(Message::RequestPermission),
                );
            }
            return placeholder(column.into());
        }

        let (Some(handle), Some(frame)) = (&self.preview, &self.current_frame) else {
            return placeholder(widget::Space::new(Length::Fill, Length::Fill).into());
        };

        let image = widget::image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill);

        let overlay = qr_overlay::build_qr_overlay(
            &self.detections,
            frame.width,
            frame.height,
            self.config.mirror_preview,
        );

        let hint = widget::container(
            widget::container(widget::text::body(fl!("point-camera")))
                .padding([4, 12])
                .class(cosmic::theme::Container::Card),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(16)
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .align_y(cosmic::iced::alignment::Vertical::Bottom);

        widget::container(cosmic::iced::widget::stack![image, overlay, hint])
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Themed full-size canvas with centered content
fn placeholder(content: Element<'_, Message>) -> Element<'_, Message> {
    widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .align_y(cosmic::iced::alignment::Vertical::Center)
        .style(|theme: &cosmic::Theme| widget::container::Style {
            background: Some(Background::Color(theme.cosmic().bg_color().into())),
            text_color: Some(theme.cosmic().on_bg_color().into()),
            ..Default::default()
        })
        .into()
}
