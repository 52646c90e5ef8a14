// SPDX-License-Identifier: GPL-3.0-only

//! Scan result dialog
//!
//! Shows the decoded text with Copy and Cancel. Email addresses are rendered
//! as a link that opens the mail composer; web links get an extra button.

use crate::actions::ScanContent;
use crate::app::state::{AppModel, Message};
use crate::fl;
use cosmic::Element;
use cosmic::iced::Length;
use cosmic::widget;

/// Longest payload shown before the dialog body starts scrolling
const MAX_BODY_HEIGHT: f32 = 240.0;

impl AppModel {
    /// The dialog for the current result, if one is shown
    pub fn result_dialog(&self) -> Option<Element<'_, Message>> {
        let result = self.result.as_ref()?;
        let content = result.content();

        let text: Element<'_, Message> = match &content {
            ScanContent::Email(address) => widget::button::link(address.clone())
                .on_press(Message::ComposeResultEmail)
                .into(),
            ScanContent::Url(_) | ScanContent::Text(_) => {
                widget::text::body(content.text().to_string())
                    .width(Length::Fill)
                    .into()
            }
        };

        let mut dialog = widget::dialog()
            .title(fl!("scan-result"))
            .control(
                widget::container(widget::scrollable(text))
                    .max_height(MAX_BODY_HEIGHT)
                    .width(Length::Fill),
            )
            .primary_action(widget::button::suggested(fl!("copy")).on_press(Message::CopyResult))
            .secondary_action(
                widget::button::standard(fl!("cancel")).on_press(Message::DismissResult),
            );

        match content {
            ScanContent::Url(_) => {
                dialog = dialog.tertiary_action(
                    widget::button::text(fl!("open-link")).on_press(Message::OpenResultUrl),
                );
            }
            ScanContent::Email(_) => {
                dialog = dialog.tertiary_action(
                    widget::button::text(fl!("send-email")).on_press(Message::ComposeResultEmail),
                );
            }
            ScanContent::Text(_) => {}
        }

        Some(dialog.into())
    }
}
