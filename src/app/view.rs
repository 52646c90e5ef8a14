// SPDX-License-Identifier: GPL-3.0-only

//! Main view rendering
//!
//! The window is the camera preview; toasts float above it. The result
//! dialog is provided separately through `Application::dialog`.

use crate::app::state::{AppModel, Message};
use cosmic::Element;
use cosmic::widget;

impl AppModel {
    /// Build the main view
    pub fn view(&self) -> Element<'_, Message> {
        widget::toaster(&self.toasts, self.build_camera_preview())
    }
}
