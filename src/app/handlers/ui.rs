// SPDX-License-Identifier: GPL-3.0-only

//! UI Navigation handlers
//!
//! Handles context pages, toasts and window focus.

use crate::app::state::{AppModel, ContextPage, Message};
use cosmic::Task;
use cosmic::widget::toaster::{Toast, ToastId};
use tracing::{error, info};

impl AppModel {
    // =========================================================================
    // UI Navigation Handlers
    // =========================================================================

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_close_toast(&mut self, id: ToastId) -> Task<cosmic::Action<Message>> {
        self.toasts.remove(id);
        Task::none()
    }

    pub(crate) fn handle_window_focused(&mut self, focused: bool) -> Task<cosmic::Action<Message>> {
        if self.window_focused != focused {
            self.window_focused = focused;
            if self.config.pause_when_unfocused {
                info!(focused, "Window focus changed, camera follows");
                self.gate.reset();
            }
        }
        Task::none()
    }

    /// Show a transient message at the bottom of the window
    pub(crate) fn show_toast(&mut self, text: String) -> Task<cosmic::Action<Message>> {
        self.toasts.push(Toast::new(text)).map(cosmic::Action::App)
    }
}
