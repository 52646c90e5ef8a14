// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! This module handles all application messages by routing them to focused handler methods.
//! The main `update()` function acts as a dispatcher, while specific handlers are implemented
//! in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::ui`: Context drawer, toasts, window focus
//! - `handlers::permission`: Camera portal request and answer
//! - `handlers::camera`: Enumeration, selection, hotplug, frames, pause
//! - `handlers::scan`: Detections, result dialog, image files
//! - `handlers::system`: Settings

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::CloseToast(id) => self.handle_close_toast(id),
            Message::WindowFocused(focused) => self.handle_window_focused(focused),

            // ===== Permission =====
            Message::RequestPermission => self.handle_request_permission(),
            Message::PermissionResolved(state) => self.handle_permission_resolved(state),

            // ===== Camera Control =====
            Message::CamerasInitialized(cameras, index) => {
                self.handle_cameras_initialized(cameras, index)
            }
            Message::CameraListChanged(cameras) => self.handle_camera_list_changed(cameras),
            Message::SelectCamera(index) => self.handle_select_camera(index),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),
            Message::TogglePause => self.handle_toggle_pause(),

            // ===== Scanning =====
            Message::DetectionsUpdated(detections) => self.handle_detections_updated(detections),
            Message::PickImage => self.handle_pick_image(),
            Message::ImagePicked(path) => self.handle_image_picked(path),
            Message::ImageDecoded(path, result) => self.handle_image_decoded(path, result),

            // ===== Result Dialog =====
            Message::CopyResult => self.handle_copy_result(),
            Message::DismissResult => self.handle_dismiss_result(),
            Message::OpenResultUrl => self.handle_open_result_url(),
            Message::ComposeResultEmail => self.handle_compose_result_email(),
            Message::ActionFailed(error) => self.handle_action_failed(error),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SelectTheme(index) => self.handle_select_theme(index),
            Message::SelectBackend(index) => self.handle_select_backend(index),
            Message::ToggleMirrorPreview => self.handle_toggle_mirror_preview(),
            Message::ToggleAutoOpenUrls => self.handle_toggle_auto_open_urls(),
            Message::ToggleAutoComposeEmail => self.handle_toggle_auto_compose_email(),
            Message::TogglePauseWhenUnfocused => self.handle_toggle_pause_when_unfocused(),

            Message::Noop => Task::none(),
        }
    }
}
