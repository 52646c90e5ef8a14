// SPDX-License-Identifier: GPL-3.0-only

//! Settings handlers
//!
//! Every toggle is written back through the config handler; changes made by
//! other instances arrive as [`Message::UpdateConfig`].

use crate::app::state::{AppModel, Message};
use crate::backends::camera::CameraBackendType;
use crate::config::{AppTheme, Config};
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, info};

impl AppModel {
    // =========================================================================
    // Settings Handlers
    // =========================================================================

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let backend_changed = config.backend != self.config.backend;
        let theme_changed = config.app_theme != self.config.app_theme;

        self.gate.set_interval(config.scan_interval());
        self.config = config;

        let mut tasks = Vec::new();
        if theme_changed {
            tasks.push(cosmic::command::set_theme(self.config.app_theme.theme()));
        }
        if backend_changed && self.permission.is_granted() {
            tasks.push(self.enumerate_cameras_task());
        }
        Task::batch(tasks)
    }

    pub(crate) fn handle_select_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&app_theme) = AppTheme::ALL.get(index) else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_select_backend(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&backend) = CameraBackendType::ALL.get(index) else {
            return Task::none();
        };
        if backend == self.config.backend {
            return Task::none();
        }

        info!(%backend, "Switching camera backend");
        self.config.backend = backend;
        self.save_config("camera backend");

        // Device paths differ between backends, so start over
        self.available_cameras.clear();
        self.camera_dropdown_options.clear();
        self.cameras_initialized = false;
        self.current_frame = None;
        self.preview = None;
        self.detections.clear();
        self.gate.reset();

        if self.permission.is_granted() {
            self.enumerate_cameras_task()
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_toggle_mirror_preview(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.mirror_preview = !self.config.mirror_preview;
        info!(enabled = self.config.mirror_preview, "Mirror preview toggled");
        self.save_config("mirror preview");
        Task::none()
    }

    pub(crate) fn handle_toggle_auto_open_urls(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.auto_open_urls = !self.config.auto_open_urls;
        info!(enabled = self.config.auto_open_urls, "Auto-open links toggled");
        self.save_config("auto-open links");
        Task::none()
    }

    pub(crate) fn handle_toggle_auto_compose_email(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.auto_compose_email = !self.config.auto_compose_email;
        info!(
            enabled = self.config.auto_compose_email,
            "Auto-compose email toggled"
        );
        self.save_config("auto-compose email");
        Task::none()
    }

    pub(crate) fn handle_toggle_pause_when_unfocused(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.pause_when_unfocused = !self.config.pause_when_unfocused;
        info!(
            enabled = self.config.pause_when_unfocused,
            "Pause when unfocused toggled"
        );
        self.save_config("pause when unfocused");
        self.gate.reset();
        Task::none()
    }

    fn save_config(&self, setting: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting, "Failed to save setting");
        }
    }
}
