// SPDX-License-Identifier: GPL-3.0-only

//! Camera control handlers
//!
//! Handles camera enumeration, selection, hotplug events, incoming frames
//! and pausing.

use crate::app::camera_preview;
use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::{CameraDevice, CameraFrame};
use crate::backends::camera::{get_backend, select_camera};
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

impl AppModel {
    // =========================================================================
    // Camera Control Handlers
    // =========================================================================

    /// Enumerate cameras off the UI thread
    pub(crate) fn enumerate_cameras_task(&self) -> Task<cosmic::Action<Message>> {
        let backend_type = self.config.backend;
        let last_camera_path = self.config.last_camera_path.clone();

        Task::perform(
            async move {
                info!(backend = %backend_type, "Enumerating cameras");
                let cameras = tokio::task::spawn_blocking(move || {
                    get_backend(backend_type).enumerate_cameras()
                })
                .await
                .unwrap_or_else(|e| {
                    error!(error = %e, "Camera enumeration task failed");
                    Vec::new()
                });
                info!(count = cameras.len(), backend = %backend_type, "Found camera(s)");

                let index = select_camera(&cameras, last_camera_path.as_deref());
                (cameras, index)
            },
            |(cameras, index)| cosmic::Action::App(Message::CamerasInitialized(cameras, index)),
        )
    }

    pub(crate) fn handle_cameras_initialized(
        &mut self,
        cameras: Vec<CameraDevice>,
        index: Option<usize>,
    ) -> Task<cosmic::Action<Message>> {
        info!(count = cameras.len(), ?index, "Cameras initialized");

        self.available_cameras = cameras;
        self.current_camera_index = index.unwrap_or(0);
        self.cameras_initialized = true;
        self.update_camera_dropdown();
        self.reset_stream_state();

        Task::none()
    }

    pub(crate) fn handle_camera_list_changed(
        &mut self,
        new_cameras: Vec<CameraDevice>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.permission.is_granted() {
            return Task::none();
        }

        let current_path = self.current_camera().map(|c| c.path.clone());
        info!(
            old_count = self.available_cameras.len(),
            new_count = new_cameras.len(),
            "Camera list changed"
        );

        // Keep the open camera when it survived the change
        let still_present = current_path
            .as_deref()
            .and_then(|path| new_cameras.iter().position(|c| c.path == path));

        self.available_cameras = new_cameras;
        self.update_camera_dropdown();

        match still_present {
            Some(index) => {
                self.current_camera_index = index;
            }
            None => {
                if current_path.is_some() {
                    warn!("Active camera disconnected");
                }
                self.current_camera_index = select_camera(
                    &self.available_cameras,
                    self.config.last_camera_path.as_deref(),
                )
                .unwrap_or(0);
                self.reset_stream_state();
            }
        }

        Task::none()
    }

    pub(crate) fn handle_select_camera(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(camera) = self.available_cameras.get(index) else {
            warn!(index, "Camera index out of range");
            return Task::none();
        };
        if index == self.current_camera_index {
            return Task::none();
        }

        info!(index, camera = %camera.name, "Switching camera");
        self.config.last_camera_path = Some(camera.path.clone());
        self.current_camera_index = index;
        self.reset_stream_state();

        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save camera selection");
        }

        Task::none()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        // Frames still queued after the stream was stopped
        if !self.camera_active() {
            return Task::none();
        }

        self.preview = Some(camera_preview::frame_handle(
            &frame,
            self.config.mirror_preview,
        ));
        self.current_frame = Some(Arc::clone(&frame));

        let now = Instant::now();
        if !self.gate.should_sample(now, self.result.is_some()) {
            return Task::none();
        }
        self.gate.begin(now);

        debug!(
            width = frame.width,
            height = frame.height,
            "Sampling frame for detection"
        );
        let detector = self.detector;
        Task::perform(async move { detector.detect(frame).await }, |detections| {
            cosmic::Action::App(Message::DetectionsUpdated(detections))
        })
    }

    pub(crate) fn handle_toggle_pause(&mut self) -> Task<cosmic::Action<Message>> {
        self.paused = !self.paused;
        info!(paused = self.paused, "Scanning toggled");
        if self.paused {
            self.detections.clear();
        }
        self.gate.reset();
        Task::none()
    }

    fn update_camera_dropdown(&mut self) {
        self.camera_dropdown_options = self
            .available_cameras
            .iter()
            .map(|cam| cam.name.clone())
            .collect();
    }

    /// Drop everything tied to the previous stream
    fn reset_stream_state(&mut self) {
        self.current_frame = None;
        self.preview = None;
        self.detections.clear();
        self.gate.reset();
    }
}
