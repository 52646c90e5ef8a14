// SPDX-License-Identifier: MPL-2.0

//! Main application module for QR Scanner
//!
//! Ties the scanner model to the COSMIC runtime: header actions, drawers,
//! the result dialog, and the camera subscriptions.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ContextPage)
//! - `camera_preview`: Preview image and status placeholders
//! - `qr_overlay`: Boxes around detected codes
//! - `result_dialog`: Dialog showing the decoded text
//! - `settings`: Camera, action and theme settings
//! - `view`: Preview wrapped in the toast layer
//! - `update`: Message dispatch to `handlers`

mod camera_preview;
mod handlers;
pub mod qr_overlay;
mod result_dialog;
pub mod settings;
mod state;
mod update;
mod view;

use crate::backends::camera::types::CameraDevice;
use crate::backends::camera::{ScanPipeline, get_backend};
use crate::config::Config;
use crate::constants::{pipeline, timing};
use crate::fl;
use crate::permission;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, Message, ScannerStatus};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const REPOSITORY: &str = "https://github.com/cosmic-utils/qr-scanner";
const APP_ICON: &[u8] = include_bytes!(
    "../../resources/icons/hicolor/scalable/apps/io.github.cosmic_utils.qr-scanner.svg"
);

impl cosmic::Application for AppModel {
    type Executor = cosmic::executor::Default;
    type Flags = ();
    type Message = Message;

    const APP_ID: &'static str = "io.github.cosmic_utils.qr-scanner";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Load settings and ask for camera access
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            warn!(?errors, "Config partially invalid, using defaults for bad keys");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Settings unavailable, running with defaults");
                    (None, Config::default())
                }
            };

        // Required before any GStreamer call, including enumeration
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "GStreamer init failed, camera capture will not work");
        }

        let theme = config.app_theme.theme();
        let mut app = AppModel::new(core, about, config, config_handler);

        // Nothing touches the camera before the portal answers
        app.permission = permission::PermissionState::Requesting;
        let permission_task = Task::perform(permission::request_camera_access(), |state| {
            cosmic::Action::App(Message::PermissionResolved(state))
        });

        (
            app,
            Task::batch([cosmic::command::set_theme(theme), permission_task]),
        )
    }

    /// Image picker, pause toggle, about and settings
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        let mut elements = Vec::new();

        elements.push(
            widget::tooltip(
                widget::button::icon(widget::icon::from_name("document-open-symbolic"))
                    .on_press(Message::PickImage),
                widget::text(fl!("scan-image")),
                widget::tooltip::Position::Bottom,
            )
            .into(),
        );

        if self.permission.is_granted() && !self.available_cameras.is_empty() {
            let (icon, label) = if self.paused {
                ("media-playback-start-symbolic", fl!("resume-scanning"))
            } else {
                ("media-playback-pause-symbolic", fl!("pause-scanning"))
            };
            elements.push(
                widget::tooltip(
                    widget::button::icon(widget::icon::from_name(icon))
                        .on_press(Message::TogglePause),
                    widget::text(label),
                    widget::tooltip::Position::Bottom,
                )
                .into(),
            );
        }

        elements.push(
            widget::tooltip(
                widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                    .on_press(Message::ToggleContextPage(ContextPage::About)),
                widget::text(fl!("about")),
                widget::tooltip::Position::Bottom,
            )
            .into(),
        );

        elements.push(
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        );

        elements
    }

    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Modal dialog shown above the view
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        self.result_dialog()
    }

    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Config changes, window focus, the camera stream and hotplug polling
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let focus_sub = cosmic::iced::event::listen_with(|event, _status, _id| match event {
            cosmic::iced::Event::Window(cosmic::iced::window::Event::Focused) => {
                Some(Message::WindowFocused(true))
            }
            cosmic::iced::Event::Window(cosmic::iced::window::Event::Unfocused) => {
                Some(Message::WindowFocused(false))
            }
            _ => None,
        });

        // Dropping the subscription drops the pipeline, which releases the camera
        let camera_sub = match (self.camera_active(), self.current_camera()) {
            (true, Some(camera)) => camera_subscription(self.config.backend, camera.clone()),
            _ => Subscription::none(),
        };

        let hotplug_sub = if self.permission.is_granted() && self.cameras_initialized {
            hotplug_subscription(self.config.backend, self.available_cameras.clone())
        } else {
            Subscription::none()
        };

        Subscription::batch([config_sub, focus_sub, camera_sub, hotplug_sub])
    }

    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

/// Run a capture pipeline for `camera` and forward its frames
///
/// The subscription restarts whenever the backend or the device changes.
fn camera_subscription(
    backend_type: crate::backends::camera::CameraBackendType,
    camera: CameraDevice,
) -> Subscription<Message> {
    use cosmic::iced::futures::StreamExt;

    Subscription::run_with_id(
        ("camera", backend_type, camera.path.clone()),
        cosmic::iced::stream::channel(pipeline::FRAME_CHANNEL_CAPACITY, move |mut output| async move {
            info!(name = %camera.name, path = %camera.path, backend = %backend_type, "Camera subscription started");
            let backend = get_backend(backend_type);
            let mut frame_count = 0u64;

            loop {
                let (sender, mut receiver) =
                    cosmic::iced::futures::channel::mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);

                let scan_pipeline = match ScanPipeline::new(backend.as_ref(), &camera, sender) {
                    Ok(scan_pipeline) => scan_pipeline,
                    Err(e) => {
                        error!(error = %e, "Could not open camera");
                        info!(delay = ?timing::PIPELINE_RETRY_DELAY, "Retrying camera");
                        tokio::time::sleep(timing::PIPELINE_RETRY_DELAY).await;
                        continue;
                    }
                };

                loop {
                    if output.is_closed() {
                        info!("Output channel closed - camera subscription cancelled");
                        return;
                    }

                    match tokio::time::timeout(timing::FRAME_POLL_TIMEOUT, receiver.next()).await {
                        Ok(Some(frame)) => {
                            frame_count += 1;
                            if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                info!(
                                    frame = frame_count,
                                    width = frame.width,
                                    height = frame.height,
                                    "Camera frame"
                                );
                            }

                            // Dropping frames is fine, only the latest one matters
                            if let Err(e) = output.try_send(Message::CameraFrame(Arc::new(frame)))
                                && e.is_disconnected()
                            {
                                info!("Output channel disconnected - camera subscription cancelled");
                                return;
                            }
                        }
                        Ok(None) => {
                            warn!("Camera frame stream ended");
                            break;
                        }
                        Err(_) => {
                            if let Some(err) = scan_pipeline.poll_error() {
                                error!(error = %err, "Camera pipeline failed");
                                break;
                            }
                        }
                    }
                }

                drop(scan_pipeline);
                tokio::time::sleep(timing::PIPELINE_RETRY_DELAY).await;
            }
        }),
    )
}

/// Poll the camera list and report changes
fn hotplug_subscription(
    backend_type: crate::backends::camera::CameraBackendType,
    current_cameras: Vec<CameraDevice>,
) -> Subscription<Message> {
    use cosmic::iced::futures::SinkExt;

    Subscription::run_with_id(
        ("camera_hotplug", backend_type),
        cosmic::iced::stream::channel(4, move |mut output| async move {
            debug!(count = current_cameras.len(), "Watching for camera changes");
            let mut known = current_cameras;

            loop {
                tokio::time::sleep(timing::HOTPLUG_POLL_INTERVAL).await;

                let new_cameras = match tokio::task::spawn_blocking(move || {
                    get_backend(backend_type).enumerate_cameras()
                })
                .await
                {
                    Ok(cameras) => cameras,
                    Err(e) => {
                        warn!(error = %e, "Camera enumeration task failed");
                        continue;
                    }
                };

                if !cameras_changed(&known, &new_cameras) {
                    continue;
                }

                info!(
                    before = known.len(),
                    after = new_cameras.len(),
                    "Cameras plugged or unplugged"
                );
                known = new_cameras.clone();

                if output
                    .send(Message::CameraListChanged(new_cameras))
                    .await
                    .is_err()
                {
                    debug!("Hotplug subscription dropped");
                    break;
                }
            }
        }),
    )
}

/// Whether two camera lists differ in count or devices
fn cameras_changed(old: &[CameraDevice], new: &[CameraDevice]) -> bool {
    old.len() != new.len()
        || !old
            .iter()
            .all(|c| new.iter().any(|nc| nc.path == c.path && nc.name == c.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(name: &str, path: &str) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: path.to_string(),
            driver: None,
            v4l2_path: None,
        }
    }

    #[test]
    fn test_cameras_changed() {
        let a = vec![camera("Front", "/dev/video0"), camera("Back", "/dev/video2")];
        let reordered = vec![camera("Back", "/dev/video2"), camera("Front", "/dev/video0")];
        assert!(!cameras_changed(&a, &reordered));
        assert!(cameras_changed(&a, &a[..1]));
        assert!(cameras_changed(&a, &[camera("Front", "/dev/video0"), camera("USB", "/dev/video4")]));
        assert!(!cameras_changed(&[], &[]));
    }
}
