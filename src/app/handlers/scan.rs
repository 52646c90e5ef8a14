// SPDX-License-Identifier: GPL-3.0-only

//! Scan result handlers
//!
//! Turns detections into the result dialog, runs the automatic action for
//! links and addresses, and handles the dialog buttons and image files.

use crate::actions::{self, EmailTemplate, ScanContent};
use crate::app::state::{AppModel, Message};
use crate::config::Config;
use crate::constants::file_formats;
use crate::errors::{ActionError, DecodeError};
use crate::fl;
use crate::scanner::{self, ScanResult};
use cosmic::Task;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Whether scanning `content` should run its action without a click
pub(crate) fn runs_automatically(content: &ScanContent, config: &Config) -> bool {
    match content {
        ScanContent::Url(_) => config.auto_open_urls,
        ScanContent::Email(_) => config.auto_compose_email,
        ScanContent::Text(_) => false,
    }
}

impl AppModel {
    // =========================================================================
    // Detection Handlers
    // =========================================================================

    pub(crate) fn handle_detections_updated(
        &mut self,
        detections: Vec<ScanResult>,
    ) -> Task<cosmic::Action<Message>> {
        self.gate.finish();
        if !self.camera_active() {
            self.detections.clear();
            return Task::none();
        }
        self.detections = detections;

        if self.result.is_some() {
            return Task::none();
        }

        let now = Instant::now();
        let Some(found) = self
            .detections
            .iter()
            .find(|d| !self.gate.is_duplicate(&d.text, now))
            .cloned()
        else {
            return Task::none();
        };

        self.handle_result(found)
    }

    /// Open the result dialog for `result` and run its automatic action
    fn handle_result(&mut self, result: ScanResult) -> Task<cosmic::Action<Message>> {
        let content = result.content();
        info!(
            length = result.text.len(),
            url = content.is_url(),
            email = content.is_email(),
            "Code scanned"
        );
        self.result = Some(result);

        if runs_automatically(&content, &self.config) {
            self.run_default_action(content)
        } else {
            Task::none()
        }
    }

    /// Open a link or compose an email without blocking the UI
    fn run_default_action(&self, content: ScanContent) -> Task<cosmic::Action<Message>> {
        let launcher = Arc::clone(&self.launcher);
        let template = EmailTemplate::from(&self.config);
        let uri = content.text().to_string();

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    actions::perform_default_action(launcher.as_ref(), &content, &template)
                })
                .await
                .unwrap_or_else(|e| {
                    Err(ActionError::LaunchFailed {
                        uri,
                        reason: e.to_string(),
                    })
                })
            },
            |result| match result {
                Ok(_) => cosmic::Action::App(Message::Noop),
                Err(e) => cosmic::Action::App(Message::ActionFailed(e)),
            },
        )
    }

    // =========================================================================
    // Result Dialog Handlers
    // =========================================================================

    pub(crate) fn handle_copy_result(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(result) = self.result.clone() else {
            return Task::none();
        };
        info!(text_length = result.text.len(), "Copying scan result to clipboard");

        let toast = self.show_toast(fl!("copied-to-clipboard", text = result.text.as_str()));
        let dismiss = self.handle_dismiss_result();
        let copy = cosmic::iced::clipboard::write(result.text)
            .map(|_: ()| cosmic::Action::App(Message::Noop));

        Task::batch([copy, toast, dismiss])
    }

    pub(crate) fn handle_dismiss_result(&mut self) -> Task<cosmic::Action<Message>> {
        if let Some(result) = self.result.take() {
            // Scanning resumes, minus the code that's probably still in view
            self.gate.dismissed(result.text, Instant::now());
        }
        self.detections.clear();
        Task::none()
    }

    pub(crate) fn handle_open_result_url(&self) -> Task<cosmic::Action<Message>> {
        match self.result.as_ref().map(ScanResult::content) {
            Some(content @ ScanContent::Url(_)) => self.run_default_action(content),
            _ => Task::none(),
        }
    }

    pub(crate) fn handle_compose_result_email(&self) -> Task<cosmic::Action<Message>> {
        match self.result.as_ref().map(ScanResult::content) {
            Some(content @ ScanContent::Email(_)) => self.run_default_action(content),
            _ => Task::none(),
        }
    }

    pub(crate) fn handle_action_failed(
        &mut self,
        error: ActionError,
    ) -> Task<cosmic::Action<Message>> {
        match error {
            ActionError::NoEmailClient => self.show_toast(fl!("no-email-client")),
            other => {
                error!(error = %other, "Failed to hand scan result to another application");
                Task::none()
            }
        }
    }

    // =========================================================================
    // Image File Handlers
    // =========================================================================

    pub(crate) fn handle_pick_image(&self) -> Task<cosmic::Action<Message>> {
        let filter_name = fl!("scan-image");
        let title = fl!("scan-image-title");

        Task::perform(
            async move {
                rfd::AsyncFileDialog::new()
                    .add_filter(filter_name, file_formats::IMAGE_EXTENSIONS)
                    .set_title(title)
                    .pick_file()
                    .await
                    .map(|handle| handle.path().to_path_buf())
            },
            |path| cosmic::Action::App(Message::ImagePicked(path)),
        )
    }

    pub(crate) fn handle_image_picked(
        &self,
        path: Option<PathBuf>,
    ) -> Task<cosmic::Action<Message>> {
        let Some(path) = path else {
            return Task::none();
        };
        info!(path = %path.display(), "Decoding image file");

        Task::perform(
            async move {
                let decode_path = path.clone();
                let result = tokio::task::spawn_blocking(move || {
                    scanner::decode_image(&decode_path)
                })
                .await
                .unwrap_or_else(|e| Err(DecodeError::ImageLoad(e.to_string())));
                (path, result)
            },
            |(path, result)| cosmic::Action::App(Message::ImageDecoded(path, result)),
        )
    }

    pub(crate) fn handle_image_decoded(
        &mut self,
        path: PathBuf,
        result: Result<Vec<ScanResult>, DecodeError>,
    ) -> Task<cosmic::Action<Message>> {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match result {
            Ok(results) => match results.into_iter().next() {
                Some(found) => {
                    // A picked file replaces whatever the camera found
                    self.result = None;
                    self.handle_result(found)
                }
                None => self.show_toast(fl!("no-code-in-image", file = file.as_str())),
            },
            Err(DecodeError::NoCodeFound) => {
                self.show_toast(fl!("no-code-in-image", file = file.as_str()))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to decode image file");
                self.show_toast(fl!("image-load-failed", file = file.as_str()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::UriLauncher;
    use crate::backends::camera::types::CameraDevice;
    use crate::permission::PermissionState;
    use crate::scanner::FrameRegion;
    use cosmic::widget::about::About;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        opened: Mutex<Vec<String>>,
    }

    impl UriLauncher for RecordingLauncher {
        fn has_handler(&self, _scheme: &str) -> bool {
            true
        }

        fn open(&self, uri: &str) -> Result<(), ActionError> {
            self.opened.lock().unwrap().push(uri.to_string());
            Ok(())
        }
    }

    /// Model with a granted, running camera
    fn scanning_model() -> (AppModel, Arc<RecordingLauncher>) {
        let mut app = AppModel::new(
            cosmic::Core::default(),
            About::default(),
            Config::default(),
            None,
        );
        let launcher = Arc::new(RecordingLauncher::default());
        app.launcher = launcher.clone();
        app.permission = PermissionState::Granted;
        app.cameras_initialized = true;
        app.available_cameras = vec![CameraDevice {
            name: "Webcam".to_string(),
            path: "/dev/video0".to_string(),
            driver: None,
            v4l2_path: Some("/dev/video0".to_string()),
        }];
        assert!(app.camera_active());
        (app, launcher)
    }

    fn detection(text: &str) -> ScanResult {
        ScanResult::new(text, FrameRegion::from_pixels(10, 10, 50, 50, 100, 100))
    }

    fn shown_text(app: &AppModel) -> Option<&str> {
        app.result.as_ref().map(|r| r.text.as_str())
    }

    #[test]
    fn test_detection_opens_dialog() {
        let (mut app, launcher) = scanning_model();
        let _ = app.handle_detections_updated(vec![detection("hello")]);

        assert_eq!(shown_text(&app), Some("hello"));
        assert_eq!(app.detections.len(), 1);
        // Launching happens in a task, never inside update
        assert!(launcher.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_open_dialog_is_not_replaced_by_new_detections() {
        let (mut app, _) = scanning_model();
        let _ = app.handle_detections_updated(vec![detection("first")]);
        let _ = app.handle_detections_updated(vec![detection("second")]);

        assert_eq!(shown_text(&app), Some("first"));
    }

    #[test]
    fn test_dismissed_text_is_ignored_within_cooldown() {
        let (mut app, _) = scanning_model();
        let _ = app.handle_detections_updated(vec![detection("hello")]);
        let _ = app.handle_dismiss_result();
        assert_eq!(shown_text(&app), None);

        let _ = app.handle_detections_updated(vec![detection("hello")]);
        assert_eq!(shown_text(&app), None);

        let _ = app.handle_detections_updated(vec![detection("hello"), detection("world")]);
        assert_eq!(shown_text(&app), Some("world"));
    }

    #[test]
    fn test_copy_closes_dialog() {
        let (mut app, _) = scanning_model();
        let _ = app.handle_detections_updated(vec![detection("hello")]);
        let _ = app.handle_copy_result();

        assert_eq!(shown_text(&app), None);
        assert!(app.gate.is_duplicate("hello", Instant::now()));
    }

    #[test]
    fn test_detections_ignored_while_paused() {
        let (mut app, _) = scanning_model();
        app.paused = true;
        let _ = app.handle_detections_updated(vec![detection("hello")]);

        assert_eq!(shown_text(&app), None);
        assert!(app.detections.is_empty());
    }

    #[test]
    fn test_decoded_image_replaces_result() {
        let (mut app, _) = scanning_model();
        let _ = app.handle_detections_updated(vec![detection("from camera")]);

        let _ = app.handle_image_decoded(
            PathBuf::from("code.png"),
            Ok(vec![detection("https://example.com")]),
        );
        assert_eq!(shown_text(&app), Some("https://example.com"));
    }

    #[test]
    fn test_links_and_addresses_run_automatically_by_default() {
        let config = Config::default();
        assert!(runs_automatically(
            &ScanContent::classify("https://example.com"),
            &config
        ));
        assert!(runs_automatically(
            &ScanContent::classify("user@example.com"),
            &config
        ));
        assert!(!runs_automatically(
            &ScanContent::classify("just some text"),
            &config
        ));
    }

    #[test]
    fn test_automatic_actions_follow_config() {
        let config = Config {
            auto_open_urls: false,
            auto_compose_email: false,
            ..Default::default()
        };
        assert!(!runs_automatically(
            &ScanContent::classify("http://example.com"),
            &config
        ));
        assert!(!runs_automatically(
            &ScanContent::classify("user@example.com"),
            &config
        ));
    }
}
