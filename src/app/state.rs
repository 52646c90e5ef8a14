// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::actions::{SystemLauncher, UriLauncher};
use crate::backends::camera::types::{CameraDevice, CameraFrame};
use crate::config::Config;
use crate::errors::{ActionError, DecodeError};
use crate::permission::PermissionState;
use crate::scanner::{QrDetector, ScanGate, ScanResult};
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use cosmic::widget::image::Handle;
use cosmic::widget::toaster::{ToastId, Toasts};
use std::path::PathBuf;
use std::sync::Arc;

/// Pages shown in the context drawer
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Scanner lifecycle as shown in the main area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerStatus {
    /// Waiting on the permission prompt
    WaitingForPermission,
    /// The user refused camera access
    PermissionDenied,
    /// Enumerating cameras
    Initializing,
    /// Permission granted but no device
    NoCamera,
    /// Stopped by the user or by losing focus
    Paused,
    /// Camera running
    Scanning,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Transient notifications
    pub toasts: Toasts<Message>,

    // ===== Camera =====
    /// Camera portal answer
    pub permission: PermissionState,
    /// Set once the first enumeration finished
    pub cameras_initialized: bool,
    pub available_cameras: Vec<CameraDevice>,
    pub current_camera_index: usize,
    /// Camera names for the settings dropdown
    pub camera_dropdown_options: Vec<String>,
    /// Scanning paused from the header button
    pub paused: bool,
    pub window_focused: bool,
    /// Latest frame, kept for detection
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Latest frame converted for display
    pub preview: Option<Handle>,

    // ===== Scanning =====
    pub detector: QrDetector,
    pub gate: ScanGate,
    /// Codes found in the latest sampled frame, for the overlay
    pub detections: Vec<ScanResult>,
    /// Result shown in the dialog; scanning is on hold while set
    pub result: Option<ScanResult>,
    /// Opens links and mail composers
    pub launcher: Arc<dyn UriLauncher>,

    // ===== Settings =====
    pub theme_dropdown_options: Vec<String>,
    pub backend_dropdown_options: Vec<String>,
}

impl AppModel {
    /// Build the model around a loaded config
    pub fn new(
        core: cosmic::Core,
        about: About,
        config: Config,
        config_handler: Option<cosmic_config::Config>,
    ) -> Self {
        use crate::backends::camera::CameraBackendType;
        use crate::fl;

        let gate = ScanGate::new(config.scan_interval());
        Self {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            toasts: Toasts::new(Message::CloseToast),
            permission: PermissionState::Unknown,
            cameras_initialized: false,
            available_cameras: Vec::new(),
            current_camera_index: 0,
            camera_dropdown_options: Vec::new(),
            paused: false,
            window_focused: true,
            current_frame: None,
            preview: None,
            detector: QrDetector::new(),
            gate,
            detections: Vec::new(),
            result: None,
            launcher: Arc::new(SystemLauncher),
            theme_dropdown_options: vec![fl!("match-desktop"), fl!("dark"), fl!("light")],
            backend_dropdown_options: CameraBackendType::ALL
                .iter()
                .map(|b| b.to_string())
                .collect(),
        }
    }

    /// Currently selected camera, if any
    pub fn current_camera(&self) -> Option<&CameraDevice> {
        self.available_cameras.get(self.current_camera_index)
    }

    /// Whether the camera pipeline should be running
    pub fn camera_active(&self) -> bool {
        self.permission.is_granted()
            && self.current_camera().is_some()
            && !self.paused
            && (self.window_focused || !self.config.pause_when_unfocused)
    }

    /// What the main area should show
    pub fn status(&self) -> ScannerStatus {
        match self.permission {
            PermissionState::Unknown | PermissionState::Requesting => {
                ScannerStatus::WaitingForPermission
            }
            PermissionState::Denied => ScannerStatus::PermissionDenied,
            PermissionState::Granted if !self.cameras_initialized => ScannerStatus::Initializing,
            PermissionState::Granted if self.available_cameras.is_empty() => {
                ScannerStatus::NoCamera
            }
            PermissionState::Granted if !self.camera_active() => ScannerStatus::Paused,
            PermissionState::Granted => ScannerStatus::Scanning,
        }
    }
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),
    /// Toast dismissed or expired
    CloseToast(ToastId),
    /// Window gained (true) or lost (false) focus
    WindowFocused(bool),

    // ===== Permission =====
    /// Ask the camera portal (again)
    RequestPermission,
    /// Portal answered
    PermissionResolved(PermissionState),

    // ===== Camera Control =====
    /// Cameras enumerated after permission was granted
    CamerasInitialized(Vec<CameraDevice>, Option<usize>),
    /// Camera list changed (hotplug event)
    CameraListChanged(Vec<CameraDevice>),
    /// Select specific camera by index
    SelectCamera(usize),
    /// New camera frame received from pipeline
    CameraFrame(Arc<CameraFrame>),
    /// Pause or resume from the header button
    TogglePause,

    // ===== Scanning =====
    /// Detection pass over a sampled frame finished
    DetectionsUpdated(Vec<ScanResult>),
    /// Open the image file picker
    PickImage,
    /// File picker closed
    ImagePicked(Option<PathBuf>),
    /// Image file decoded
    ImageDecoded(PathBuf, Result<Vec<ScanResult>, DecodeError>),

    // ===== Result Dialog =====
    /// Copy the shown result and close the dialog
    CopyResult,
    /// Close the dialog
    DismissResult,
    /// Open the shown link
    OpenResultUrl,
    /// Compose an email to the shown address
    ComposeResultEmail,
    /// Opening a link or mail composer failed
    ActionFailed(ActionError),

    // ===== Settings =====
    UpdateConfig(Config),
    SelectTheme(usize),
    SelectBackend(usize),
    ToggleMirrorPreview,
    ToggleAutoOpenUrls,
    ToggleAutoComposeEmail,
    TogglePauseWhenUnfocused,

    /// No operation (used for async tasks that don't need a response)
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_camera(config: Config) -> AppModel {
        let mut app = AppModel::new(cosmic::Core::default(), About::default(), config, None);
        app.permission = PermissionState::Granted;
        app.cameras_initialized = true;
        app.available_cameras = vec![CameraDevice {
            name: "Webcam".to_string(),
            path: "/dev/video0".to_string(),
            driver: None,
            v4l2_path: None,
        }];
        app
    }

    #[test]
    fn test_camera_stops_when_window_loses_focus() {
        let mut app = model_with_camera(Config::default());
        assert_eq!(app.status(), ScannerStatus::Scanning);

        app.window_focused = false;
        assert!(!app.camera_active());
        assert_eq!(app.status(), ScannerStatus::Paused);
    }

    #[test]
    fn test_camera_keeps_running_unfocused_when_disabled() {
        let mut app = model_with_camera(Config {
            pause_when_unfocused: false,
            ..Default::default()
        });
        app.window_focused = false;
        assert!(app.camera_active());
    }

    #[test]
    fn test_no_camera_before_permission() {
        let mut app = model_with_camera(Config::default());
        app.permission = PermissionState::Denied;
        assert!(!app.camera_active());
        assert_eq!(app.status(), ScannerStatus::PermissionDenied);
    }
}
