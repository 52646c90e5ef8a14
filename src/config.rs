// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::CameraBackendType;
use crate::constants::{email, scan};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// All variants in settings dropdown order
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }

    /// Position in [`AppTheme::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Camera backend used for enumeration and capture
    pub backend: CameraBackendType,
    /// Last used camera device path
    pub last_camera_path: Option<String>,
    /// Mirror camera preview horizontally (selfie mode)
    pub mirror_preview: bool,
    /// Open decoded web links in the browser as soon as they are scanned
    pub auto_open_urls: bool,
    /// Open the mail composer as soon as an email address is scanned
    pub auto_compose_email: bool,
    /// Stop the camera while the window is unfocused
    pub pause_when_unfocused: bool,
    /// Subject prefilled when composing an email
    pub email_subject: String,
    /// Body prefilled when composing an email
    pub email_body: String,
    /// Minimum time between detection passes in milliseconds
    pub scan_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            backend: CameraBackendType::default(),
            last_camera_path: None,
            mirror_preview: true,
            auto_open_urls: true,
            auto_compose_email: true,
            pause_when_unfocused: true,
            email_subject: email::DEFAULT_SUBJECT.to_string(),
            email_body: email::DEFAULT_BODY.to_string(),
            scan_interval_ms: scan::DEFAULT_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Detection interval, clamped so a bad config value can't spin the decoder
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms.max(scan::MIN_INTERVAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_interval_is_clamped() {
        let config = Config {
            scan_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(
            config.scan_interval(),
            Duration::from_millis(scan::MIN_INTERVAL_MS)
        );
    }

    #[test]
    fn test_theme_index_roundtrip() {
        for theme in AppTheme::ALL {
            assert_eq!(AppTheme::ALL[theme.index()], theme);
        }
    }
}
