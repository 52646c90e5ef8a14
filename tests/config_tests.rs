// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use qr_scanner::Config;
use qr_scanner::backends::camera::CameraBackendType;
use qr_scanner::config::AppTheme;
use std::time::Duration;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(
        config.mirror_preview,
        "Mirror preview should be enabled by default"
    );
    assert!(config.auto_open_urls, "Links should open automatically");
    assert!(
        config.auto_compose_email,
        "Email addresses should open the composer automatically"
    );
    assert!(
        config.pause_when_unfocused,
        "Camera should stop while another window has focus"
    );
    assert_eq!(config.app_theme, AppTheme::System);
    assert_eq!(config.backend, CameraBackendType::PipeWire);
    assert!(config.last_camera_path.is_none());
}

#[test]
fn test_config_email_template_defaults() {
    let config = Config::default();
    assert_eq!(config.email_subject, "Subject");
    assert_eq!(config.email_body, "Body");

    let template = qr_scanner::EmailTemplate::from(&config);
    assert_eq!(template, qr_scanner::EmailTemplate::default());
}

#[test]
fn test_config_scan_interval() {
    let config = Config::default();
    assert_eq!(config.scan_interval(), Duration::from_millis(500));

    let fast = Config {
        scan_interval_ms: 10,
        ..Default::default()
    };
    assert!(
        fast.scan_interval() >= Duration::from_millis(100),
        "Interval should be clamped to the minimum"
    );
}

#[test]
fn test_config_serde_roundtrip() {
    let config = Config {
        backend: CameraBackendType::V4l2,
        last_camera_path: Some("/dev/video2".to_string()),
        ..Default::default()
    };
    let json = serde_json::to_string(&config).expect("serialize");
    let restored: Config = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, config);
}
