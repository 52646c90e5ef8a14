// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for headless scanning
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Decoding QR codes in image files
//! - Scanning from a camera until a code shows up

use chrono::{DateTime, Local};
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use futures::channel::mpsc;
use qr_scanner::actions::{self, EmailTemplate, ScanContent, SystemLauncher};
use qr_scanner::app::AppModel;
use qr_scanner::backends::camera::types::{CameraDevice, CameraFrame};
use qr_scanner::backends::camera::{CameraBackendType, ScanPipeline, get_backend};
use qr_scanner::config::Config;
use qr_scanner::constants::{pipeline, timing};
use qr_scanner::errors::{AppResult, CameraError, DecodeError};
use qr_scanner::scanner::{self, FrameRegion, QrDetector, ScanResult};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// List all available cameras
pub fn list_cameras(backend_type: CameraBackendType) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let backend = get_backend(backend_type);
    if !backend.is_available() {
        return Err(format!("{} backend is not available", backend_type).into());
    }

    let cameras = backend.enumerate_cameras();
    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras ({}):", backend_type);
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        for line in camera_summary(index, camera) {
            println!("{}", line);
        }

        let mut formats = backend.get_formats(camera);
        if !formats.is_empty() {
            // Sort by resolution (highest first) and show the top 3
            formats.sort_by(|a, b| (b.width * b.height).cmp(&(a.width * a.height)));
            formats.dedup_by(|a, b| a.width == b.width && a.height == b.height);
            let res_strs: Vec<String> = formats.iter().take(3).map(|f| f.to_string()).collect();
            println!("      Formats: {}", res_strs.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Name, path and driver lines for `list`
fn camera_summary(index: usize, camera: &CameraDevice) -> Vec<String> {
    let mut lines = vec![format!("  [{}] {}", index, camera.name)];
    if !camera.path.is_empty() {
        lines.push(format!("      Path: {}", camera.path));
    }
    if let Some(driver) = &camera.driver {
        lines.push(format!("      Driver: {}", driver));
    }
    lines
}

/// One decoded code in `decode --json` output
#[derive(Serialize)]
struct JsonCode<'a> {
    text: &'a str,
    kind: &'static str,
    region: FrameRegion,
}

/// One file in `decode --json` output
#[derive(Serialize)]
struct JsonFile<'a> {
    file: String,
    scanned_at: DateTime<Local>,
    codes: Vec<JsonCode<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn content_kind(content: &ScanContent) -> &'static str {
    match content {
        ScanContent::Url(_) => "url",
        ScanContent::Email(_) => "email",
        ScanContent::Text(_) => "text",
    }
}

/// Decode every code in each image file and print it
pub fn decode_files(files: &[PathBuf], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let decoded: Vec<(&PathBuf, Result<Vec<ScanResult>, DecodeError>)> = files
        .iter()
        .map(|path| (path, scanner::decode_image(path)))
        .collect();

    let failures = decoded
        .iter()
        .filter(|(_, result)| matches!(result, Err(DecodeError::ImageLoad(_))))
        .count();

    if json {
        let output: Vec<JsonFile<'_>> = decoded
            .iter()
            .map(|(path, result)| {
                let (codes, error) = match result {
                    Ok(results) => (
                        results
                            .iter()
                            .map(|r| JsonCode {
                                text: &r.text,
                                kind: content_kind(&r.content()),
                                region: r.region,
                            })
                            .collect(),
                        None,
                    ),
                    Err(DecodeError::NoCodeFound) => (Vec::new(), None),
                    Err(e) => (Vec::new(), Some(e.to_string())),
                };
                JsonFile {
                    file: path.display().to_string(),
                    scanned_at: Local::now(),
                    codes,
                    error,
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (path, result) in &decoded {
            match result {
                Ok(results) => {
                    for r in results {
                        println!("{}: {}", path.display(), r.text);
                    }
                }
                Err(DecodeError::NoCodeFound) => {
                    eprintln!("{}: no QR code found", path.display());
                }
                Err(e) => eprintln!("{}: {}", path.display(), e),
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} file(s) could not be read", failures).into());
    }
    Ok(())
}

/// Scan from a camera and print the first decoded text
pub fn scan(
    backend_type: CameraBackendType,
    camera_index: usize,
    timeout_secs: u64,
    open: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let backend = get_backend(backend_type);
    let cameras = backend.enumerate_cameras();
    let camera = pick_camera(&cameras, camera_index)?;
    eprintln!("Using camera: {}", camera.name);

    let config = load_config();
    let (sender, mut receiver) = mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);
    let scan_pipeline = ScanPipeline::new(backend.as_ref(), camera, sender)
        .map_err(CameraError::from)?;

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    eprintln!("Scanning... (press Ctrl+C to stop)");

    let detector = QrDetector::new();
    let interval = config.scan_interval();
    let deadline = (timeout_secs > 0).then(|| Instant::now() + Duration::from_secs(timeout_secs));
    let mut last_sample: Option<Instant> = None;

    let found = loop {
        if stop_flag.load(Ordering::SeqCst) {
            eprintln!("Cancelled");
            break None;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break None;
        }
        if let Some(err) = scan_pipeline.poll_error() {
            return Err(CameraError::PipelineFailed(err).into());
        }

        let Some(frame) = latest_frame(&mut receiver) else {
            std::thread::sleep(timing::FRAME_POLL_TIMEOUT);
            continue;
        };

        let now = Instant::now();
        if last_sample.is_some_and(|last| now.duration_since(last) < interval) {
            continue;
        }
        last_sample = Some(now);

        if let Some(result) = detector.detect_sync(&frame).into_iter().next() {
            break Some(result);
        }
    };

    drop(scan_pipeline);

    let Some(result) = found else {
        if deadline.is_some() && !stop_flag.load(Ordering::SeqCst) {
            return Err("No QR code found before the timeout".into());
        }
        return Ok(());
    };

    println!("{}", result.text);

    if open {
        let content = result.content();
        let template = EmailTemplate::from(&config);
        actions::perform_default_action(&SystemLauncher, &content, &template)?;
    }

    Ok(())
}

/// Newest queued frame, skipping older ones
///
/// The appsink callback owns the sender until the pipeline is dropped, so
/// `None` only means no frame is queued yet.
fn latest_frame(receiver: &mut mpsc::Receiver<CameraFrame>) -> Option<CameraFrame> {
    let mut latest = None;
    while let Ok(frame) = receiver.try_recv() {
        latest = Some(frame);
    }
    latest
}

/// Camera at `index`, or why there is none
fn pick_camera(cameras: &[CameraDevice], index: usize) -> AppResult<&CameraDevice> {
    if cameras.is_empty() {
        return Err(CameraError::NoCameraFound.into());
    }
    cameras.get(index).ok_or_else(|| {
        CameraError::InvalidIndex {
            index,
            count: cameras.len(),
        }
        .into()
    })
}

/// Settings saved by the GUI, or the defaults
fn load_config() -> Config {
    use cosmic::Application;

    cosmic_config::Config::new(AppModel::APP_ID, Config::VERSION)
        .ok()
        .map(|handler| Config::get_entry(&handler).unwrap_or_else(|(_, config)| config))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qr_scanner::errors::AppError;

    fn camera(name: &str) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: format!("/dev/{}", name),
            driver: None,
            v4l2_path: None,
        }
    }

    #[test]
    fn test_pick_camera() {
        let cameras = vec![camera("video0"), camera("video2")];
        assert_eq!(pick_camera(&cameras, 1).map(|c| c.name.as_str()), Ok("video2"));
        assert_eq!(
            pick_camera(&cameras, 2),
            Err(AppError::Camera(CameraError::InvalidIndex { index: 2, count: 2 }))
        );
        assert_eq!(
            pick_camera(&[], 0),
            Err(AppError::Camera(CameraError::NoCameraFound))
        );
    }

    #[test]
    fn test_camera_summary_shows_driver() {
        let mut usb = camera("video0");
        usb.driver = Some("uvcvideo".to_string());
        assert_eq!(
            camera_summary(0, &usb),
            vec![
                "  [0] video0".to_string(),
                "      Path: /dev/video0".to_string(),
                "      Driver: uvcvideo".to_string(),
            ]
        );

        let default = CameraDevice {
            path: String::new(),
            ..camera("Default Camera")
        };
        assert_eq!(camera_summary(1, &default), vec!["  [1] Default Camera".to_string()]);
    }

    #[test]
    fn test_latest_frame_skips_stale_frames() {
        use qr_scanner::backends::camera::types::PixelFormat;

        let (mut sender, mut receiver) = mpsc::channel(4);
        assert!(latest_frame(&mut receiver).is_none());

        for width in [1, 2, 3] {
            sender
                .try_send(CameraFrame::packed(width, 1, PixelFormat::Gray8, vec![0; width as usize]))
                .unwrap();
        }
        assert_eq!(latest_frame(&mut receiver).map(|f| f.width), Some(3));
        assert!(latest_frame(&mut receiver).is_none());
    }

    #[test]
    fn test_content_kind() {
        assert_eq!(content_kind(&ScanContent::classify("https://example.com")), "url");
        assert_eq!(content_kind(&ScanContent::classify("user@example.com")), "email");
        assert_eq!(content_kind(&ScanContent::classify("hello")), "text");
    }
}
