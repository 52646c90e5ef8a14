// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration
//!
//! PipeWire has no stable enumeration API usable from GStreamer, so camera
//! nodes are discovered by parsing `pw-cli ls Node`.

use super::super::types::CameraDevice;
use tracing::{debug, info, warn};

/// Enumerate cameras using PipeWire
///
/// Returns `None` when `pipewiresrc` is unusable. When PipeWire works but
/// `pw-cli` finds nothing, a single "Default Camera" entry lets PipeWire
/// auto-select.
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    if !is_pipewire_available() {
        return None;
    }

    if let Some(cameras) = try_enumerate_with_pw_cli() {
        return Some(cameras);
    }

    info!("Using PipeWire auto-selection (default camera)");
    Some(vec![CameraDevice {
        name: "Default Camera (PipeWire)".to_string(),
        path: String::new(),
        driver: None,
        v4l2_path: None,
    }])
}

/// Check whether GStreamer can build a `pipewiresrc`
pub fn is_pipewire_available() -> bool {
    if let Err(e) = gstreamer::init() {
        warn!(error = %e, "GStreamer init failed");
        return false;
    }
    let available = gstreamer::ElementFactory::find("pipewiresrc").is_some();
    if !available {
        debug!("pipewiresrc not available");
    }
    available
}

fn try_enumerate_with_pw_cli() -> Option<Vec<CameraDevice>> {
    let output = std::process::Command::new("pw-cli")
        .args(["ls", "Node"])
        .output()
        .ok()?;

    if !output.status.success() {
        debug!("pw-cli command failed");
        return None;
    }

    let cameras = parse_pw_cli_nodes(&String::from_utf8_lossy(&output.stdout));
    if cameras.is_empty() {
        debug!("No cameras found via pw-cli");
        None
    } else {
        debug!(count = cameras.len(), "Enumerated cameras via pw-cli");
        Some(cameras)
    }
}

/// Properties collected for one `pw-cli` node block
#[derive(Default)]
struct NodeBlock {
    id: String,
    serial: Option<String>,
    description: Option<String>,
    object_path: Option<String>,
    is_video_source: bool,
}

impl NodeBlock {
    fn into_camera(self) -> Option<CameraDevice> {
        if !self.is_video_source {
            return None;
        }
        let name = self.description?;

        // object.serial is what pipewiresrc's target-object expects; node IDs are reused
        let path = match self.serial {
            Some(serial) => format!("pipewire-serial-{}", serial),
            None => format!("pipewire-{}", self.id),
        };
        let v4l2_path = self
            .object_path
            .as_deref()
            .and_then(|p| p.strip_prefix("v4l2:"))
            .map(str::to_string);

        debug!(id = %self.id, name = %name, path = %path, "Found video camera");
        Some(CameraDevice {
            name,
            path,
            driver: None,
            v4l2_path,
        })
    }
}

/// Parse `pw-cli ls Node` output into camera devices
///
/// Blocks start with `id N, type PipeWire:Interface:Node/3` and are followed
/// by `key = "value"` property lines.
pub fn parse_pw_cli_nodes(output: &str) -> Vec<CameraDevice> {
    let mut cameras = Vec::new();
    let mut current: Option<NodeBlock> = None;

    for line in output.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("id ") && trimmed.contains("type PipeWire:Interface:Node") {
            if let Some(camera) = current.take().and_then(NodeBlock::into_camera) {
                cameras.push(camera);
            }
            let id = trimmed
                .strip_prefix("id ")
                .and_then(|rest| rest.split(',').next())
                .unwrap_or_default()
                .trim()
                .to_string();
            current = Some(NodeBlock {
                id,
                ..Default::default()
            });
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };
        let Some((key, _)) = trimmed.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = extract_quoted_value(trimmed);

        match key {
            "media.class" => block.is_video_source = value.as_deref() == Some("Video/Source"),
            "object.serial" => block.serial = value,
            "object.path" => block.object_path = value,
            "node.description" => block.description = value,
            _ => {}
        }
    }

    if let Some(camera) = current.and_then(NodeBlock::into_camera) {
        cameras.push(camera);
    }

    cameras
}

/// Extract quoted value from a property line (e.g., 'property = "value"' -> "value")
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line[start + 1..].find('"')?;
    Some(line[start + 1..start + 1 + end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PW_CLI_OUTPUT: &str = r#"
	id 32, type PipeWire:Interface:Node/3
 		object.serial = "32"
 		factory.id = "10"
 		node.description = "Dummy-Driver"
 		node.name = "Dummy-Driver"
	id 76, type PipeWire:Interface:Node/3
 		object.serial = "2146"
 		object.path = "v4l2:/dev/video0"
 		factory.id = "14"
 		node.description = "Integrated Camera (V4L2)"
 		media.class = "Video/Source"
	id 81, type PipeWire:Interface:Node/3
 		node.description = "USB Webcam"
 		media.class = "Video/Source"
"#;

    #[test]
    fn test_parse_pw_cli_nodes() {
        let cameras = parse_pw_cli_nodes(PW_CLI_OUTPUT);
        assert_eq!(cameras.len(), 2);

        assert_eq!(cameras[0].name, "Integrated Camera (V4L2)");
        assert_eq!(cameras[0].path, "pipewire-serial-2146");
        assert_eq!(cameras[0].v4l2_path.as_deref(), Some("/dev/video0"));

        // No serial: fall back to the node id
        assert_eq!(cameras[1].name, "USB Webcam");
        assert_eq!(cameras[1].path, "pipewire-81");
        assert_eq!(cameras[1].v4l2_path, None);
    }

    #[test]
    fn test_parse_ignores_audio_sources() {
        let output = r#"
	id 40, type PipeWire:Interface:Node/3
 		node.description = "Built-in Microphone"
 		media.class = "Audio/Source"
"#;
        assert!(parse_pw_cli_nodes(output).is_empty());
    }

    #[test]
    fn test_extract_quoted_value() {
        assert_eq!(
            extract_quoted_value(r#"object.serial = "2146""#).as_deref(),
            Some("2146")
        );
        assert_eq!(extract_quoted_value("object.serial = 2146"), None);
    }
}
