// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission via the XDG desktop portal
//!
//! Sandboxed apps must ask `org.freedesktop.portal.Camera` before PipeWire
//! exposes any camera node. Outside a sandbox there usually is no camera
//! portal and devices can be opened directly.

use crate::errors::PermissionError;
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";
const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// Camera access state as seen by the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionState {
    /// Not asked yet
    #[default]
    Unknown,
    /// Waiting for the user to answer the portal dialog
    Requesting,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Map a `Request.Response` code to a permission state
///
/// 0 means the user allowed access; 1 (cancelled) and 2 (other) are denials.
pub fn state_from_response(code: u32) -> PermissionState {
    if code == 0 {
        PermissionState::Granted
    } else {
        PermissionState::Denied
    }
}

/// Object path of the `Request` the portal will create for `token`
///
/// The sender part is the connection's unique name without the leading
/// `:` and with every `.` replaced by `_`.
pub fn request_path(unique_name: &str, token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", PORTAL_PATH, sender, token)
}

/// Whether a D-Bus error name means "there is no camera portal here"
fn is_portal_missing(error_name: &str) -> bool {
    matches!(
        error_name,
        "org.freedesktop.DBus.Error.ServiceUnknown"
            | "org.freedesktop.DBus.Error.UnknownInterface"
            | "org.freedesktop.DBus.Error.UnknownMethod"
            | "org.freedesktop.DBus.Error.UnknownObject"
            | "org.freedesktop.DBus.Error.UnknownProperty"
            | "org.freedesktop.DBus.Error.NameHasNoOwner"
    )
}

/// Ask for camera access and wait for the answer
///
/// Without a reachable camera portal the camera is opened directly, so this
/// resolves to [`PermissionState::Granted`]. A portal request that fails
/// midway resolves to [`PermissionState::Denied`].
pub async fn request_camera_access() -> PermissionState {
    match access_camera().await {
        Ok(Some(state)) => {
            info!(state = ?state, "Camera portal answered");
            state
        }
        Ok(None) => {
            info!("No camera portal available, using direct device access");
            PermissionState::Granted
        }
        Err(e) => {
            error!(error = %e, "Camera permission request failed");
            PermissionState::Denied
        }
    }
}

/// Returns `Ok(None)` when no camera portal is reachable
async fn access_camera() -> Result<Option<PermissionState>, PermissionError> {
    let connection = match zbus::Connection::session().await {
        Ok(connection) => connection,
        Err(e) => {
            debug!(error = %e, "No session bus");
            return Ok(None);
        }
    };

    let camera = zbus::Proxy::new(&connection, PORTAL_DESTINATION, PORTAL_PATH, CAMERA_INTERFACE)
        .await?;

    let properties = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        PORTAL_PATH,
        PROPERTIES_INTERFACE,
    )
    .await?;
    let present: zbus::Result<OwnedValue> = properties
        .call("Get", &(CAMERA_INTERFACE, "IsCameraPresent"))
        .await;
    match present {
        Ok(value) => {
            if matches!(bool::try_from(value), Ok(false)) {
                // Still ask: a camera plugged in later needs the grant too
                info!("Portal reports no camera present");
            }
        }
        Err(zbus::Error::MethodError(name, _, _)) if is_portal_missing(name.as_str()) => {
            debug!(error = %name.as_str(), "Camera portal interface missing");
            return Ok(None);
        }
        Err(e) => warn!(error = %e, "Failed to query IsCameraPresent"),
    }

    let unique_name = connection
        .unique_name()
        .map(|name| name.to_string())
        .ok_or_else(|| PermissionError::RequestFailed("connection has no unique name".into()))?;
    let token = format!("qr_scanner_{}", uuid::Uuid::new_v4().simple());
    let expected_path = request_path(&unique_name, &token);

    // Subscribe before calling so a fast answer isn't missed
    let request = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        expected_path.clone(),
        REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::from(token.as_str()));

    debug!(path = %expected_path, "Requesting camera access");
    let handle: OwnedObjectPath = match camera.call("AccessCamera", &(options,)).await {
        Ok(handle) => handle,
        Err(zbus::Error::MethodError(name, _, _)) if is_portal_missing(name.as_str()) => {
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    if handle.as_str() != expected_path {
        // Older portals ignore handle_token and pick their own path
        warn!(handle = %handle.as_str(), "Portal returned an unexpected request path");
        let request = zbus::Proxy::new(
            &connection,
            PORTAL_DESTINATION,
            handle.as_str().to_string(),
            REQUEST_INTERFACE,
        )
        .await?;
        let mut responses = request.receive_signal("Response").await?;
        return read_response(&mut responses).await.map(Some);
    }

    read_response(&mut responses).await.map(Some)
}

async fn read_response(
    responses: &mut zbus::proxy::SignalStream<'_>,
) -> Result<PermissionState, PermissionError> {
    let message = responses.next().await.ok_or_else(|| {
        PermissionError::RequestFailed("portal closed the request without answering".into())
    })?;
    let (code, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;
    debug!(code, "Camera portal response");
    Ok(state_from_response(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_response() {
        assert_eq!(state_from_response(0), PermissionState::Granted);
        assert_eq!(state_from_response(1), PermissionState::Denied);
        assert_eq!(state_from_response(2), PermissionState::Denied);
    }

    #[test]
    fn test_request_path() {
        assert_eq!(
            request_path(":1.42", "qr_scanner_abc"),
            "/org/freedesktop/portal/desktop/request/1_42/qr_scanner_abc"
        );
    }

    #[test]
    fn test_portal_missing_errors() {
        assert!(is_portal_missing("org.freedesktop.DBus.Error.ServiceUnknown"));
        assert!(is_portal_missing("org.freedesktop.DBus.Error.UnknownInterface"));
        assert!(!is_portal_missing("org.freedesktop.portal.Error.NotAllowed"));
    }

    #[test]
    fn test_default_state() {
        assert_eq!(PermissionState::default(), PermissionState::Unknown);
        assert!(!PermissionState::Requesting.is_granted());
        assert!(PermissionState::Granted.is_granted());
    }
}
