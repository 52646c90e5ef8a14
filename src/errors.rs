// SPDX-License-Identifier: MPL-2.0

//! Error types for the scanner application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Camera permission errors
    Permission(PermissionError),
    /// Errors dispatching a decoded payload to another application
    Action(ActionError),
    /// Errors decoding codes from an image
    Decode(DecodeError),
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// Camera index out of range
    InvalidIndex { index: usize, count: usize },
    /// Pipeline could not be created or started
    PipelineFailed(String),
}

/// Camera portal errors
///
/// A refusal is not an error: it resolves to `PermissionState::Denied`.
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionError {
    /// The portal request failed before an answer arrived
    RequestFailed(String),
}

/// Action dispatch errors
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    /// No application handles `mailto:` URIs
    NoEmailClient,
    /// The handler could not be launched
    LaunchFailed { uri: String, reason: String },
}

/// Image decode errors
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The image file could not be read or parsed
    ImageLoad(String),
    /// The image contains no decodable code
    NoCodeFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Permission(e) => write!(f, "Permission error: {}", e),
            AppError::Action(e) => write!(f, "Action error: {}", e),
            AppError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::InvalidIndex { index, count } => {
                write!(f, "Camera index {} out of range ({} available)", index, count)
            }
            CameraError::PipelineFailed(msg) => write!(f, "Pipeline failed: {}", msg),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::RequestFailed(msg) => write!(f, "Permission request failed: {}", msg),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::NoEmailClient => write!(f, "No email client installed."),
            ActionError::LaunchFailed { uri, reason } => {
                write!(f, "Failed to open {}: {}", uri, reason)
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::ImageLoad(msg) => write!(f, "Failed to load image: {}", msg),
            DecodeError::NoCodeFound => write!(f, "No QR code found"),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PermissionError {}
impl std::error::Error for ActionError {}
impl std::error::Error for DecodeError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        AppError::Permission(err)
    }
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        AppError::Action(err)
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::Decode(err)
    }
}

impl From<image::ImageError> for DecodeError {
    fn from(err: image::ImageError) -> Self {
        DecodeError::ImageLoad(err.to_string())
    }
}

impl From<zbus::Error> for PermissionError {
    fn from(err: zbus::Error) -> Self {
        PermissionError::RequestFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_visible_messages() {
        assert_eq!(
            ActionError::NoEmailClient.to_string(),
            "No email client installed."
        );
    }

    #[test]
    fn test_sub_error_conversion() {
        let err: AppError = ActionError::NoEmailClient.into();
        assert_eq!(err, AppError::Action(ActionError::NoEmailClient));
        assert!(err.to_string().starts_with("Action error:"));
    }
}
