// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Scanner tuning
pub mod scan {
    use super::Duration;

    /// Longest frame side (in pixels) handed to the decoder; larger frames are downscaled
    pub const MAX_DECODE_DIMENSION: u32 = 640;

    /// Default minimum time between two detection passes
    pub const DEFAULT_INTERVAL_MS: u64 = 500;

    /// Lower bound for the configurable detection interval
    pub const MIN_INTERVAL_MS: u64 = 100;

    /// Ignore the same payload for this long after its dialog was dismissed
    pub const DUPLICATE_COOLDOWN: Duration = Duration::from_secs(2);
}

/// Default mail composer fields
pub mod email {
    pub const DEFAULT_SUBJECT: &str = "Subject";
    pub const DEFAULT_BODY: &str = "Body";
}

/// URI schemes dispatched to external applications
pub mod schemes {
    pub const HTTP_PREFIX: &str = "http://";
    pub const HTTPS_PREFIX: &str = "https://";
    pub const MAILTO: &str = "mailto";
}

/// GStreamer pipeline settings
pub mod pipeline {
    /// Maximum buffers queued in appsink before old frames are dropped
    pub const MAX_BUFFERS: u32 = 2;

    /// Frame channel capacity between the pipeline and the UI
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;

    /// Output format delivered to the application
    pub const OUTPUT_FORMAT: &str = "RGBA";
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Timeout for pipeline stop (seconds)
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Timeout for pipeline start (seconds)
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Delay before retrying a failed camera pipeline
    pub const PIPELINE_RETRY_DELAY: Duration = Duration::from_secs(5);

    /// Poll interval while waiting for frames (lets the loop notice cancellation)
    pub const FRAME_POLL_TIMEOUT: Duration = Duration::from_millis(16);

    /// Interval between camera hotplug checks
    pub const HOTPLUG_POLL_INTERVAL: Duration = Duration::from_secs(2);
}

/// UI sizing
pub mod ui {
    /// Border width for detection boxes (in pixels)
    pub const OVERLAY_BORDER_WIDTH: f32 = 3.0;

    /// Corner radius for detection boxes
    pub const OVERLAY_BORDER_RADIUS: f32 = 8.0;

    /// Minimum size for detection boxes
    pub const MIN_OVERLAY_SIZE: f32 = 60.0;

    /// Longest side of the preview image, larger frames are sampled down
    pub const PREVIEW_MAX_DIMENSION: u32 = 1280;

    /// Minimum window size
    pub const MIN_WINDOW_WIDTH: f32 = 360.0;
    pub const MIN_WINDOW_HEIGHT: f32 = 240.0;
}

/// Image file types accepted by "Scan image file"
pub mod file_formats {
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if an extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}
