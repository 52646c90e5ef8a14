// SPDX-License-Identifier: MPL-2.0

//! GStreamer pipeline delivering RGBA frames for scanning and preview

use super::CameraBackend;
use super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Build the `gst_parse_launch` description for a camera source element
///
/// `decodebin` handles both MJPEG and raw sources; everything downstream
/// only ever sees RGBA.
pub fn pipeline_description(source: &str) -> String {
    format!(
        "{source} ! decodebin ! videoconvert ! videoscale ! video/x-raw,format={fmt} ! appsink name=sink",
        fmt = pipeline::OUTPUT_FORMAT,
    )
}

/// Camera capture pipeline
///
/// The pipeline runs as long as this value lives; dropping it sets the
/// pipeline to `Null` which releases the camera.
pub struct ScanPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    frames: Arc<AtomicU64>,
}

impl ScanPipeline {
    /// Create and start a pipeline for `device` on `backend`
    pub fn new(
        backend: &dyn CameraBackend,
        device: &CameraDevice,
        frame_sender: FrameSender,
    ) -> BackendResult<Self> {
        gstreamer::init()?;

        let description = pipeline_description(&backend.source_element(device));
        info!(
            device = %device.name,
            backend = %backend.backend_type(),
            pipeline = %description,
            "Creating scan pipeline"
        );

        let pipeline = gstreamer::parse::launch(&description)?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| BackendError::MissingElement("pipeline"))?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or(BackendError::MissingElement("appsink"))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| BackendError::MissingElement("appsink"))?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frames = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&frames);

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = counter.fetch_add(1, Ordering::Relaxed);
                    let log_this = frame_num % timing::FRAME_LOG_INTERVAL == 0;

                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info = VideoInfo::from_caps(caps).map_err(|e| {
                        if log_this {
                            error!(frame = frame_num, error = ?e, "Failed to get video info");
                        }
                        gstreamer::FlowError::Error
                    })?;
                    let map = buffer.map_readable().map_err(|_| gstreamer::FlowError::Error)?;

                    let format = PixelFormat::from_gst_format(&video_info.format().to_string())
                        .unwrap_or(PixelFormat::RGBA);
                    let frame = CameraFrame {
                        width: video_info.width(),
                        height: video_info.height(),
                        data: Arc::from(map.as_slice()),
                        format,
                        stride: video_info.stride()[0] as u32,
                        captured_at: Instant::now(),
                    };

                    let mut sender = frame_sender.clone();
                    match sender.try_send(frame) {
                        Ok(()) => {
                            if log_this {
                                debug!(
                                    frame = frame_num,
                                    width = video_info.width(),
                                    height = video_info.height(),
                                    "Frame delivered"
                                );
                            }
                        }
                        Err(e) if e.is_disconnected() => {
                            debug!("Frame receiver gone, stopping stream");
                            return Err(gstreamer::FlowError::Eos);
                        }
                        Err(_) => {
                            if log_this {
                                debug!(frame = frame_num, "Frame dropped (channel full)");
                            }
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| BackendError::StartFailed(e.to_string()))?;

        let (result, state, _) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        if let Err(e) = result {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::StartFailed(e.to_string()));
        }
        if state != gstreamer::State::Playing {
            // Live sources may still be prerolling; frames arrive once they do
            warn!(state = ?state, "Pipeline is not in PLAYING state yet");
        }

        Ok(Self {
            pipeline,
            appsink,
            frames,
        })
    }

    /// Number of samples received so far
    pub fn frame_count(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Pop an error posted on the pipeline bus, if any
    pub fn poll_error(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        while let Some(msg) = bus.pop_filtered(&[
            gstreamer::MessageType::Error,
            gstreamer::MessageType::Eos,
        ]) {
            match msg.view() {
                gstreamer::MessageView::Error(err) => return Some(err.error().to_string()),
                gstreamer::MessageView::Eos(_) => return Some("End of stream".to_string()),
                _ => {}
            }
        }
        None
    }
}

impl Drop for ScanPipeline {
    fn drop(&mut self) {
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to stop pipeline");
            return;
        }
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, frames = self.frame_count(), "Scan pipeline stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_description() {
        assert_eq!(
            pipeline_description("v4l2src device=/dev/video0"),
            "v4l2src device=/dev/video0 ! decodebin ! videoconvert ! videoscale ! \
             video/x-raw,format=RGBA ! appsink name=sink"
        );
    }
}
