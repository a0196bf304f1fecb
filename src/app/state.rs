// SPDX-License-Identifier: GPL-3.0-only

//! Host state and message types

use crate::backends::camera::{CaptureEvent, RawPhotoBuffer};
use crate::config::Config;
use crate::errors::CameraError;
use crate::frame_processor::MetadataBatch;
use crate::geometry::{Size, space};
use crate::orientation::{UiOrientation, VideoOrientation};
use crate::overlay::{DetectionAdapter, OverlayState};
use crate::pipelines::photo::{CaptureOutcome, CaptureState, PhotoCapturePipeline};
use uuid::Uuid;

/// Everything the host reacts to
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Metadata =====
    /// Detections for one preview frame
    Detections(MetadataBatch),

    // ===== Layout =====
    /// The preview area changed size
    ViewportResized(Size<space::Viewport>),
    /// The host reported a new interface orientation
    OrientationChanged(UiOrientation),

    // ===== Capture =====
    /// The user pressed the shutter
    TriggerCapture,
    /// The collaborator acknowledged a capture call
    CaptureStarted(Uuid),
    /// The collaborator delivered a photo or an error
    CaptureFinished(Uuid, Result<RawPhotoBuffer, CameraError>),
}

impl From<CaptureEvent> for Message {
    fn from(event: CaptureEvent) -> Self {
        match event {
            CaptureEvent::Started(id) => Message::CaptureStarted(id),
            CaptureEvent::Finished(id, result) => Message::CaptureFinished(id, result),
        }
    }
}

impl From<MetadataBatch> for Message {
    fn from(batch: MetadataBatch) -> Self {
        Message::Detections(batch)
    }
}

/// The viewfinder core as seen by the UI
pub struct Viewfinder {
    pub(super) adapter: DetectionAdapter,
    pub(super) pipeline: PhotoCapturePipeline,
    pub(super) viewport: Size<space::Viewport>,
    pub(super) ui_orientation: UiOrientation,
    pub(super) video_orientation: VideoOrientation,
}

impl Viewfinder {
    pub fn new(config: &Config, pipeline: PhotoCapturePipeline) -> Self {
        Self {
            adapter: DetectionAdapter::new(config.target_symbology, config.fill_mode),
            pipeline,
            viewport: Size::default(),
            ui_orientation: UiOrientation::Unknown,
            video_orientation: VideoOrientation::default(),
        }
    }

    /// Overlay snapshot for the renderer
    pub fn overlay(&self) -> &OverlayState {
        self.adapter.state()
    }

    pub fn viewport(&self) -> Size<space::Viewport> {
        self.viewport
    }

    /// Orientation the capture stream should use
    pub fn video_orientation(&self) -> VideoOrientation {
        self.video_orientation
    }

    pub fn capture_state(&self) -> CaptureState {
        self.pipeline.state()
    }

    pub fn last_outcome(&self) -> Option<&CaptureOutcome> {
        self.pipeline.last_outcome()
    }
}
