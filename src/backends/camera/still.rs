// SPDX-License-Identifier: GPL-3.0-only

//! Still-image capture backend
//!
//! Serves captures from an image file instead of a sensor. Used by the
//! command line and handy for exercising the photo pipeline without a device.

use super::types::{CaptureEvent, CaptureSettings, RawPhotoBuffer};
use super::CaptureBackend;
use crate::errors::CameraError;
use crate::pipelines::photo::CaptureRequest;
use futures::channel::mpsc::UnboundedSender;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Capture backend that "photographs" a file on disk
pub struct StillImageBackend {
    source: PathBuf,
    events: UnboundedSender<CaptureEvent>,
}

impl StillImageBackend {
    /// Open the backend on an image file
    ///
    /// Fails with [`CameraError::DeviceUnavailable`] when the source cannot
    /// be read, which is the one fatal startup condition.
    pub fn open(
        source: impl AsRef<Path>,
        events: UnboundedSender<CaptureEvent>,
    ) -> Result<Self, CameraError> {
        let source = source.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&source).map_err(|e| {
            CameraError::DeviceUnavailable(format!("{}: {}", source.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(CameraError::DeviceUnavailable(format!(
                "{} is not a file",
                source.display()
            )));
        }

        info!(source = %source.display(), "Opened still-image capture source");
        Ok(Self { source, events })
    }

    fn send(&self, event: CaptureEvent) -> Result<(), CameraError> {
        let request = event.request_id();
        self.events.unbounded_send(event).map_err(|e| {
            warn!(%request, "Capture event dropped, receiver is gone");
            CameraError::CaptureFailed(format!("event channel closed: {}", e))
        })
    }
}

impl CaptureBackend for StillImageBackend {
    fn name(&self) -> &str {
        "still-image"
    }

    fn start_capture(
        &mut self,
        request: &CaptureRequest,
        settings: &CaptureSettings,
    ) -> Result<(), CameraError> {
        debug!(
            request = %request.id,
            stabilization = settings.stabilization,
            high_resolution = settings.high_resolution,
            flash = ?settings.flash,
            "Starting still capture"
        );

        self.send(CaptureEvent::Started(request.id))?;

        let result = std::fs::read(&self.source)
            .map(RawPhotoBuffer::encoded)
            .map_err(|e| {
                warn!(source = %self.source.display(), error = %e, "Failed to read capture source");
                CameraError::CaptureFailed(e.to_string())
            });

        self.send(CaptureEvent::Finished(request.id, result))
    }
}
