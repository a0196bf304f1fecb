// SPDX-License-Identifier: MPL-2.0

//! Photo capture pipeline
//!
//! Drives one still capture at a time through the capture collaborator and
//! hands the finished image to a storage sink:
//!
//! ```text
//! trigger ─▶ CaptureBackend ─▶ CaptureEvent::Finished ─▶ finalize ─▶ StorageSink
//!                                                        (decode, square crop, tag)
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Trigger**: Issue one capture call with the configured [`CaptureSettings`]
//! 2. **Finalize**: Decode the delivered buffer, crop the centered square, tag rotation
//! 3. **Hand-off**: Give the [`FinishedImage`] to the sink
//!
//! Triggers while a request is outstanding are no-ops. Every error ends the
//! request, is logged, and leaves the pipeline idle so the next trigger works.

pub mod capture;
pub mod encoding;
pub mod processing;

pub use capture::{CaptureOutcome, CaptureRequest, CaptureState};
pub use encoding::{EncodingFormat, EncodingQuality, PhotoEncoder};
pub use processing::{FinishedImage, finalize};

use crate::backends::camera::{CaptureBackend, CaptureEvent, CaptureSettings, RawPhotoBuffer};
use crate::config::Config;
use crate::errors::{CameraError, PhotoError};
use crate::orientation::Rotation;
use crate::storage::StorageSink;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Single-flight photo capture state machine
pub struct PhotoCapturePipeline {
    backend: Box<dyn CaptureBackend>,
    sink: Box<dyn StorageSink>,
    settings: CaptureSettings,
    rotation: Rotation,
    /// Sink failures fail the request instead of only being logged
    strict_storage: bool,
    state: CaptureState,
    in_flight: Option<CaptureRequest>,
    last_outcome: Option<CaptureOutcome>,
}

impl PhotoCapturePipeline {
    /// Create a pipeline with default capture settings and output rotation
    pub fn new(backend: Box<dyn CaptureBackend>, sink: Box<dyn StorageSink>) -> Self {
        Self {
            backend,
            sink,
            settings: CaptureSettings::default(),
            rotation: Rotation::default(),
            strict_storage: false,
            state: CaptureState::Idle,
            in_flight: None,
            last_outcome: None,
        }
    }

    /// Create a pipeline configured from the application config
    pub fn from_config(
        backend: Box<dyn CaptureBackend>,
        sink: Box<dyn StorageSink>,
        config: &Config,
    ) -> Self {
        Self::new(backend, sink)
            .with_settings(config.capture)
            .with_rotation(config.output_rotation)
            .with_strict_storage(config.strict_storage)
    }

    pub fn with_settings(mut self, settings: CaptureSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_strict_storage(mut self, strict: bool) -> Self {
        self.strict_storage = strict;
        self
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// The outstanding request, if any
    pub fn in_flight(&self) -> Option<&CaptureRequest> {
        self.in_flight.as_ref()
    }

    /// Outcome of the most recent finished request
    ///
    /// This is the user-visible failure state: a failed request stays here
    /// until the next one finishes.
    pub fn last_outcome(&self) -> Option<&CaptureOutcome> {
        self.last_outcome.as_ref()
    }

    /// Request a still capture
    ///
    /// Returns the new request id, or `None` when a request is already
    /// outstanding (the trigger is ignored and the backend is not called).
    pub fn trigger(&mut self) -> Option<Uuid> {
        if self.state.is_busy() {
            debug!(state = %self.state, "Capture already in progress, ignoring trigger");
            return None;
        }

        let request = CaptureRequest::new();
        let id = request.id;
        info!(request = %id, backend = self.backend.name(), "Capture requested");

        self.in_flight = Some(request.clone());
        self.transition(CaptureState::Requested);

        if let Err(e) = self.backend.start_capture(&request, &self.settings) {
            error!(request = %id, error = %e, "Failed to start capture");
            self.finish(CaptureOutcome::Failed {
                request: id,
                error: PhotoError::Capture(e),
            });
        }

        Some(id)
    }

    /// The collaborator acknowledged the capture call
    pub fn on_capture_started(&mut self, id: Uuid) {
        if !self.is_current(id) {
            warn!(request = %id, "Capture start for unknown request, ignoring");
            return;
        }

        if self.state == CaptureState::Requested {
            self.transition(CaptureState::Capturing);
        }
    }

    /// The collaborator delivered a photo or an error
    ///
    /// The buffer is only borrowed for the duration of this call. Returns the
    /// request's outcome, or `None` when the event does not belong to the
    /// outstanding request.
    pub fn on_capture_finished(
        &mut self,
        id: Uuid,
        result: Result<&RawPhotoBuffer, CameraError>,
    ) -> Option<&CaptureOutcome> {
        if !self.is_current(id) {
            warn!(request = %id, state = %self.state, "Capture result for unknown request, ignoring");
            return None;
        }

        let outcome = match result {
            Ok(buffer) => {
                self.transition(CaptureState::Processing);
                self.process(id, buffer)
            }
            Err(e) => {
                error!(request = %id, error = %e, "Capture failed");
                CaptureOutcome::Failed {
                    request: id,
                    error: PhotoError::Capture(e),
                }
            }
        };

        self.finish(outcome);
        self.last_outcome.as_ref()
    }

    /// Route a collaborator event to the matching handler
    pub fn handle_event(&mut self, event: CaptureEvent) -> Option<&CaptureOutcome> {
        match event {
            CaptureEvent::Started(id) => {
                self.on_capture_started(id);
                None
            }
            CaptureEvent::Finished(id, result) => {
                self.on_capture_finished(id, result.as_ref().map_err(Clone::clone))
            }
        }
    }

    fn process(&mut self, id: Uuid, buffer: &RawPhotoBuffer) -> CaptureOutcome {
        let finished = match finalize(buffer, self.rotation) {
            Ok(finished) => finished,
            Err(e) => {
                error!(request = %id, error = %e, "Failed to finalize photo");
                return CaptureOutcome::Failed {
                    request: id,
                    error: e,
                };
            }
        };

        let side = finished.side();
        let rotation = finished.rotation();

        if let Err(e) = self.sink.store(finished) {
            if self.strict_storage {
                error!(request = %id, error = %e, "Storage sink rejected photo");
                return CaptureOutcome::Failed {
                    request: id,
                    error: PhotoError::Storage(e),
                };
            }
            warn!(request = %id, error = %e, "Storage sink failed, photo discarded");
        }

        CaptureOutcome::Persisted {
            request: id,
            side,
            rotation,
        }
    }

    fn finish(&mut self, outcome: CaptureOutcome) {
        self.transition(outcome.state());
        let elapsed_ms = self
            .in_flight
            .as_ref()
            .map(|request| request.requested_at.elapsed().as_millis());
        info!(
            request = %outcome.request_id(),
            state = %outcome.state(),
            elapsed_ms,
            "Capture finished"
        );

        self.last_outcome = Some(outcome);
        self.in_flight = None;
        self.transition(CaptureState::Idle);
    }

    fn is_current(&self, id: Uuid) -> bool {
        self.state.is_busy() && self.in_flight.as_ref().is_some_and(|r| r.id == id)
    }

    fn transition(&mut self, to: CaptureState) {
        debug!(from = %self.state, %to, "Capture state transition");
        self.state = to;
    }
}
