// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! Every message is handled to completion before the next one is looked at,
//! so the overlay and the capture pipeline never see concurrent updates.

use super::state::{Message, Viewfinder};
use crate::frame_processor::MetadataBatch;
use crate::orientation::resolve_orientation;
use futures::{Stream, StreamExt, stream};
use tracing::{debug, info};

impl Viewfinder {
    /// Main message handler
    pub fn update(&mut self, message: Message) {
        match message {
            // ===== Metadata =====
            Message::Detections(batch) => {
                self.adapter.on_detections(batch);
            }

            // ===== Layout =====
            Message::ViewportResized(size) => {
                debug!(width = size.width, height = size.height, "Viewport resized");
                self.viewport = size;
                self.apply_orientation();
            }
            Message::OrientationChanged(orientation) => {
                self.ui_orientation = orientation;
                self.apply_orientation();
            }

            // ===== Capture =====
            Message::TriggerCapture => {
                self.pipeline.trigger();
            }
            Message::CaptureStarted(id) => self.pipeline.on_capture_started(id),
            Message::CaptureFinished(id, result) => {
                self.pipeline
                    .on_capture_finished(id, result.as_ref().map_err(Clone::clone));
            }
        }
    }

    /// Process both event interfaces until they are exhausted
    ///
    /// Messages from each stream keep their arrival order. Interleaving
    /// between the two streams is whatever order they become ready in.
    pub async fn run<M, E>(&mut self, metadata: M, messages: E)
    where
        M: Stream<Item = MetadataBatch>,
        E: Stream<Item = Message>,
    {
        let mut merged = std::pin::pin!(stream::select(metadata.map(Message::from), messages));

        while let Some(message) = merged.next().await {
            self.update(message);
        }

        debug!("Viewfinder event streams closed");
    }

    fn apply_orientation(&mut self) {
        let next = resolve_orientation(self.ui_orientation, self.video_orientation);
        if next != self.video_orientation {
            info!(from = ?self.video_orientation, to = ?next, "Stream orientation changed");
            self.video_orientation = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{CaptureBackend, CaptureSettings};
    use crate::config::Config;
    use crate::errors::CameraError;
    use crate::geometry::Size;
    use crate::orientation::{UiOrientation, VideoOrientation};
    use crate::pipelines::photo::{CaptureRequest, CaptureState, PhotoCapturePipeline};
    use crate::storage::MemorySink;

    struct SilentBackend;

    impl CaptureBackend for SilentBackend {
        fn name(&self) -> &str {
            "silent"
        }

        fn start_capture(
            &mut self,
            _request: &CaptureRequest,
            _settings: &CaptureSettings,
        ) -> Result<(), CameraError> {
            Ok(())
        }
    }

    fn viewfinder() -> Viewfinder {
        let pipeline =
            PhotoCapturePipeline::new(Box::new(SilentBackend), Box::new(MemorySink::new()));
        Viewfinder::new(&Config::default(), pipeline)
    }

    #[test]
    fn test_orientation_follows_ui_and_keeps_previous_on_unknown() {
        let mut viewfinder = viewfinder();
        viewfinder.update(Message::OrientationChanged(UiOrientation::LandscapeLeft));
        assert_eq!(viewfinder.video_orientation(), VideoOrientation::LandscapeLeft);

        viewfinder.update(Message::OrientationChanged(UiOrientation::Unknown));
        assert_eq!(viewfinder.video_orientation(), VideoOrientation::LandscapeLeft);

        viewfinder.update(Message::ViewportResized(Size::new(844.0, 390.0)));
        assert_eq!(viewfinder.video_orientation(), VideoOrientation::LandscapeLeft);
        assert_eq!(viewfinder.viewport(), Size::new(844.0, 390.0));
    }

    #[test]
    fn test_second_trigger_is_ignored_while_busy() {
        let mut viewfinder = viewfinder();
        viewfinder.update(Message::TriggerCapture);
        assert_eq!(viewfinder.capture_state(), CaptureState::Requested);

        viewfinder.update(Message::TriggerCapture);
        assert_eq!(viewfinder.capture_state(), CaptureState::Requested);
        assert!(viewfinder.last_outcome().is_none());
    }
}
