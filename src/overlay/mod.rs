// SPDX-License-Identifier: MPL-2.0

//! Detection overlay
//!
//! [`DetectionAdapter`] consumes one [`MetadataBatch`] per preview frame and
//! keeps an [`OverlayState`] that the renderer reads on every refresh.
//!
//! # Update rules
//!
//! - An empty batch hides the overlay and resets the box to the zero rect.
//! - Otherwise only the first detection is considered. If it is not of the
//!   target symbology the batch is ignored.
//! - The box is always replaced with the transformed bounds of that detection.
//! - Label and visibility change only when the detection carries a payload.
//!   A detection without payload moves the box but leaves the previous label
//!   (and visibility) in place.
//! - Batches older than the last applied one are dropped.

mod draw;

pub use draw::{draw_overlay, render_preview};

use crate::frame_processor::{MetadataBatch, SymbolKind};
use crate::geometry::{FillMode, Rect, space, transform};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// What the overlay currently shows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlayState {
    box_viewport: Rect<space::Viewport>,
    label: Option<String>,
    visible: bool,
}

impl OverlayState {
    /// Bounding box of the tracked code in viewport coordinates
    pub fn bounding_box(&self) -> Rect<space::Viewport> {
        self.box_viewport
    }

    /// Decoded text of the tracked code
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn hide(&mut self) {
        self.box_viewport = Rect::zero();
        self.visible = false;
    }
}

/// Drives [`OverlayState`] from per-frame detection batches
///
/// The only writer of its overlay state. Holds no other mutable state
/// besides the sequence of the last batch it applied.
#[derive(Debug, Clone)]
pub struct DetectionAdapter {
    target: SymbolKind,
    fill_mode: FillMode,
    state: OverlayState,
    last_sequence: Option<u64>,
}

impl DetectionAdapter {
    pub fn new(target: SymbolKind, fill_mode: FillMode) -> Self {
        Self {
            target,
            fill_mode,
            state: OverlayState::default(),
            last_sequence: None,
        }
    }

    /// Read-only view for the renderer
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn target(&self) -> SymbolKind {
        self.target
    }

    /// Apply one frame's detections
    ///
    /// Returns false when the batch was dropped as stale.
    pub fn on_detections(&mut self, batch: MetadataBatch) -> bool {
        if let Some(last) = self.last_sequence {
            if batch.sequence < last {
                trace!(sequence = batch.sequence, last, "Dropping stale metadata batch");
                return false;
            }
        }
        self.last_sequence = Some(batch.sequence);

        let frame = batch.frame;
        let Some(primary) = batch.detections.into_iter().next() else {
            if self.state.visible || !self.state.box_viewport.is_zero() {
                debug!(sequence = batch.sequence, "No detections, hiding overlay");
            }
            self.state.hide();
            return true;
        };

        if primary.symbology != self.target {
            trace!(
                kind = %primary.symbology,
                target = %self.target,
                "Ignoring detection of non-target symbology"
            );
            return true;
        }

        self.state.box_viewport = transform(
            &primary.bounds,
            frame.sensor_size,
            frame.viewport_size,
            self.fill_mode,
        );

        if let Some(payload) = primary.payload {
            self.state.label = Some(payload);
            self.state.visible = true;
        }

        trace!(
            sequence = batch.sequence,
            bounds = %self.state.box_viewport,
            visible = self.state.visible,
            "Overlay updated"
        );

        true
    }
}
