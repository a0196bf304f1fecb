// SPDX-License-Identifier: MPL-2.0

//! Core types for frame processing results
//!
//! These types are the message format between a detector and the overlay.
//! Bounds are in sensor coordinates (pixels of the preview frame), so they
//! need the viewport transform before they can be drawn.

use crate::geometry::{Rect, Size, space};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable code symbology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SymbolKind {
    #[default]
    Qr,
    Aztec,
    DataMatrix,
    Pdf417,
    Code128,
    Ean13,
}

impl SymbolKind {
    /// Get display name for the symbology
    pub fn display_name(&self) -> &'static str {
        match self {
            SymbolKind::Qr => "QR",
            SymbolKind::Aztec => "Aztec",
            SymbolKind::DataMatrix => "Data Matrix",
            SymbolKind::Pdf417 => "PDF417",
            SymbolKind::Code128 => "Code 128",
            SymbolKind::Ean13 => "EAN-13",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single detected code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Recognized symbology
    pub symbology: SymbolKind,
    /// Bounding box in sensor coordinates
    pub bounds: Rect<space::Sensor>,
    /// Decoded content, `None` when the code was located but not decoded
    pub payload: Option<String>,
}

impl Detection {
    pub fn new(symbology: SymbolKind, bounds: Rect<space::Sensor>, payload: Option<String>) -> Self {
        Self {
            symbology,
            bounds,
            payload,
        }
    }
}

/// Geometry of the frame a batch was detected in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameContext {
    /// Size of the sensor frame the bounds refer to
    pub sensor_size: Size<space::Sensor>,
    /// Size of the preview area the overlay is drawn on
    pub viewport_size: Size<space::Viewport>,
}

impl FrameContext {
    pub fn new(sensor_size: Size<space::Sensor>, viewport_size: Size<space::Viewport>) -> Self {
        Self {
            sensor_size,
            viewport_size,
        }
    }
}

/// All detections for one frame, in detector order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataBatch {
    /// Monotonic frame sequence number assigned by the producer
    pub sequence: u64,
    /// Detections ranked by the detector; index 0 is the primary one
    pub detections: Vec<Detection>,
    pub frame: FrameContext,
}

impl MetadataBatch {
    pub fn new(sequence: u64, detections: Vec<Detection>, frame: FrameContext) -> Self {
        Self {
            sequence,
            detections,
            frame,
        }
    }

    /// The detection the overlay follows
    pub fn primary(&self) -> Option<&Detection> {
        self.detections.first()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
