// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the capture collaborator seam

use crate::errors::CameraError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Pixel layout of frame and photo buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    RGBA,
    /// RGB24 - 24-bit RGB (3 bytes per pixel, no alpha)
    RGB24,
    /// Gray8 - 8-bit grayscale (single channel)
    Gray8,
    /// Encoded file data (JPEG, PNG, ...) as delivered by still-capture APIs
    Encoded,
}

impl PixelFormat {
    /// Bytes per pixel for uncompressed formats
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::RGBA => Some(4),
            PixelFormat::RGB24 => Some(3),
            PixelFormat::Gray8 => Some(1),
            PixelFormat::Encoded => None,
        }
    }
}

/// A preview frame handed to detectors
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Pixels laid out as `format` describes
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
    /// Row stride (bytes per row, may include padding)
    pub stride: u32,
    /// Timestamp when frame was captured (for latency diagnostics)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap a tightly packed RGBA image
    pub fn from_rgba(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: Arc::from(image.into_raw()),
            format: PixelFormat::RGBA,
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }
}

/// Flash policy for a still capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlashMode {
    /// Flash stays off
    Off,
    /// Flash fires on every capture
    On,
    /// The device decides from scene brightness
    #[default]
    Auto,
}

/// Settings sent with every capture call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Still-image stabilization
    pub stabilization: bool,
    /// Capture at the highest resolution the device offers
    pub high_resolution: bool,
    pub flash: FlashMode,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            stabilization: true,
            high_resolution: true,
            flash: FlashMode::Auto,
        }
    }
}

/// Captured photo as delivered by the collaborator
///
/// The pipeline only borrows it for one processing step.
#[derive(Debug, Clone)]
pub struct RawPhotoBuffer {
    pub data: Arc<[u8]>,
    /// Declared dimensions (0 when the collaborator does not know them)
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl RawPhotoBuffer {
    /// Wrap encoded file data, reading the declared size from its header
    pub fn encoded(data: Vec<u8>) -> Self {
        let (width, height) = image::ImageReader::new(std::io::Cursor::new(&data))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok())
            .unwrap_or((0, 0));

        Self {
            data: Arc::from(data),
            width,
            height,
            format: PixelFormat::Encoded,
        }
    }

    /// Wrap tightly packed pixels of an uncompressed format
    pub fn pixels(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data: Arc::from(data),
            width,
            height,
            format,
        }
    }
}

/// Events the capture collaborator delivers for a triggered request
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// The device acknowledged the capture call
    Started(Uuid),
    /// The device delivered a photo or an error
    Finished(Uuid, Result<RawPhotoBuffer, CameraError>),
}

impl CaptureEvent {
    /// Request the event belongs to
    pub fn request_id(&self) -> Uuid {
        match self {
            CaptureEvent::Started(id) | CaptureEvent::Finished(id, _) => *id,
        }
    }
}
