// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding
//!
//! This module encodes finished images for storage:
//! - JPEG (with quality control)
//! - PNG (lossless)
//!
//! Both carry the rotation tag of the finished image as an EXIF Orientation
//! entry; the pixels are stored as cropped.

use super::processing::FinishedImage;
use crate::errors::StorageError;
use crate::orientation::Rotation;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::borrow::Cow;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Supported encoding formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingFormat {
    /// JPEG format (lossy compression)
    Jpeg,
    /// PNG format (lossless compression)
    Png,
}

impl EncodingFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            EncodingFormat::Jpeg => "jpg",
            EncodingFormat::Png => "png",
        }
    }
}

impl From<crate::config::PhotoOutputFormat> for EncodingFormat {
    fn from(format: crate::config::PhotoOutputFormat) -> Self {
        match format {
            crate::config::PhotoOutputFormat::Jpeg => EncodingFormat::Jpeg,
            crate::config::PhotoOutputFormat::Png => EncodingFormat::Png,
        }
    }
}

/// Encoding quality settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncodingQuality {
    /// Low quality (high compression)
    Low,
    /// Medium quality (balanced)
    Medium,
    /// High quality (low compression)
    #[default]
    High,
    /// Maximum quality (minimal compression)
    Maximum,
}

impl EncodingQuality {
    /// Get JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            EncodingQuality::Low => 60,
            EncodingQuality::Medium => 80,
            EncodingQuality::High => 92,
            EncodingQuality::Maximum => 98,
        }
    }
}

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub format: EncodingFormat,
    pub width: u32,
    pub height: u32,
}

/// Photo encoder
#[derive(Debug, Clone)]
pub struct PhotoEncoder {
    format: EncodingFormat,
    quality: EncodingQuality,
}

impl PhotoEncoder {
    /// Create a new encoder with JPEG format and high quality
    pub fn new() -> Self {
        Self {
            format: EncodingFormat::Jpeg,
            quality: EncodingQuality::High,
        }
    }

    /// Set encoding format
    pub fn set_format(&mut self, format: EncodingFormat) {
        self.format = format;
    }

    /// Set encoding quality (only affects JPEG)
    pub fn set_quality(&mut self, quality: EncodingQuality) {
        self.quality = quality;
    }

    pub fn format(&self) -> EncodingFormat {
        self.format
    }

    /// Encode a finished image
    ///
    /// The rotation tag is written as an EXIF Orientation entry. Encoders that
    /// refuse EXIF get the rotation applied to the pixels instead.
    pub fn encode(&self, finished: &FinishedImage) -> Result<EncodedImage, StorageError> {
        let mut buffer = Vec::new();

        let (width, height) = match self.format {
            EncodingFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality.jpeg_quality());
                Self::write_tagged(encoder, finished)
                    .map_err(|e| StorageError::Encoding(format!("JPEG encoding failed: {}", e)))?
            }
            EncodingFormat::Png => {
                let encoder = PngEncoder::new(&mut buffer);
                Self::write_tagged(encoder, finished)
                    .map_err(|e| StorageError::Encoding(format!("PNG encoding failed: {}", e)))?
            }
        };

        debug!(
            size = buffer.len(),
            format = ?self.format,
            width,
            height,
            rotation = %finished.rotation(),
            "Encoding complete"
        );

        Ok(EncodedImage {
            data: buffer,
            format: self.format,
            width,
            height,
        })
    }

    /// Write the cropped pixels with the rotation as metadata, or rotated
    /// pixels when the encoder cannot carry it
    fn write_tagged<E: ImageEncoder>(
        mut encoder: E,
        finished: &FinishedImage,
    ) -> image::ImageResult<(u32, u32)> {
        let image: Cow<'_, RgbImage> = if finished.rotation() == Rotation::None {
            Cow::Borrowed(finished.pixels())
        } else {
            match encoder.set_exif_metadata(finished.rotation().exif_chunk()) {
                Ok(()) => Cow::Borrowed(finished.pixels()),
                Err(e) => {
                    debug!(error = %e, "Encoder has no EXIF support, rotating pixels");
                    Cow::Owned(finished.oriented())
                }
            }
        };

        let (width, height) = image.dimensions();
        encoder.write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)?;
        Ok((width, height))
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new()
    }
}
