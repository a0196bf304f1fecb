// SPDX-License-Identifier: MPL-2.0

//! Finalize step for captured photos
//!
//! Turns a borrowed [`RawPhotoBuffer`] into a [`FinishedImage`]:
//!
//! 1. Decode the buffer into an RGB image
//! 2. Crop the largest centered square
//! 3. Tag the result with the output rotation
//!
//! The rotation is carried as a tag. Pixels are only rotated by sinks whose
//! output format cannot carry orientation metadata.

use crate::backends::camera::types::{PixelFormat, RawPhotoBuffer};
use crate::errors::PhotoError;
use crate::geometry::compute_crop;
use crate::orientation::Rotation;
use image::{DynamicImage, GrayImage, RgbImage, imageops};
use tracing::{debug, warn};

/// Square, orientation-tagged photo ready for storage
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedImage {
    pixels: RgbImage,
    rotation: Rotation,
}

impl FinishedImage {
    /// Side length of the square image
    pub fn side(&self) -> u32 {
        self.pixels.width()
    }

    /// Cropped pixels, before applying the rotation tag
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Orientation tag to apply when presenting the image
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Pixels with the rotation applied
    pub fn oriented(&self) -> RgbImage {
        match self.rotation {
            Rotation::None => self.pixels.clone(),
            Rotation::Rotate90 => imageops::rotate90(&self.pixels),
            Rotation::Rotate180 => imageops::rotate180(&self.pixels),
            Rotation::Rotate270 => imageops::rotate270(&self.pixels),
        }
    }
}

/// Decode, crop and tag a captured photo
pub fn finalize(buffer: &RawPhotoBuffer, rotation: Rotation) -> Result<FinishedImage, PhotoError> {
    let image = decode(buffer)?;
    let (width, height) = image.dimensions();

    let crop = compute_crop(width, height)?;
    let pixels = imageops::crop_imm(&image, crop.x, crop.y, crop.side, crop.side).to_image();

    debug!(
        width,
        height,
        crop_x = crop.x,
        crop_y = crop.y,
        side = crop.side,
        %rotation,
        "Cropped photo to square"
    );

    Ok(FinishedImage { pixels, rotation })
}

/// Decode a captured buffer into an RGB image
pub fn decode(buffer: &RawPhotoBuffer) -> Result<RgbImage, PhotoError> {
    let image = match buffer.format {
        PixelFormat::Encoded => {
            let image = image::load_from_memory(&buffer.data)
                .map_err(|e| PhotoError::ImageDecode(e.to_string()))?
                .to_rgb8();

            let declared = (buffer.width, buffer.height);
            if declared != (0, 0) && declared != image.dimensions() {
                warn!(
                    declared_width = buffer.width,
                    declared_height = buffer.height,
                    width = image.width(),
                    height = image.height(),
                    "Decoded size differs from declared size, using decoded size"
                );
            }
            image
        }
        PixelFormat::RGBA => convert_rgba_to_rgb(packed(buffer)?, buffer.width, buffer.height)?,
        PixelFormat::RGB24 => RgbImage::from_raw(buffer.width, buffer.height, packed(buffer)?.to_vec())
            .ok_or_else(|| PhotoError::ImageDecode("RGB buffer does not match its size".into()))?,
        PixelFormat::Gray8 => {
            let gray = GrayImage::from_raw(buffer.width, buffer.height, packed(buffer)?.to_vec())
                .ok_or_else(|| PhotoError::ImageDecode("Gray buffer does not match its size".into()))?;
            DynamicImage::ImageLuma8(gray).to_rgb8()
        }
    };

    Ok(image)
}

/// The exact pixel bytes of an uncompressed buffer
fn packed(buffer: &RawPhotoBuffer) -> Result<&[u8], PhotoError> {
    let bytes_per_pixel = buffer.format.bytes_per_pixel().unwrap_or(1);
    let expected_size = (buffer.width as usize)
        .checked_mul(buffer.height as usize)
        .and_then(|pixels| pixels.checked_mul(bytes_per_pixel))
        .ok_or_else(|| {
            PhotoError::ImageDecode(format!(
                "Buffer size overflows: {}x{}",
                buffer.width, buffer.height
            ))
        })?;

    buffer.data.get(..expected_size).ok_or_else(|| {
        PhotoError::ImageDecode(format!(
            "{:?} data too small: expected {}, got {}",
            buffer.format,
            expected_size,
            buffer.data.len()
        ))
    })
}

/// Convert RGBA data to RGB image (drop alpha channel)
fn convert_rgba_to_rgb(rgba_data: &[u8], width: u32, height: u32) -> Result<RgbImage, PhotoError> {
    let rgb_data: Vec<u8> = rgba_data
        .chunks_exact(4)
        .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
        .collect();

    RgbImage::from_raw(width, height, rgb_data)
        .ok_or_else(|| PhotoError::ImageDecode("Failed to create RGB image from converted data".into()))
}
