// SPDX-License-Identifier: MPL-2.0

//! Centered square crop for captured photos

use super::{Rect, space};
use crate::errors::PhotoError;

/// A square crop region inside an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareCrop {
    /// Top-left corner of the crop in image pixels
    pub x: u32,
    pub y: u32,
    /// Side length of the square in image pixels
    pub side: u32,
}

impl SquareCrop {
    pub fn rect(&self) -> Rect<space::Image> {
        Rect::new(self.x as f32, self.y as f32, self.side as f32, self.side as f32)
    }
}

/// Compute the largest square centered in an image of `width` x `height`
///
/// The side is the shorter dimension and the crop is centered on the longer
/// one, so a 1200x1600 portrait image yields a 1200 square at (0, 200).
/// When the spare pixels are odd, the extra one stays on the right/bottom.
pub fn compute_crop(width: u32, height: u32) -> Result<SquareCrop, PhotoError> {
    let invalid = PhotoError::InvalidImageGeometry { width, height };

    if width == 0 || height == 0 {
        return Err(invalid);
    }

    let side = width.min(height);
    let crop = SquareCrop {
        x: (width - side) / 2,
        y: (height - side) / 2,
        side,
    };

    let within = crop
        .x
        .checked_add(side)
        .zip(crop.y.checked_add(side))
        .is_some_and(|(right, bottom)| right <= width && bottom <= height);
    if !within {
        return Err(invalid);
    }

    Ok(crop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_centers_vertically() {
        let crop = compute_crop(1200, 1600).unwrap();
        assert_eq!(crop, SquareCrop { x: 0, y: 200, side: 1200 });
    }

    #[test]
    fn test_landscape_centers_horizontally() {
        let crop = compute_crop(4032, 3024).unwrap();
        assert_eq!(crop, SquareCrop { x: 504, y: 0, side: 3024 });
    }

    #[test]
    fn test_square_image_is_untouched() {
        let crop = compute_crop(512, 512).unwrap();
        assert_eq!(crop, SquareCrop { x: 0, y: 0, side: 512 });
    }

    #[test]
    fn test_odd_remainder_rounds_down() {
        let crop = compute_crop(101, 100).unwrap();
        assert_eq!(crop, SquareCrop { x: 0, y: 0, side: 100 });
        assert_eq!(compute_crop(100, 103).unwrap().y, 1);
    }

    #[test]
    fn test_zero_dimension_is_invalid() {
        assert_eq!(
            compute_crop(0, 1600),
            Err(PhotoError::InvalidImageGeometry {
                width: 0,
                height: 1600
            })
        );
        assert!(compute_crop(1200, 0).is_err());
    }
}
