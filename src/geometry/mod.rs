// SPDX-License-Identifier: MPL-2.0

//! Geometry primitives tagged with the coordinate space they live in
//!
//! Three spaces exist:
//!
//! - [`space::Sensor`]: native coordinates of the detection and capture stream
//! - [`space::Viewport`]: coordinates of the rendered preview as shown to the user
//! - [`space::Image`]: pixel coordinates of a decoded still image
//!
//! The space is a zero-sized type parameter, so a sensor rectangle can only
//! reach the overlay by going through [`transform::transform`].

pub mod crop;
pub mod transform;

pub use crop::{SquareCrop, compute_crop};
pub use transform::{content_bounds, transform};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Coordinate space markers
pub mod space {
    use serde::{Deserialize, Serialize};

    /// Capture/sensor coordinate space
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Sensor;

    /// On-screen preview coordinate space
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Viewport;

    /// Decoded image pixel space
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Image;
}

/// A coordinate space a geometry value can be expressed in
pub trait CoordinateSpace: Copy + Default + fmt::Debug + PartialEq {
    /// Name used in logs
    const NAME: &'static str;
}

impl CoordinateSpace for space::Sensor {
    const NAME: &'static str = "sensor";
}

impl CoordinateSpace for space::Viewport {
    const NAME: &'static str = "viewport";
}

impl CoordinateSpace for space::Image {
    const NAME: &'static str = "image";
}

/// How sensor content is scaled into the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillMode {
    /// Uniform scale so the whole frame fits inside the viewport (letterboxing)
    AspectFit,
    /// Uniform scale so the frame covers the whole viewport (overflow is cropped)
    #[default]
    AspectFill,
    /// Independent horizontal and vertical scale, no aspect preservation
    Stretch,
}

/// Width and height in a coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size<S: CoordinateSpace> {
    pub width: f32,
    pub height: f32,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: CoordinateSpace> Size<S> {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            space: PhantomData,
        }
    }

    /// Build a size from integer pixel dimensions
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// True when either dimension is zero, negative or not a number
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A point in a coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point<S: CoordinateSpace> {
    pub x: f32,
    pub y: f32,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: CoordinateSpace> Point<S> {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }
}

/// An axis-aligned rectangle in a coordinate space
///
/// Width and height are never negative. The zero rect means "nothing to show".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect<S: CoordinateSpace> {
    pub x: f32,
    pub y: f32,
    width: f32,
    height: f32,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: CoordinateSpace> Rect<S> {
    /// Create a rectangle; negative extents are clamped to zero
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
            space: PhantomData,
        }
    }

    /// The zero rect
    pub fn zero() -> Self {
        Self::default()
    }

    /// Smallest rectangle containing all the given points
    pub fn bounding(points: &[Point<S>]) -> Self {
        let Some(first) = points.first() else {
            return Self::zero();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// True for a rect with no area
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// True for the exact zero rect
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Whether this rect lies entirely within `0..width` x `0..height`
    pub fn lies_within(&self, bounds: Size<S>) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.max_x() <= bounds.width && self.max_y() <= bounds.height
    }

    /// Uniformly scale position and extents by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

impl<S: CoordinateSpace> fmt::Display for Rect<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}, {}x{})",
            S::NAME,
            self.x,
            self.y,
            self.width,
            self.height
        )
    }
}
