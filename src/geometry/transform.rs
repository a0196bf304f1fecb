// SPDX-License-Identifier: MPL-2.0

//! Sensor-to-viewport coordinate transform
//!
//! The preview shows the sensor frame scaled into the viewport according to a
//! [`FillMode`]. Detection geometry arrives in sensor coordinates and has to go
//! through the same scale and centering before it can be drawn over the video.
//!
//! For [`FillMode::AspectFill`]:
//!
//! ```text
//! scale    = max(viewport.w / sensor.w, viewport.h / sensor.h)
//! (dx, dy) = ((viewport.w - sensor.w * scale) / 2, (viewport.h - sensor.h * scale) / 2)
//! out      = (x * scale + dx, y * scale + dy, w * scale, h * scale)
//! ```
//!
//! The offsets are zero or negative: aspect-fill crops, it never letterboxes.
//! No rounding happens here; callers round for display only.

use super::{FillMode, Rect, Size, space};

/// Per-axis scale and offset that maps sensor space into viewport space
#[derive(Debug, Clone, Copy, PartialEq)]
struct Mapping {
    scale_x: f32,
    scale_y: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Mapping {
    fn new(sensor: Size<space::Sensor>, viewport: Size<space::Viewport>, mode: FillMode) -> Option<Self> {
        if sensor.is_degenerate() {
            return None;
        }

        let ratio_x = viewport.width / sensor.width;
        let ratio_y = viewport.height / sensor.height;

        let (scale_x, scale_y) = match mode {
            FillMode::AspectFill => {
                let scale = ratio_x.max(ratio_y);
                (scale, scale)
            }
            FillMode::AspectFit => {
                let scale = ratio_x.min(ratio_y);
                (scale, scale)
            }
            FillMode::Stretch => (ratio_x, ratio_y),
        };

        Some(Self {
            scale_x,
            scale_y,
            offset_x: (viewport.width - sensor.width * scale_x) / 2.0,
            offset_y: (viewport.height - sensor.height * scale_y) / 2.0,
        })
    }

    fn apply(&self, rect: &Rect<space::Sensor>) -> Rect<space::Viewport> {
        Rect::new(
            rect.x * self.scale_x + self.offset_x,
            rect.y * self.scale_y + self.offset_y,
            rect.width() * self.scale_x,
            rect.height() * self.scale_y,
        )
    }
}

/// Map a sensor-space rectangle into viewport space
///
/// Pure and reentrant. A sensor size with a zero dimension yields the zero
/// rect instead of dividing by zero.
pub fn transform(
    rect: &Rect<space::Sensor>,
    sensor: Size<space::Sensor>,
    viewport: Size<space::Viewport>,
    mode: FillMode,
) -> Rect<space::Viewport> {
    match Mapping::new(sensor, viewport, mode) {
        Some(mapping) => mapping.apply(rect),
        None => Rect::zero(),
    }
}

/// Viewport rectangle covered by the scaled sensor frame
///
/// For aspect-fill this extends past the viewport edges; for aspect-fit it
/// is the letterboxed video area.
pub fn content_bounds(
    sensor: Size<space::Sensor>,
    viewport: Size<space::Viewport>,
    mode: FillMode,
) -> Rect<space::Viewport> {
    let frame = Rect::new(0.0, 0.0, sensor.width, sensor.height);
    transform(&frame, sensor, viewport, mode)
}
