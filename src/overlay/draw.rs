// SPDX-License-Identifier: MPL-2.0

//! Software rendering of the preview and its detection overlay

use super::OverlayState;
use crate::constants;
use crate::geometry::{FillMode, Rect, Size, content_bounds, space};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Render a sensor frame into a viewport-sized canvas the way the preview shows it
pub fn render_preview(frame: &RgbaImage, viewport: (u32, u32), mode: FillMode) -> RgbaImage {
    let (viewport_width, viewport_height) = viewport;
    let mut canvas = RgbaImage::from_pixel(viewport_width, viewport_height, Rgba([0, 0, 0, 255]));

    let (frame_width, frame_height) = frame.dimensions();
    let bounds = content_bounds(
        Size::from_pixels(frame_width, frame_height),
        Size::from_pixels(viewport_width, viewport_height),
        mode,
    );
    if bounds.is_empty() {
        return canvas;
    }

    let scaled = imageops::resize(
        frame,
        bounds.width().round().max(1.0) as u32,
        bounds.height().round().max(1.0) as u32,
        FilterType::Triangle,
    );
    imageops::overlay(
        &mut canvas,
        &scaled,
        bounds.x.round() as i64,
        bounds.y.round() as i64,
    );

    canvas
}

/// Draw the overlay box onto a viewport-sized image
///
/// Nothing is drawn while the overlay is hidden or the box is empty. Box
/// edges outside the image are clipped.
pub fn draw_overlay(image: &mut RgbaImage, state: &OverlayState) {
    let rect = state.bounding_box();
    if !state.is_visible() || rect.is_empty() {
        return;
    }

    draw_rect(
        image,
        &rect,
        Rgba(constants::overlay::BORDER_COLOR),
        constants::overlay::BORDER_WIDTH,
    );
}

/// Draw a rectangle border with given thickness.
fn draw_rect(image: &mut RgbaImage, rect: &Rect<space::Viewport>, color: Rgba<u8>, thickness: u32) {
    let (w, h) = image.dimensions();
    let (w, h) = (w as i64, h as i64);

    let x0 = rect.x.round() as i64;
    let y0 = rect.y.round() as i64;
    // Float to int casts saturate, keep the edge arithmetic saturating too
    let x1 = (rect.max_x().round() as i64).saturating_sub(1);
    let y1 = (rect.max_y().round() as i64).saturating_sub(1);

    let mut put = |x: i64, y: i64| {
        if (0..w).contains(&x) && (0..h).contains(&y) {
            image.put_pixel(x as u32, y as u32, color);
        }
    };

    for t in 0..thickness as i64 {
        let (xx0, yy0) = (x0.saturating_add(t), y0.saturating_add(t));
        let (xx1, yy1) = (x1.saturating_sub(t), y1.saturating_sub(t));
        if xx0 > xx1 || yy0 > yy1 {
            break;
        }
        for x in xx0.max(0)..=xx1.min(w - 1) {
            put(x, yy0);
            put(x, yy1);
        }
        for y in yy0.max(0)..=yy1.min(h - 1) {
            put(xx0, y);
            put(xx1, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_processor::{Detection, FrameContext, MetadataBatch, SymbolKind};
    use crate::overlay::DetectionAdapter;

    const GREEN: Rgba<u8> = Rgba(constants::overlay::BORDER_COLOR);

    fn visible_state(rect: Rect<space::Sensor>) -> OverlayState {
        let mut adapter = DetectionAdapter::new(SymbolKind::Qr, FillMode::AspectFill);
        adapter.on_detections(MetadataBatch::new(
            0,
            vec![Detection::new(SymbolKind::Qr, rect, Some("hi".into()))],
            FrameContext::new(Size::new(40.0, 40.0), Size::new(40.0, 40.0)),
        ));
        adapter.state().clone()
    }

    #[test]
    fn test_draws_box_corners() {
        let mut image = RgbaImage::new(40, 40);
        draw_overlay(&mut image, &visible_state(Rect::new(5.0, 5.0, 6.0, 6.0)));

        assert_eq!(image.get_pixel(5, 5), &GREEN);
        assert_eq!(image.get_pixel(10, 5), &GREEN);
        assert_eq!(image.get_pixel(5, 10), &GREEN);
        assert_eq!(image.get_pixel(10, 10), &GREEN);
        assert_ne!(image.get_pixel(8, 8), &GREEN);
    }

    #[test]
    fn test_hidden_overlay_draws_nothing() {
        let mut image = RgbaImage::new(10, 10);
        draw_overlay(&mut image, &OverlayState::default());
        assert!(image.pixels().all(|p| p != &GREEN));
    }

    #[test]
    fn test_box_outside_image_is_clipped() {
        let mut image = RgbaImage::new(10, 10);
        draw_overlay(&mut image, &visible_state(Rect::new(-5.0, -5.0, 30.0, 8.0)));
        assert_eq!(image.get_pixel(0, 2), &GREEN);
    }

    #[test]
    fn test_extreme_rects_do_not_overflow() {
        let mut image = RgbaImage::new(10, 10);
        for rect in [
            Rect::new(-1.0e30, -1.0e30, 0.0, 0.0),
            Rect::new(f32::MIN, f32::MIN, 1.0, 1.0),
            Rect::new(0.0, 0.0, 1.0e30, 1.0e30),
            Rect::new(f32::MAX, f32::MAX, f32::MAX, f32::MAX),
        ] {
            draw_rect(&mut image, &rect, GREEN, 3);
        }
        // Only the huge box starting at the origin reaches the image
        assert_eq!(image.get_pixel(0, 5), &GREEN);
        assert_ne!(image.get_pixel(5, 5), &GREEN);
    }

    #[test]
    fn test_render_preview_fills_viewport() {
        let frame = RgbaImage::from_pixel(200, 100, Rgba([255, 0, 0, 255]));
        let canvas = render_preview(&frame, (100, 100), FillMode::AspectFill);
        assert_eq!(canvas.dimensions(), (100, 100));
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));

        let letterboxed = render_preview(&frame, (100, 100), FillMode::AspectFit);
        assert_eq!(letterboxed.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }
}
