// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection task
//!
//! This module implements QR code detection using the rqrr crate.
//! It converts camera frames to a luma plane and searches for QR grids,
//! returning their sensor-space bounds and decoded content.

use crate::backends::camera::types::CameraFrame;
use crate::constants;
use crate::frame_processor::types::{Detection, SymbolKind};
use crate::geometry::{Point, Rect, space};
use rqrr::PreparedImage;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// QR code detector
///
/// Analyzes camera frames to detect and decode QR codes.
/// Optimized for real-time processing with frame downscaling.
pub struct QrDetector {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    /// Create a new QR detector with default settings
    pub fn new() -> Self {
        Self {
            max_dimension: constants::detector::DEFAULT_MAX_DIMENSION,
        }
    }

    /// Create a QR detector with custom max dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }

    /// Detect QR codes in a camera frame
    ///
    /// The CPU-heavy part runs in a blocking task so the async runtime keeps
    /// serving the preview.
    pub async fn detect(&self, frame: Arc<CameraFrame>) -> Vec<Detection> {
        let max_dim = self.max_dimension;

        tokio::task::spawn_blocking(move || detect_sync(&frame, max_dim))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "QR detection task panicked");
                Vec::new()
            })
    }

    /// Detect QR codes on the calling thread
    pub fn detect_blocking(&self, frame: &CameraFrame) -> Vec<Detection> {
        detect_sync(frame, self.max_dimension)
    }
}

/// Synchronous QR detection
///
/// Detections keep the order rqrr reports grids in; ranking belongs to the
/// detector, not to the overlay.
fn detect_sync(frame: &CameraFrame, max_dimension: u32) -> Vec<Detection> {
    let start = std::time::Instant::now();

    let width = frame.width;
    let height = frame.height;
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let (proc_width, proc_height, scale) = if width > max_dimension || height > max_dimension {
        let scale = (width as f32 / max_dimension as f32).max(height as f32 / max_dimension as f32);
        let new_width = ((width as f32 / scale) as u32).max(1);
        let new_height = ((height as f32 / scale) as u32).max(1);
        (new_width, new_height, scale)
    } else {
        (width, height, 1.0)
    };

    let Some(luma) = luma_plane(frame, proc_width, proc_height) else {
        warn!(format = ?frame.format, "Frame format has no pixel layout, skipping detection");
        return Vec::new();
    };
    let stride = proc_width as usize;

    trace!(
        proc_width,
        proc_height,
        scale,
        conversion_ms = start.elapsed().as_millis(),
        frame_age_ms = frame.captured_at.elapsed().as_millis(),
        "Prepared luma plane for processing"
    );

    let mut prepared =
        PreparedImage::prepare_from_greyscale(proc_width as usize, proc_height as usize, |x, y| {
            luma[y * stride + x]
        });
    let grids = prepared.detect_grids();

    let mut detections = Vec::with_capacity(grids.len());

    for grid in grids {
        // Corner points of the code, scaled back to sensor pixels
        let corners: Vec<Point<space::Sensor>> = grid
            .bounds
            .iter()
            .map(|p| {
                Point::new(
                    (p.x as f32 * scale).clamp(0.0, width as f32),
                    (p.y as f32 * scale).clamp(0.0, height as f32),
                )
            })
            .collect();
        let bounds = Rect::bounding(&corners);

        let payload = match grid.decode() {
            Ok((_meta, content)) => Some(content),
            Err(e) => {
                debug!(error = %e, "Located QR code but failed to decode it");
                None
            }
        };

        debug!(
            payload = payload.as_deref().unwrap_or("<undecoded>"),
            x = bounds.x,
            y = bounds.y,
            width = bounds.width(),
            height = bounds.height(),
            "Detected QR code"
        );

        detections.push(Detection::new(SymbolKind::Qr, bounds, payload));
    }

    if !detections.is_empty() {
        debug!(
            count = detections.len(),
            total_ms = start.elapsed().as_millis(),
            "QR detection found codes"
        );
    }

    detections
}

/// Build a tightly packed luma plane of `dst_width` x `dst_height`
///
/// Respects the frame's pixel format and row stride and samples bilinearly
/// when downscaling. Returns `None` for compressed frames.
fn luma_plane(frame: &CameraFrame, dst_width: u32, dst_height: u32) -> Option<Vec<u8>> {
    let bpp = frame.format.bytes_per_pixel()?;
    let src_width = frame.width as usize;
    let src_height = frame.height as usize;
    let stride = frame.stride as usize;

    let luma_at = |px: usize, py: usize| -> f32 {
        let offset = py * stride + px * bpp;
        match frame.data.get(offset..offset + bpp) {
            Some([gray]) => *gray as f32,
            Some([r, g, b, ..]) => 0.299 * *r as f32 + 0.587 * *g as f32 + 0.114 * *b as f32,
            _ => 0.0,
        }
    };

    let mut result = Vec::with_capacity((dst_width * dst_height) as usize);

    if dst_width as usize == src_width && dst_height as usize == src_height {
        for y in 0..src_height {
            for x in 0..src_width {
                result.push(luma_at(x, y).round() as u8);
            }
        }
        return Some(result);
    }

    let x_ratio = src_width as f32 / dst_width as f32;
    let y_ratio = src_height as f32 / dst_height as f32;

    for y in 0..dst_height {
        for x in 0..dst_width {
            let src_x = x as f32 * x_ratio;
            let src_y = y as f32 * y_ratio;

            let x0 = (src_x as usize).min(src_width - 1);
            let y0 = (src_y as usize).min(src_height - 1);
            let x1 = (x0 + 1).min(src_width - 1);
            let y1 = (y0 + 1).min(src_height - 1);

            let x_frac = src_x - x0 as f32;
            let y_frac = src_y - y0 as f32;

            let value = luma_at(x0, y0) * (1.0 - x_frac) * (1.0 - y_frac)
                + luma_at(x1, y0) * x_frac * (1.0 - y_frac)
                + luma_at(x0, y1) * (1.0 - x_frac) * y_frac
                + luma_at(x1, y1) * x_frac * y_frac;

            result.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::PixelFormat;

    #[test]
    fn test_luma_plane_skips_stride_padding() {
        // 2x2 RGBA frame with two bytes of padding per row
        let data: Vec<u8> = vec![
            255, 255, 255, 255, // white
            0, 0, 0, 255, // black
            9, 9, // stride padding
            0, 0, 0, 255, // black
            255, 255, 255, 255, // white
            9, 9, // stride padding
        ];

        let frame = CameraFrame {
            width: 2,
            height: 2,
            data: Arc::from(data.as_slice()),
            format: PixelFormat::RGBA,
            stride: 10,
            captured_at: std::time::Instant::now(),
        };

        assert_eq!(luma_plane(&frame, 2, 2), Some(vec![255, 0, 0, 255]));
    }

    #[test]
    fn test_luma_plane_downscales() {
        // 4x2 gradient in the red channel
        let mut data = Vec::new();
        for _ in 0..2 {
            for red in [0u8, 85, 170, 255] {
                data.extend_from_slice(&[red, red, red, 255]);
            }
        }

        let frame = CameraFrame {
            width: 4,
            height: 2,
            data: Arc::from(data.as_slice()),
            format: PixelFormat::RGBA,
            stride: 16,
            captured_at: std::time::Instant::now(),
        };

        let result = luma_plane(&frame, 2, 1).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result[0] < 100);
        assert!(result[1] > 150);
    }

    #[test]
    fn test_luma_plane_reads_packed_formats() {
        // 3x1 gray frame with one byte of padding
        let gray = CameraFrame {
            width: 3,
            height: 1,
            data: Arc::from([10u8, 128, 250, 0].as_slice()),
            format: PixelFormat::Gray8,
            stride: 4,
            captured_at: std::time::Instant::now(),
        };
        assert_eq!(luma_plane(&gray, 3, 1), Some(vec![10, 128, 250]));

        // 2x1 RGB frame, pure red then white
        let rgb = CameraFrame {
            width: 2,
            height: 1,
            data: Arc::from([255u8, 0, 0, 255, 255, 255].as_slice()),
            format: PixelFormat::RGB24,
            stride: 6,
            captured_at: std::time::Instant::now(),
        };
        assert_eq!(luma_plane(&rgb, 2, 1), Some(vec![76, 255]));
    }

    #[test]
    fn test_encoded_frame_is_skipped() {
        let frame = CameraFrame {
            width: 4,
            height: 4,
            data: Arc::from(vec![0xFFu8; 64].as_slice()),
            format: PixelFormat::Encoded,
            stride: 16,
            captured_at: std::time::Instant::now(),
        };
        assert_eq!(luma_plane(&frame, 4, 4), None);
        assert!(QrDetector::new().detect_blocking(&frame).is_empty());
    }

    #[test]
    fn test_blank_frame_has_no_detections() {
        let frame = CameraFrame::from_rgba(image::RgbaImage::from_pixel(
            64,
            48,
            image::Rgba([255, 255, 255, 255]),
        ));
        assert!(QrDetector::new().detect_blocking(&frame).is_empty());
    }

    #[test]
    fn test_empty_frame_has_no_detections() {
        let frame = CameraFrame::from_rgba(image::RgbaImage::new(0, 0));
        assert!(QrDetector::with_max_dimension(16).detect_blocking(&frame).is_empty());
    }
}
