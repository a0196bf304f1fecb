// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for viewfinder operations
//!
//! This module provides command-line functionality for:
//! - Scanning an image for codes and printing the overlay state
//! - Taking a square photo through the capture pipeline
//! - Showing the effective configuration

use futures::StreamExt;
use futures::channel::mpsc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use viewfinder::backends::camera::{CameraFrame, StillImageBackend};
use viewfinder::frame_processor::qr_detector::QrDetector;
use viewfinder::frame_processor::{FrameContext, MetadataBatch};
use viewfinder::geometry::Size;
use viewfinder::orientation::UiOrientation;
use viewfinder::overlay::{DetectionAdapter, draw_overlay, render_preview};
use viewfinder::pipelines::photo::{CaptureOutcome, PhotoCapturePipeline};
use viewfinder::storage::DirectorySink;
use viewfinder::{AppResult, Config, Message, Viewfinder};

/// Parse a `WIDTHxHEIGHT` viewport argument
pub fn parse_viewport(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|e| format!("invalid width '{}': {}", width, e))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|e| format!("invalid height '{}': {}", height, e))?;

    if width == 0 || height == 0 {
        return Err("viewport dimensions must be non-zero".to_string());
    }
    Ok((width, height))
}

fn load_config(path: Option<&Path>) -> AppResult<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

/// Detect codes in an image and print the overlay state as JSON
pub fn scan(
    config_path: Option<&Path>,
    image: &Path,
    viewport: Option<(u32, u32)>,
    annotate: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    let rgba = image::open(image)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let viewport = viewport.unwrap_or((width, height));
    debug!(width, height, viewport = ?viewport, "Loaded scan image");

    let frame = Arc::new(CameraFrame::from_rgba(rgba.clone()));
    let detector = QrDetector::with_max_dimension(config.detector_max_dimension);

    let rt = tokio::runtime::Runtime::new()?;
    let detections = rt.block_on(detector.detect(frame));
    info!(count = detections.len(), "Scan complete");

    for detection in &detections {
        eprintln!(
            "{}: {} at {}",
            detection.symbology,
            detection.payload.as_deref().unwrap_or("<undecoded>"),
            detection.bounds
        );
    }

    let context = FrameContext::new(
        Size::from_pixels(width, height),
        Size::from_pixels(viewport.0, viewport.1),
    );
    let mut adapter = DetectionAdapter::new(config.target_symbology, config.fill_mode);
    adapter.on_detections(MetadataBatch::new(0, detections, context));

    println!("{}", serde_json::to_string_pretty(adapter.state())?);

    if let Some(output) = annotate {
        let mut canvas = render_preview(&rgba, viewport, config.fill_mode);
        draw_overlay(&mut canvas, adapter.state());
        canvas.save(output)?;
        println!("Annotated preview saved: {}", output.display());
    }

    Ok(())
}

/// Take a square photo using an image file as the capture source
pub fn take_photo(
    config_path: Option<&Path>,
    image: &Path,
    output: Option<PathBuf>,
    orientation: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let output_dir = output.unwrap_or_else(|| config.photo_dir());

    // A missing source is fatal: there is nothing to capture from
    let (sender, mut receiver) = mpsc::unbounded();
    let backend = StillImageBackend::open(image, sender)?;
    let sink = DirectorySink::new(&output_dir, config.photo_encoder());
    let pipeline = PhotoCapturePipeline::from_config(Box::new(backend), Box::new(sink), &config);

    let mut viewfinder = Viewfinder::new(&config, pipeline);
    if let Some(name) = orientation {
        viewfinder.update(Message::OrientationChanged(UiOrientation::from_name(name)));
        println!("Stream orientation: {:?}", viewfinder.video_orientation());
    }

    println!("Capturing...");
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        viewfinder.update(Message::TriggerCapture);
        while viewfinder.capture_state().is_busy() {
            match receiver.next().await {
                Some(event) => viewfinder.update(event.into()),
                None => break,
            }
        }
    });

    match viewfinder.last_outcome() {
        Some(CaptureOutcome::Persisted { side, rotation, .. }) => {
            println!(
                "Photo saved to {} ({}x{}, orientation {})",
                output_dir.display(),
                side,
                side,
                rotation
            );
            Ok(())
        }
        Some(CaptureOutcome::Failed { error, .. }) => Err(error.to_string().into()),
        None => Err("Capture did not complete".into()),
    }
}

/// Print the effective configuration (or its location)
pub fn show_config(
    config_path: Option<&Path>,
    path_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if path_only {
        match config_path {
            Some(path) => println!("{}", path.display()),
            None => println!("No config directory available"),
        }
        return Ok(());
    }

    let config = load_config(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewport() {
        assert_eq!(parse_viewport("390x844"), Ok((390, 844)));
        assert_eq!(parse_viewport("1920X1080"), Ok((1920, 1080)));
        assert!(parse_viewport("390").is_err());
        assert!(parse_viewport("0x10").is_err());
        assert!(parse_viewport("axb").is_err());
    }
}
