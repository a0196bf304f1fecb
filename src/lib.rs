// SPDX-License-Identifier: MPL-2.0

//! Viewfinder - live code detection overlay and square photo capture
//!
//! This library provides the core of a camera viewfinder: it maps code
//! detections from sensor space onto the on-screen preview, decides what
//! the overlay shows for every frame, and turns captured photos into
//! centered, orientation-tagged square images.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`geometry`]: Coordinate-space typed geometry, fill-mode transform, square crop
//! - [`orientation`]: UI to stream orientation mapping and photo rotation tags
//! - [`frame_processor`]: Detection types and the QR detector
//! - [`overlay`]: Overlay state driven by detection batches
//! - [`backends`]: Capture collaborator abstraction
//! - [`pipelines`]: Photo capture pipeline
//! - [`storage`]: Storage sinks for finished photos
//! - [`app`]: Host component tying everything together
//! - [`config`]: User configuration handling

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod frame_processor;
pub mod geometry;
pub mod orientation;
pub mod overlay;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{Message, Viewfinder};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use geometry::{FillMode, Rect, Size};
pub use overlay::{DetectionAdapter, OverlayState};
pub use pipelines::photo::PhotoCapturePipeline;
