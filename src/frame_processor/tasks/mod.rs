// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing tasks
//!
//! Detectors that turn preview frames into detections.

pub mod qr_detector;

pub use qr_detector::QrDetector;
