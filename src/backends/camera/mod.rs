// SPDX-License-Identifier: MPL-2.0

//! Capture collaborator abstraction
//!
//! The viewfinder core never talks to camera hardware. It issues one
//! "start capture with these settings" call per trigger through
//! [`CaptureBackend`] and receives the outcome later as a [`CaptureEvent`].
//!
//! ```text
//! ┌─────────────────────┐   start_capture    ┌───────────────────┐
//! │ PhotoCapturePipeline│ ─────────────────▶ │  CaptureBackend   │
//! └──────────▲──────────┘                    └─────────┬─────────┘
//!            │          CaptureEvent::{Started,Finished}│
//!            └──────────────────────────────────────────┘
//! ```

pub mod still;
pub mod types;

pub use still::StillImageBackend;
pub use types::*;

use crate::errors::CameraError;
use crate::pipelines::photo::CaptureRequest;

/// The capture side of the device
pub trait CaptureBackend {
    /// Human-readable backend name for logs
    fn name(&self) -> &str;

    /// Start capturing a still photo for `request`
    ///
    /// Completion is reported asynchronously as [`CaptureEvent`]s tagged with
    /// the request id. An `Err` here means the capture never started.
    fn start_capture(
        &mut self,
        request: &CaptureRequest,
        settings: &CaptureSettings,
    ) -> Result<(), CameraError>;
}
