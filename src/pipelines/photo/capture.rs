// SPDX-License-Identifier: MPL-2.0

//! Capture request bookkeeping
//!
//! A request lives from `trigger()` to its terminal outcome:
//!
//! ```text
//! Idle → Requested → Capturing → Processing → { Persisted | Failed } → Idle
//! ```
//!
//! `Persisted` and `Failed` are passed through on the way back to `Idle`;
//! the pipeline records which one it was as the request's [`CaptureOutcome`].

use crate::errors::PhotoError;
use crate::orientation::Rotation;
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// One in-flight photo capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub id: Uuid,
    /// When the user triggered the capture
    pub requested_at: Instant,
}

impl CaptureRequest {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            requested_at: Instant::now(),
        }
    }
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// No request outstanding, triggers are accepted
    #[default]
    Idle,
    /// Capture call issued, waiting for the device to acknowledge it
    Requested,
    /// Device is capturing
    Capturing,
    /// Decoding, cropping and handing off the photo
    Processing,
    /// The finished image went to the storage sink
    Persisted,
    /// The request ended with an error
    Failed,
}

impl CaptureState {
    /// True while a request is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            CaptureState::Requested | CaptureState::Capturing | CaptureState::Processing
        )
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureState::Idle => "idle",
            CaptureState::Requested => "requested",
            CaptureState::Capturing => "capturing",
            CaptureState::Processing => "processing",
            CaptureState::Persisted => "persisted",
            CaptureState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Terminal result of one request, kept for the UI to show
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Persisted {
        request: Uuid,
        /// Side length of the stored square image
        side: u32,
        rotation: Rotation,
    },
    Failed {
        request: Uuid,
        error: PhotoError,
    },
}

impl CaptureOutcome {
    pub fn request_id(&self) -> Uuid {
        match self {
            CaptureOutcome::Persisted { request, .. } | CaptureOutcome::Failed { request, .. } => {
                *request
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CaptureOutcome::Failed { .. })
    }

    /// The state the request terminated in
    pub fn state(&self) -> CaptureState {
        match self {
            CaptureOutcome::Persisted { .. } => CaptureState::Persisted,
            CaptureOutcome::Failed { .. } => CaptureState::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_are_unique() {
        assert_ne!(CaptureRequest::new().id, CaptureRequest::new().id);
    }

    #[test]
    fn test_busy_states() {
        assert!(!CaptureState::Idle.is_busy());
        assert!(CaptureState::Requested.is_busy());
        assert!(CaptureState::Capturing.is_busy());
        assert!(CaptureState::Processing.is_busy());
        assert!(!CaptureState::Failed.is_busy());
    }
}
