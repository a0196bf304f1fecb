// SPDX-License-Identifier: MPL-2.0

//! Error types for the viewfinder core
//!
//! Only [`CameraError::DeviceUnavailable`] is meant to be fatal, and only at
//! startup. Everything raised while a photo request is in flight ends that
//! request and is logged; the user retries by triggering again.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo capture errors
    Photo(PhotoError),
    /// Storage sink errors
    Storage(StorageError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Errors reported by the capture collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No usable video source. Fatal when raised at startup.
    DeviceUnavailable(String),
    /// A single capture request failed
    CaptureFailed(String),
}

/// Errors that terminate one photo request
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoError {
    /// The collaborator reported a capture failure
    Capture(CameraError),
    /// The captured buffer could not be decoded into an image
    ImageDecode(String),
    /// The decoded image cannot yield a square crop
    InvalidImageGeometry { width: u32, height: u32 },
    /// The storage sink rejected the finished image (strict storage only)
    Storage(StorageError),
}

/// Storage sink errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Filesystem failure
    Io(String),
    /// Encoding the finished image failed
    Encoding(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DeviceUnavailable(msg) => write!(f, "No video device available: {}", msg),
            CameraError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::Capture(e) => write!(f, "{}", e),
            PhotoError::ImageDecode(msg) => write!(f, "Failed to decode captured image: {}", msg),
            PhotoError::InvalidImageGeometry { width, height } => {
                write!(f, "Invalid image geometry: {}x{}", width, height)
            }
            PhotoError::Storage(e) => write!(f, "Failed to store photo: {}", e),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
            StorageError::Encoding(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for StorageError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<CameraError> for PhotoError {
    fn from(err: CameraError) -> Self {
        PhotoError::Capture(err)
    }
}

impl From<StorageError> for PhotoError {
    fn from(err: StorageError) -> Self {
        PhotoError::Storage(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(StorageError::Io(err.to_string()))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<image::ImageError> for StorageError {
    fn from(err: image::ImageError) -> Self {
        StorageError::Encoding(err.to_string())
    }
}
