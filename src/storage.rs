// SPDX-License-Identifier: MPL-2.0

//! Storage sinks for finished photos
//!
//! The capture pipeline hands every [`FinishedImage`] to a [`StorageSink`]
//! and does not wait on the result beyond logging it (unless strict storage
//! is enabled in the config).

use crate::constants;
use crate::errors::StorageError;
use crate::pipelines::photo::{FinishedImage, PhotoEncoder};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Destination for finished photos
pub trait StorageSink {
    /// Take ownership of a finished image
    fn store(&mut self, image: FinishedImage) -> Result<(), StorageError>;
}

/// Default photo directory (`~/Pictures/viewfinder`)
pub fn default_photo_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::APP_DIR_NAME)
}

/// Writes encoded photos into a directory
pub struct DirectorySink {
    dir: PathBuf,
    encoder: PhotoEncoder,
    last_path: Option<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, encoder: PhotoEncoder) -> Self {
        Self {
            dir: dir.into(),
            encoder,
            last_path: None,
        }
    }

    /// Path of the most recently written photo
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    fn next_path(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format(constants::storage::TIMESTAMP_FORMAT);
        let extension = self.encoder.format().extension();
        let base = format!("{}{}", constants::storage::PHOTO_PREFIX, timestamp);

        let mut path = self.dir.join(format!("{}.{}", base, extension));
        let mut counter = 1;
        while path.exists() {
            path = self.dir.join(format!("{}_{}.{}", base, counter, extension));
            counter += 1;
        }
        path
    }
}

impl StorageSink for DirectorySink {
    fn store(&mut self, image: FinishedImage) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;

        let encoded = self.encoder.encode(&image)?;
        let path = self.next_path();
        debug!(path = %path.display(), bytes = encoded.data.len(), "Writing photo");

        std::fs::write(&path, &encoded.data)?;

        info!(
            path = %path.display(),
            width = encoded.width,
            height = encoded.height,
            "Photo saved"
        );
        self.last_path = Some(path);
        Ok(())
    }
}

/// Keeps finished photos in memory
///
/// Clones share the same storage, so a test can keep one handle and give
/// another to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    images: Arc<Mutex<Vec<FinishedImage>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored images
    pub fn images(&self) -> Vec<FinishedImage> {
        self.images
            .lock()
            .map(|images| images.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.images.lock().map(|images| images.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageSink for MemorySink {
    fn store(&mut self, image: FinishedImage) -> Result<(), StorageError> {
        self.images
            .lock()
            .map_err(|_| StorageError::Io("memory sink poisoned".into()))?
            .push(image);
        Ok(())
    }
}
