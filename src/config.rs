// SPDX-License-Identifier: GPL-3.0-only

//! Application configuration
//!
//! Stored as JSON in `~/.config/viewfinder/config.json`. Every field has a
//! default, so partial files and missing files both load.

use crate::backends::camera::CaptureSettings;
use crate::constants;
use crate::errors::{AppError, AppResult};
use crate::frame_processor::SymbolKind;
use crate::geometry::FillMode;
use crate::orientation::Rotation;
use crate::pipelines::photo::{EncodingQuality, PhotoEncoder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output file format for saved photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhotoOutputFormat {
    /// JPEG with the configured quality
    #[default]
    Jpeg,
    /// Lossless PNG
    Png,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Symbology the overlay tracks
    pub target_symbology: SymbolKind,
    /// How the preview scales sensor content into the viewport
    pub fill_mode: FillMode,
    /// Settings sent with every still capture
    pub capture: CaptureSettings,
    /// Rotation tag applied to finished photos
    ///
    /// Defaults to a quarter turn. `Rotate180` tags photos upside down.
    pub output_rotation: Rotation,
    pub photo_format: PhotoOutputFormat,
    /// JPEG quality preset (ignored for PNG)
    pub photo_quality: EncodingQuality,
    /// Where photos are written (`None` uses the pictures directory)
    pub photo_directory: Option<PathBuf>,
    /// Preview frames are downscaled to this size before detection
    pub detector_max_dimension: u32,
    /// Fail the capture request when the storage sink fails
    pub strict_storage: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_symbology: SymbolKind::Qr,
            fill_mode: FillMode::AspectFill,
            capture: CaptureSettings::default(),
            output_rotation: Rotation::Rotate90,
            photo_format: PhotoOutputFormat::Jpeg,
            photo_quality: EncodingQuality::High,
            photo_directory: None,
            detector_max_dimension: constants::detector::DEFAULT_MAX_DIMENSION,
            strict_storage: false, // Sink failures are logged only
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(constants::APP_DIR_NAME)
                .join(constants::CONFIG_FILE_NAME)
        })
    }

    /// Load the config from `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write the config to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;

        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Directory photos are written to
    pub fn photo_dir(&self) -> PathBuf {
        self.photo_directory
            .clone()
            .unwrap_or_else(crate::storage::default_photo_dir)
    }

    /// Encoder matching the configured format and quality
    pub fn photo_encoder(&self) -> PhotoEncoder {
        let mut encoder = PhotoEncoder::new();
        encoder.set_format(self.photo_format.into());
        encoder.set_quality(self.photo_quality);
        encoder
    }
}
