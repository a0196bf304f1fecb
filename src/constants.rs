// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Name used for the config and photo directories
pub const APP_DIR_NAME: &str = "viewfinder";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Detector constants
pub mod detector {
    /// Preview frames are downscaled to this maximum dimension before QR detection.
    /// Codes are typically large enough in frame to survive it.
    pub const DEFAULT_MAX_DIMENSION: u32 = 640;
}

/// Overlay styling
pub mod overlay {
    /// Border width of the detection box (in viewport pixels)
    pub const BORDER_WIDTH: u32 = 2;

    /// Border colour of the detection box (RGBA)
    pub const BORDER_COLOR: [u8; 4] = [0, 255, 0, 255];
}

/// Storage constants
pub mod storage {
    /// Prefix for saved photo file names
    pub const PHOTO_PREFIX: &str = "IMG_";

    /// Timestamp format for saved photo file names (millisecond resolution)
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
}

/// Application version string
pub fn app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
