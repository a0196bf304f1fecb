// SPDX-License-Identifier: GPL-3.0-only

//! Orientation handling
//!
//! Two concerns live here:
//!
//! - mapping the UI orientation reported by the host onto the orientation of
//!   the capture stream, whenever a layout or orientation change arrives
//! - the rotation tag attached to finished photos

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interface orientation as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UiOrientation {
    /// The host could not determine the orientation (or reported a flat/face state)
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl UiOrientation {
    /// Parse the names accepted on the command line
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "portrait" => Self::Portrait,
            "portraitupsidedown" | "upsidedown" => Self::PortraitUpsideDown,
            "landscapeleft" => Self::LandscapeLeft,
            "landscaperight" => Self::LandscapeRight,
            _ => Self::Unknown,
        }
    }
}

/// Orientation of the capture stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoOrientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

/// Stream orientation for a UI orientation, `None` when there is no mapping
pub fn map_orientation(ui: UiOrientation) -> Option<VideoOrientation> {
    match ui {
        UiOrientation::Portrait => Some(VideoOrientation::Portrait),
        UiOrientation::PortraitUpsideDown => Some(VideoOrientation::PortraitUpsideDown),
        UiOrientation::LandscapeLeft => Some(VideoOrientation::LandscapeLeft),
        UiOrientation::LandscapeRight => Some(VideoOrientation::LandscapeRight),
        UiOrientation::Unknown => None,
    }
}

/// Stream orientation to use after a change notification
///
/// Unknown orientations keep the previous stream orientation.
pub fn resolve_orientation(ui: UiOrientation, previous: VideoOrientation) -> VideoOrientation {
    map_orientation(ui).unwrap_or(previous)
}

/// Clockwise rotation tag carried by a finished photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// Pixels are already upright
    None,
    /// 90 degrees clockwise
    #[default]
    Rotate90,
    /// 180 degrees
    Rotate180,
    /// 270 degrees clockwise (90 degrees counter-clockwise)
    Rotate270,
}

impl Rotation {
    /// Get the rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }

    /// EXIF orientation value for this rotation
    pub fn exif_orientation(&self) -> u16 {
        match self {
            Rotation::None => 1,
            Rotation::Rotate90 => 6,
            Rotation::Rotate180 => 3,
            Rotation::Rotate270 => 8,
        }
    }

    /// Little-endian TIFF block holding a single Orientation (0x0112) entry,
    /// without the `Exif\0\0` prefix
    pub fn exif_chunk(&self) -> Vec<u8> {
        let mut chunk = Vec::with_capacity(26);
        chunk.extend_from_slice(b"II");
        chunk.extend_from_slice(&42u16.to_le_bytes());
        // IFD0 directly after the header
        chunk.extend_from_slice(&8u32.to_le_bytes());
        chunk.extend_from_slice(&1u16.to_le_bytes());
        // tag, SHORT, count 1, value padded to four bytes
        chunk.extend_from_slice(&0x0112u16.to_le_bytes());
        chunk.extend_from_slice(&3u16.to_le_bytes());
        chunk.extend_from_slice(&1u32.to_le_bytes());
        chunk.extend_from_slice(&self.exif_orientation().to_le_bytes());
        chunk.extend_from_slice(&0u16.to_le_bytes());
        // no next IFD
        chunk.extend_from_slice(&0u32.to_le_bytes());
        chunk
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_orientations_map_one_to_one() {
        assert_eq!(
            map_orientation(UiOrientation::Portrait),
            Some(VideoOrientation::Portrait)
        );
        assert_eq!(
            map_orientation(UiOrientation::PortraitUpsideDown),
            Some(VideoOrientation::PortraitUpsideDown)
        );
        assert_eq!(
            map_orientation(UiOrientation::LandscapeLeft),
            Some(VideoOrientation::LandscapeLeft)
        );
        assert_eq!(
            map_orientation(UiOrientation::LandscapeRight),
            Some(VideoOrientation::LandscapeRight)
        );
    }

    #[test]
    fn test_unknown_keeps_previous() {
        assert_eq!(map_orientation(UiOrientation::Unknown), None);
        assert_eq!(
            resolve_orientation(UiOrientation::Unknown, VideoOrientation::LandscapeRight),
            VideoOrientation::LandscapeRight
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(UiOrientation::from_name("landscape-left"), UiOrientation::LandscapeLeft);
        assert_eq!(UiOrientation::from_name("Portrait"), UiOrientation::Portrait);
        assert_eq!(UiOrientation::from_name("face-up"), UiOrientation::Unknown);
    }

    #[test]
    fn test_rotation_degrees() {
        assert_eq!(Rotation::Rotate270.degrees(), 270);
        assert_eq!(Rotation::Rotate90.to_string(), "90°");
        assert_eq!(Rotation::Rotate90.exif_orientation(), 6);
    }

    #[test]
    fn test_exif_chunk_parses_back() {
        use image::metadata::Orientation;

        for (rotation, expected) in [
            (Rotation::None, Orientation::NoTransforms),
            (Rotation::Rotate90, Orientation::Rotate90),
            (Rotation::Rotate180, Orientation::Rotate180),
            (Rotation::Rotate270, Orientation::Rotate270),
        ] {
            let chunk = rotation.exif_chunk();
            assert_eq!(chunk.len(), 26);
            assert_eq!(Orientation::from_exif_chunk(&chunk), Some(expected));
        }
    }
}
