// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use viewfinder::constants;

#[test]
fn test_photo_names_sort_chronologically() {
    // Timestamps are zero-padded, so lexical order is time order
    let earlier = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|d| d.and_hms_milli_opt(9, 5, 7, 42))
        .unwrap();
    let later = chrono::NaiveDate::from_ymd_opt(2024, 11, 20)
        .and_then(|d| d.and_hms_milli_opt(18, 0, 0, 0))
        .unwrap();

    let name = |t: chrono::NaiveDateTime| {
        format!(
            "{}{}",
            constants::storage::PHOTO_PREFIX,
            t.format(constants::storage::TIMESTAMP_FORMAT)
        )
    };

    assert_eq!(name(earlier), "IMG_20240309_090507_042");
    assert!(name(earlier) < name(later));
}

#[test]
fn test_overlay_border_is_visible() {
    assert!(constants::overlay::BORDER_WIDTH > 0);
    assert_eq!(constants::overlay::BORDER_COLOR[3], 255, "Border should be opaque");
}

#[test]
fn test_app_version_matches_package() {
    assert_eq!(constants::app_version(), env!("CARGO_PKG_VERSION"));
}
