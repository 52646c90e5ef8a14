// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use qr_scanner::constants::{email, file_formats, scan, schemes, ui};

#[test]
fn test_image_extensions() {
    assert!(file_formats::is_image_extension("png"));
    assert!(file_formats::is_image_extension("JPG"));
    assert!(!file_formats::is_image_extension("pdf"));
}

#[test]
fn test_scan_interval_bounds() {
    assert!(scan::MIN_INTERVAL_MS <= scan::DEFAULT_INTERVAL_MS);
    assert!(scan::MAX_DECODE_DIMENSION > 0);
}

#[test]
fn test_url_and_mail_schemes() {
    assert_eq!(schemes::HTTP_PREFIX, "http://");
    assert_eq!(schemes::HTTPS_PREFIX, "https://");
    assert_eq!(schemes::MAILTO, "mailto");
    assert_eq!(email::DEFAULT_SUBJECT, "Subject");
    assert_eq!(email::DEFAULT_BODY, "Body");
}

#[test]
fn test_preview_not_smaller_than_decode_size() {
    assert!(ui::PREVIEW_MAX_DIMENSION >= scan::MAX_DECODE_DIMENSION);
}
