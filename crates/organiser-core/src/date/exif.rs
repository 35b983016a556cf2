//! Embedded EXIF capture-time extraction.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use chrono::NaiveDateTime;
use exif::{In, Reader, Tag};

/// Read `DateTimeOriginal` from an image file on disk. Any I/O or decode
/// failure yields `None`; the caller falls through to the next source.
pub fn file_exif_date(image_path: &Path) -> Option<NaiveDateTime> {
    let bytes = fs::read(image_path).ok()?;
    exif_date(&bytes)
}

/// Extract `DateTimeOriginal` from raw image bytes. EXIF datetimes carry
/// no timezone; the value is taken as-is.
pub fn exif_date(bytes: &[u8]) -> Option<NaiveDateTime> {
    let reader = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    let field = reader.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    parse_exif_datetime(&field.display_value().to_string())
}

/// EXIF datetime text format: `YYYY:MM:DD HH:MM:SS`. The exif crate's
/// display form uses dashes, so separators are normalized first.
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s.trim().replace(['-', '/'], ":");
    NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S").ok()
}
