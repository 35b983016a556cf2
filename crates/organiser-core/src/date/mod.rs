//! Best-effort capture date resolution.
//!
//! Priority is fixed: sidecar JSON always wins over embedded EXIF, because
//! it carries curated export-time metadata rather than best-effort file
//! introspection. Each source returns `None` on any failure and the cascade
//! falls through; resolution itself never errors.

pub mod exif;
pub mod json;

use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDateTime};

use crate::media;

/// Which source in the cascade produced the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Sidecar,
    EmbeddedMetadata,
    FileModified,
}

/// A resolved capture point in time. Downstream consumes the year.
#[derive(Debug, Clone, Copy)]
pub struct CaptureDate {
    pub date: NaiveDateTime,
    pub source: DateSource,
}

impl CaptureDate {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Resolve a capture date from sidecar JSON, then embedded EXIF (images
/// only). Returns `None` when neither source yields a date.
pub fn resolve(media_path: &Path) -> Option<CaptureDate> {
    if let Some(date) = json::sidecar_date(media_path) {
        return Some(CaptureDate {
            date,
            source: DateSource::Sidecar,
        });
    }

    let ext = media_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if media::is_exif_capable(&ext) {
        if let Some(date) = exif::file_exif_date(media_path) {
            return Some(CaptureDate {
                date,
                source: DateSource::EmbeddedMetadata,
            });
        }
    }

    None
}

/// Like [`resolve`], with the file's modification time as the guaranteed
/// last resort. Still returns `None` if the file itself is unreadable, which
/// downstream treats as the unknown-year bucket.
pub fn resolve_with_fallback(media_path: &Path) -> Option<CaptureDate> {
    if let Some(capture) = resolve(media_path) {
        return Some(capture);
    }

    let modified = fs::metadata(media_path).and_then(|m| m.modified()).ok()?;
    let date = chrono::DateTime::<chrono::Utc>::from(modified).naive_utc();
    Some(CaptureDate {
        date,
        source: DateSource::FileModified,
    })
}
