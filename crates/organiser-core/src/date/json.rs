//! Takeout companion JSON ("sidecar") date extraction.
//!
//! Sidecars sit beside the media file with `.json` appended to the full
//! name (`photo.jpg` -> `photo.jpg.json`) and carry the capture time as
//! Unix epoch seconds under `photoTakenTime.timestamp`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// Companion metadata path for a media file: the full name plus `.json`.
pub fn sidecar_path(media_path: &Path) -> PathBuf {
    let mut name = OsString::from(media_path.as_os_str());
    name.push(".json");
    PathBuf::from(name)
}

/// Read and parse the sidecar beside `media_path`. Missing file, unreadable
/// file or unusable content all yield `None`.
pub fn sidecar_date(media_path: &Path) -> Option<NaiveDateTime> {
    let bytes = fs::read(sidecar_path(media_path)).ok()?;
    parse_photo_taken_time(&bytes)
}

/// Extract `photoTakenTime.timestamp` from sidecar JSON bytes.
///
/// Takeout writes the epoch as a string (`"timestamp": "1609459200"`); a
/// bare number is tolerated as well. Negative epochs (pre-1970 scans) are
/// valid. Conversion is epoch -> UTC calendar date, so the same sidecar
/// yields the same year on every machine.
pub fn parse_photo_taken_time(bytes: &[u8]) -> Option<NaiveDateTime> {
    let data: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    let ts = data.get("photoTakenTime")?.get("timestamp")?;

    let epoch = match ts {
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
        other => other.as_i64()?,
    };

    Some(chrono::DateTime::from_timestamp(epoch, 0)?.naive_utc())
}
