use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Photo extensions recognized by the classifier (lowercase).
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "webp", "gif"];

/// Video extensions recognized by the classifier (lowercase).
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];

/// Takeout companion metadata files.
const SIDECAR_EXTENSION: &str = "json";

/// Image formats the EXIF reader is attempted on. Videos never qualify.
const EXIF_CAPABLE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Semantic kind of a discovered file, derived purely from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MediaKind {
    Photo,
    Video,
    SidecarMetadata,
    Unrecognized,
}

impl MediaKind {
    /// Output subdirectory for placeable kinds.
    pub fn subdir(self) -> Option<&'static str> {
        match self {
            MediaKind::Photo => Some("photos"),
            MediaKind::Video => Some("videos"),
            MediaKind::SidecarMetadata | MediaKind::Unrecognized => None,
        }
    }
}

/// Classify a file by extension, case-insensitively. Total: every input
/// maps to a kind, with `Unrecognized` as the fallback. No filesystem access.
pub fn classify(path: &Path) -> MediaKind {
    let ext = lowercase_extension(path);
    classify_extension(&ext)
}

fn classify_extension(ext: &str) -> MediaKind {
    if ext == SIDECAR_EXTENSION {
        MediaKind::SidecarMetadata
    } else if PHOTO_EXTENSIONS.contains(&ext) {
        MediaKind::Photo
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        MediaKind::Video
    } else {
        MediaKind::Unrecognized
    }
}

/// Whether the extension belongs to an image format we read EXIF from.
pub fn is_exif_capable(ext: &str) -> bool {
    EXIF_CAPABLE_EXTENSIONS.contains(&ext)
}

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// One file discovered under the extraction root. Immutable; created once
/// per discovered file and discarded after placement.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// Absolute path of the source file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Lowercase extension, empty if none
    pub extension: String,
}

impl MediaItem {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            size: meta.len(),
            extension: lowercase_extension(path),
        })
    }

    pub fn kind(&self) -> MediaKind {
        classify_extension(&self.extension)
    }

    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }
}
