//! Failure taxonomy for the placement pipeline.
//!
//! Source-unavailable conditions during date resolution are not errors and
//! never appear here; they are absorbed inside the resolver cascade.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::media::MediaKind;

#[derive(Error, Debug)]
pub enum OrganiseError {
    /// Year outside the sane historical bound, indicating a corrupt or
    /// misparsed date. Contract violation, never silently swallowed.
    #[error("invalid year {0}: expected 1900..=2100")]
    InvalidYear(i32),

    /// A non-placeable kind reached the path planner.
    #[error("cannot plan a destination for {0:?} files")]
    InvalidKind(MediaKind),

    #[error("permission denied: {path}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Fatal to the remaining batch, not just this file.
    #[error("disk space exhausted while writing {path}")]
    DiskExhausted { path: PathBuf },

    /// Collision-suffix ceiling reached. Fatal to this file only.
    #[error("too many name conflicts for {path}")]
    TooManyConflicts { path: PathBuf },

    #[error("filesystem error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OrganiseError {
    /// Classify an I/O error observed at `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if is_disk_full(&source) {
            OrganiseError::DiskExhausted {
                path: path.to_path_buf(),
            }
        } else if source.kind() == io::ErrorKind::PermissionDenied {
            OrganiseError::PermissionDenied {
                path: path.to_path_buf(),
                source,
            }
        } else {
            OrganiseError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Whether the error should halt the remaining batch. Disk exhaustion
    /// would recur for every remaining file, so processing stops early.
    pub fn is_fatal(&self) -> bool {
        matches!(self, OrganiseError::DiskExhausted { .. })
    }
}

// ENOSPC
fn is_disk_full(err: &io::Error) -> bool {
    err.raw_os_error() == Some(28) || err.to_string().contains("No space left on device")
}

pub type Result<T> = std::result::Result<T, OrganiseError>;
