//! Destination planning and collision avoidance.
//!
//! Collision resolution reads live filesystem state that each copy mutates,
//! so planning and copying are serialized per file; destinations must not
//! be pre-computed for a whole batch.

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serializer;

use crate::error::{OrganiseError, Result};
use crate::media::MediaKind;

/// Inclusive sane historical bound for resolved years. Anything outside
/// indicates a corrupt or misparsed date.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Ceiling on collision-suffix attempts per file.
const MAX_CONFLICT_ATTEMPTS: u32 = 9999;

/// Directory name for media whose date could not be resolved.
pub const UNKNOWN_YEAR_DIR: &str = "unknown";

/// Year partition a media file is placed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearBucket {
    Year(i32),
    Unknown,
}

impl fmt::Display for YearBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearBucket::Year(y) => write!(f, "{}", y),
            YearBucket::Unknown => f.write_str(UNKNOWN_YEAR_DIR),
        }
    }
}

// Unknown sorts after every numeric year so reports list it last.
impl Ord for YearBucket {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (YearBucket::Year(a), YearBucket::Year(b)) => a.cmp(b),
            (YearBucket::Year(_), YearBucket::Unknown) => Ordering::Less,
            (YearBucket::Unknown, YearBucket::Year(_)) => Ordering::Greater,
            (YearBucket::Unknown, YearBucket::Unknown) => Ordering::Equal,
        }
    }
}

impl PartialOrd for YearBucket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl serde::Serialize for YearBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Compute the canonical destination for a media file:
/// `output_root/{photos|videos}/<year>/<original file name>`.
///
/// Only Photo and Video may reach this stage; numeric years must lie in
/// 1900..=2100. Both violations are caller-contract errors.
pub fn plan_destination(
    file_name: &OsStr,
    kind: MediaKind,
    year: YearBucket,
    output_root: &Path,
) -> Result<PathBuf> {
    let subdir = kind.subdir().ok_or(OrganiseError::InvalidKind(kind))?;

    if let YearBucket::Year(y) = year {
        if !(MIN_YEAR..=MAX_YEAR).contains(&y) {
            return Err(OrganiseError::InvalidYear(y));
        }
    }

    Ok(output_root
        .join(subdir)
        .join(year.to_string())
        .join(file_name))
}

/// Return `candidate` if free, otherwise the first free variant with a
/// zero-padded `_NNN` suffix before the extension (`photo.jpg` ->
/// `photo_001.jpg`). Gives up after 9999 attempts.
pub fn resolve_conflict(candidate: &Path) -> Result<PathBuf> {
    if !candidate.exists() {
        return Ok(candidate.to_path_buf());
    }

    let parent = candidate.parent().unwrap_or(Path::new(""));
    let stem = candidate
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let ext = candidate.extension().and_then(|s| s.to_str());

    for counter in 1..=MAX_CONFLICT_ATTEMPTS {
        let name = match ext {
            Some(e) => format!("{}_{:03}.{}", stem, counter, e),
            None => format!("{}_{:03}", stem, counter),
        };
        let next = parent.join(name);
        if !next.exists() {
            return Ok(next);
        }
    }

    Err(OrganiseError::TooManyConflicts {
        path: candidate.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_destination_layout() {
        let dest = plan_destination(
            OsStr::new("photo.jpg"),
            MediaKind::Photo,
            YearBucket::Year(2021),
            Path::new("/out"),
        )
        .unwrap();
        assert_eq!(dest, PathBuf::from("/out/photos/2021/photo.jpg"));

        let dest = plan_destination(
            OsStr::new("clip.mp4"),
            MediaKind::Video,
            YearBucket::Unknown,
            Path::new("/out"),
        )
        .unwrap();
        assert_eq!(dest, PathBuf::from("/out/videos/unknown/clip.mp4"));
    }

    #[test]
    fn test_year_bounds() {
        let plan = |y| {
            plan_destination(
                OsStr::new("a.jpg"),
                MediaKind::Photo,
                YearBucket::Year(y),
                Path::new("/out"),
            )
        };
        assert!(matches!(plan(1899), Err(OrganiseError::InvalidYear(1899))));
        assert!(matches!(plan(2101), Err(OrganiseError::InvalidYear(2101))));
        assert!(plan(1900).is_ok());
        assert!(plan(2100).is_ok());
    }

    #[test]
    fn test_non_placeable_kinds_rejected() {
        for kind in [MediaKind::SidecarMetadata, MediaKind::Unrecognized] {
            let err = plan_destination(
                OsStr::new("a.json"),
                kind,
                YearBucket::Year(2020),
                Path::new("/out"),
            )
            .unwrap_err();
            assert!(matches!(err, OrganiseError::InvalidKind(_)));
        }
    }

    #[test]
    fn test_conflict_free_path_unchanged() {
        let dir = tempfile::TempDir::new().unwrap();
        let candidate = dir.path().join("photo.jpg");
        assert_eq!(resolve_conflict(&candidate).unwrap(), candidate);
    }

    #[test]
    fn test_conflict_suffix_sequence() {
        let dir = tempfile::TempDir::new().unwrap();
        let candidate = dir.path().join("photo.jpg");
        File::create(&candidate).unwrap();

        assert_eq!(
            resolve_conflict(&candidate).unwrap(),
            dir.path().join("photo_001.jpg")
        );

        File::create(dir.path().join("photo_001.jpg")).unwrap();
        File::create(dir.path().join("photo_002.jpg")).unwrap();
        assert_eq!(
            resolve_conflict(&candidate).unwrap(),
            dir.path().join("photo_003.jpg")
        );
    }

    #[test]
    fn test_conflict_without_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let candidate = dir.path().join("photo");
        File::create(&candidate).unwrap();
        assert_eq!(
            resolve_conflict(&candidate).unwrap(),
            dir.path().join("photo_001")
        );
    }

    #[test]
    fn test_unknown_sorts_last() {
        let mut buckets = vec![
            YearBucket::Unknown,
            YearBucket::Year(2021),
            YearBucket::Year(1999),
        ];
        buckets.sort();
        assert_eq!(
            buckets,
            vec![
                YearBucket::Year(1999),
                YearBucket::Year(2021),
                YearBucket::Unknown
            ]
        );
    }
}
