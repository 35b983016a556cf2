//! Placement engine: classify, resolve, plan and copy one file at a time,
//! folding results into a per-batch summary.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::date;
use crate::error::{OrganiseError, Result};
use crate::media::{MediaItem, MediaKind};
use crate::plan::{self, YearBucket};
use crate::ThrottledProgress;

/// Files above this size get a heads-up notice before copying starts.
pub const LARGE_FILE_WARNING_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Why a file was skipped without touching the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Sidecar,
    Unrecognized,
}

/// Outcome of placing one file.
#[derive(Debug, Clone)]
pub enum Placement {
    Organized {
        kind: MediaKind,
        year: YearBucket,
        dest: PathBuf,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct YearCounts {
    pub photos: u64,
    pub videos: u64,
}

impl YearCounts {
    pub fn total(&self) -> u64 {
        self.photos + self.videos
    }
}

/// Aggregate result of one batch. Owned by the caller; merged across
/// archives by the pipeline driver.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub files_processed: u64,
    pub files_organized: u64,
    pub sidecar_skipped: u64,
    pub unrecognized_skipped: u64,
    pub errors: Vec<String>,
    /// Year -> photo/video counts; the unknown bucket sorts last.
    pub by_year: BTreeMap<YearBucket, YearCounts>,
}

impl RunSummary {
    pub fn record_organized(&mut self, kind: MediaKind, year: YearBucket) {
        self.files_organized += 1;
        let counts = self.by_year.entry(year).or_default();
        match kind {
            MediaKind::Photo => counts.photos += 1,
            MediaKind::Video => counts.videos += 1,
            MediaKind::SidecarMetadata | MediaKind::Unrecognized => {}
        }
    }

    pub fn merge(&mut self, other: RunSummary) {
        self.files_processed += other.files_processed;
        self.files_organized += other.files_organized;
        self.sidecar_skipped += other.sidecar_skipped;
        self.unrecognized_skipped += other.unrecognized_skipped;
        self.errors.extend(other.errors);
        for (year, counts) in other.by_year {
            let entry = self.by_year.entry(year).or_default();
            entry.photos += counts.photos;
            entry.videos += counts.videos;
        }
    }

    pub fn total_photos(&self) -> u64 {
        self.by_year.values().map(|c| c.photos).sum()
    }

    pub fn total_videos(&self) -> u64 {
        self.by_year.values().map(|c| c.videos).sum()
    }
}

/// Place one media item under `output_root`.
///
/// Sidecar and unrecognized files are skipped with no filesystem mutation.
/// The source file is never modified or deleted.
pub fn place_file(
    item: &MediaItem,
    output_root: &Path,
    mtime_fallback: bool,
) -> Result<Placement> {
    let kind = match item.kind() {
        MediaKind::SidecarMetadata => return Ok(Placement::Skipped(SkipReason::Sidecar)),
        MediaKind::Unrecognized => return Ok(Placement::Skipped(SkipReason::Unrecognized)),
        kind => kind,
    };

    let resolved = if mtime_fallback {
        date::resolve_with_fallback(&item.path)
    } else {
        date::resolve(&item.path)
    };
    let year = match resolved {
        Some(capture) => YearBucket::Year(capture.year()),
        None => YearBucket::Unknown,
    };

    let candidate = plan::plan_destination(item.file_name(), kind, year, output_root)?;
    let dest = plan::resolve_conflict(&candidate)?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| OrganiseError::from_io(parent, e))?;
    }
    copy_media(&item.path, &dest)?;

    Ok(Placement::Organized { kind, year, dest })
}

/// Copy file bytes to `dest`, carrying the source's modification time.
/// `fs::copy` already preserves permissions.
fn copy_media(source: &Path, dest: &Path) -> Result<()> {
    fs::copy(source, dest).map_err(|e| OrganiseError::from_io(dest, e))?;
    if let Ok(meta) = fs::metadata(source) {
        let mtime = filetime::FileTime::from_last_modification_time(&meta);
        filetime::set_file_mtime(dest, mtime).ok();
    }
    Ok(())
}

/// Notice text for a file large enough that the copy will take a while.
fn large_file_warning(name: &str, size: u64) -> Option<String> {
    if size <= LARGE_FILE_WARNING_BYTES {
        return None;
    }
    let gib = size as f64 / (1024.0 * 1024.0 * 1024.0);
    Some(format!(
        "large file: {} ({:.2} GiB), copying may take a while",
        name, gib
    ))
}

/// Record a per-file error on the summary. Returns whether the batch must
/// halt: disk exhaustion would recur for every remaining file.
fn record_error(summary: &mut RunSummary, path: &Path, err: OrganiseError) -> bool {
    let fatal = err.is_fatal();
    summary.errors.push(format!("{}: {}", path.display(), err));
    if fatal {
        summary
            .errors
            .push("stopping: disk space exhausted".to_string());
    }
    fatal
}

/// Fold [`place_file`] over a batch of discovered files, sequentially.
///
/// One file's failure is recorded and the batch continues; disk exhaustion
/// halts the remaining batch.
pub fn organize_batch(
    files: &[PathBuf],
    output_root: &Path,
    mtime_fallback: bool,
    progress: &ThrottledProgress,
) -> RunSummary {
    organize_batch_with(files, output_root, mtime_fallback, progress, place_file)
}

fn organize_batch_with(
    files: &[PathBuf],
    output_root: &Path,
    mtime_fallback: bool,
    progress: &ThrottledProgress,
    place: impl Fn(&MediaItem, &Path, bool) -> Result<Placement>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let total = files.len() as u64;

    for (i, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<invalid name>");
        progress.report("organize", i as u64, total, name);
        summary.files_processed += 1;

        let item = match MediaItem::from_path(path) {
            Ok(item) => item,
            Err(e) => {
                if record_error(&mut summary, path, OrganiseError::from_io(path, e)) {
                    break;
                }
                continue;
            }
        };

        if let Some(warning) = large_file_warning(name, item.size) {
            progress.notice("organize", &warning);
        }

        match place(&item, output_root, mtime_fallback) {
            Ok(Placement::Organized { kind, year, .. }) => summary.record_organized(kind, year),
            Ok(Placement::Skipped(SkipReason::Sidecar)) => summary.sidecar_skipped += 1,
            Ok(Placement::Skipped(SkipReason::Unrecognized)) => {
                summary.unrecognized_skipped += 1
            }
            Err(err) => {
                if record_error(&mut summary, path, err) {
                    break;
                }
            }
        }
    }

    summary
}
