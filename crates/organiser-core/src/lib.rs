//! Core pipeline for organizing Google Photos Takeout exports: extract each
//! archive, resolve a capture date per media file, and copy it into a
//! year- and type-partitioned output tree without overwriting anything.

pub mod date;
pub mod error;
pub mod extract;
pub mod media;
pub mod organize;
pub mod plan;
pub mod report;

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

pub use error::OrganiseError;
pub use media::{classify, MediaItem, MediaKind};
pub use organize::{Placement, RunSummary};
pub use plan::YearBucket;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Takeout zip archives to process, in order.
    pub zip_files: Vec<PathBuf>,
    /// Output root for the organized tree.
    pub output: PathBuf,
    /// Fall back to the file's modification time when neither sidecar nor
    /// EXIF yields a date. Off by default: undated media goes to the
    /// explicit `unknown` bucket instead.
    #[serde(default)]
    pub mtime_fallback: bool,
}

/// Progress observer: (stage, current, total, message). Created once per
/// run by the caller and passed down by reference; no ambient global.
pub type ProgressCallback = dyn Fn(&str, u64, u64, &str) + Send + Sync;

/// Rate-limits progress reports so tight per-file loops don't flood the
/// display. Routine reports are dropped inside the emit interval; the final
/// item of a stage and explicit notices always go through.
pub struct ThrottledProgress<'a> {
    inner: &'a (dyn Fn(&str, u64, u64, &str) + Send + Sync + 'a),
    last: Mutex<Instant>,
}

const EMIT_INTERVAL: Duration = Duration::from_millis(200);

impl<'a> ThrottledProgress<'a> {
    pub fn new(inner: &'a (dyn Fn(&str, u64, u64, &str) + Send + Sync + 'a)) -> Self {
        Self {
            inner,
            // Primed in the past so the first report is never dropped.
            last: Mutex::new(Instant::now() - EMIT_INTERVAL),
        }
    }

    pub fn report(&self, stage: &str, current: u64, total: u64, message: &str) {
        if current + 1 < total {
            let mut last = self.last.lock().unwrap();
            if last.elapsed() < EMIT_INTERVAL {
                return;
            }
            *last = Instant::now();
        }
        (self.inner)(stage, current, total, message);
    }

    /// One-off message (warnings and the like), bypassing the throttle.
    pub fn notice(&self, stage: &str, message: &str) {
        (self.inner)(stage, 0, 0, message);
    }
}

/// Run the full pipeline over all archives, returning the merged summary.
///
/// An archive that cannot be extracted contributes a single error and the
/// run continues with the next one. Per-file outcomes are accumulated in
/// the summary; the caller decides the exit status from `summary.errors`.
pub fn process(
    options: &ProcessOptions,
    progress_callback: &ProgressCallback,
) -> anyhow::Result<RunSummary> {
    let tp = ThrottledProgress::new(progress_callback);

    fs::create_dir_all(&options.output)?;

    let mut summary = RunSummary::default();
    let archive_total = options.zip_files.len() as u64;

    for (i, zip_path) in options.zip_files.iter().enumerate() {
        let zip_name = zip_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<archive>");
        tp.report("extract", i as u64, archive_total, zip_name);

        match extract::extract_archive(zip_path) {
            Ok(extracted) => {
                let files = extract::find_media_files(extracted.media_root());
                let batch =
                    organize::organize_batch(&files, &options.output, options.mtime_fallback, &tp);
                summary.merge(batch);
                // `extracted` drops here, removing the temp directory.
            }
            Err(err) => {
                summary
                    .errors
                    .push(format!("{}: {:#}", zip_path.display(), err));
            }
        }
    }

    report::write_report(&options.output, &summary)?;
    Ok(summary)
}

#[cfg(test)]
pub(crate) fn null_progress() -> Box<ProgressCallback> {
    Box::new(|_, _, _, _| {})
}
