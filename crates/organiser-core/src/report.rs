//! Plain-text processing report written under the output root.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::organize::RunSummary;

pub const REPORT_FILENAME: &str = "processing_report.txt";

/// Write `processing_report.txt` and return its path.
pub fn write_report(output_dir: &Path, summary: &RunSummary) -> anyhow::Result<PathBuf> {
    let path = output_dir.join(REPORT_FILENAME);
    let body = render_report(summary);
    fs::write(&path, body)
        .with_context(|| format!("cannot write report to {}", path.display()))?;
    Ok(path)
}

fn render_report(summary: &RunSummary) -> String {
    let mut out = String::new();
    let rule = "-".repeat(60);

    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "Photo Organiser - Processing Report");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out);

    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Total files found:      {}", summary.files_processed);
    let _ = writeln!(out, "  Photos/videos:        {}", summary.files_organized);
    let _ = writeln!(
        out,
        "  Metadata files:       {} (skipped)",
        summary.sidecar_skipped
    );
    let _ = writeln!(
        out,
        "  Unrecognized:         {} (skipped)",
        summary.unrecognized_skipped
    );
    let _ = writeln!(out, "Errors encountered:     {}", summary.errors.len());
    let _ = writeln!(out);

    if !summary.by_year.is_empty() {
        let _ = writeln!(out, "Files Organized by Year");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{:<10} {:<10} {:<10} {:<10}", "Year", "Photos", "Videos", "Total");
        // BTreeMap ordering puts the unknown bucket last.
        for (year, counts) in &summary.by_year {
            let _ = writeln!(
                out,
                "{:<10} {:<10} {:<10} {:<10}",
                year.to_string(),
                counts.photos,
                counts.videos,
                counts.total()
            );
        }
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "{:<10} {:<10} {:<10} {:<10}",
            "TOTAL",
            summary.total_photos(),
            summary.total_videos(),
            summary.files_organized
        );
        let _ = writeln!(out);
    }

    if !summary.errors.is_empty() {
        let _ = writeln!(out, "Errors");
        let _ = writeln!(out, "{}", rule);
        for (i, error) in summary.errors.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, error);
        }
        let _ = writeln!(out);
    }

    out
}
