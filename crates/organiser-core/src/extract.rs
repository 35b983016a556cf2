//! Archive extraction collaborator.
//!
//! Extracts one Takeout zip into a temporary directory and hands the core a
//! flat, sorted list of file paths. The temp directory is cleaned up when
//! [`ExtractedArchive`] drops, including on every error path.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::TempDir;
use zip::ZipArchive;

/// An extracted archive. Holds the temp dir alive until placement is done.
pub struct ExtractedArchive {
    temp: TempDir,
    media_root: PathBuf,
}

impl ExtractedArchive {
    /// Root to enumerate media under (Takeout nesting already resolved).
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }
}

/// Validate and extract a zip archive. Archive-level failures (missing
/// file, corrupt zip, extraction I/O) are a single fatal condition for
/// this archive.
pub fn extract_archive(zip_path: &Path) -> anyhow::Result<ExtractedArchive> {
    let file = File::open(zip_path)
        .with_context(|| format!("cannot open {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("not a valid zip file: {}", zip_path.display()))?;

    let temp = tempfile::Builder::new()
        .prefix("photo-organiser-")
        .tempdir()
        .context("cannot create temporary extraction directory")?;

    archive
        .extract(temp.path())
        .with_context(|| format!("failed to extract {}", zip_path.display()))?;

    let media_root = locate_takeout_root(temp.path());
    Ok(ExtractedArchive { temp, media_root })
}

/// Resolve the Takeout nesting: `Takeout/Google Photos/`, then a bare
/// `Google Photos/` (some exports skip the outer folder), then the
/// extraction root for non-standard archives.
fn locate_takeout_root(dir: &Path) -> PathBuf {
    let nested = dir.join("Takeout").join("Google Photos");
    if nested.is_dir() {
        return nested;
    }
    let flat = dir.join("Google Photos");
    if flat.is_dir() {
        return flat;
    }
    dir.to_path_buf()
}

/// Recursively enumerate all files under `root`, sorted for deterministic
/// batch order. Unreadable directories are skipped.
pub fn find_media_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk(root, &mut files);
    files.sort();
    files
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files);
        } else {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(dest: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(dest).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_locates_takeout_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let zip_path = dir.path().join("export.zip");
        build_zip(
            &zip_path,
            &[
                ("Takeout/Google Photos/2020/photo.jpg", b"jpeg"),
                ("Takeout/Google Photos/2020/photo.jpg.json", b"{}"),
            ],
        );

        let extracted = extract_archive(&zip_path).unwrap();
        assert!(extracted.media_root().ends_with("Takeout/Google Photos"));

        let files = find_media_files(extracted.media_root());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("2020/photo.jpg"));
        assert!(files[1].ends_with("2020/photo.jpg.json"));
    }

    #[test]
    fn test_extract_flat_structure_falls_back_to_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let zip_path = dir.path().join("flat.zip");
        build_zip(&zip_path, &[("photo.jpg", b"jpeg")]);

        let extracted = extract_archive(&zip_path).unwrap();
        assert_eq!(extracted.media_root(), extracted.temp_path());
        assert_eq!(find_media_files(extracted.media_root()).len(), 1);
    }

    #[test]
    fn test_temp_dir_cleaned_up_on_drop() {
        let dir = tempfile::TempDir::new().unwrap();
        let zip_path = dir.path().join("export.zip");
        build_zip(&zip_path, &[("photo.jpg", b"jpeg")]);

        let extracted = extract_archive(&zip_path).unwrap();
        let temp_path = extracted.temp_path().to_path_buf();
        assert!(temp_path.exists());
        drop(extracted);
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let bogus = dir.path().join("bogus.zip");
        fs::write(&bogus, b"this is not a zip archive").unwrap();
        assert!(extract_archive(&bogus).is_err());
        assert!(extract_archive(&dir.path().join("missing.zip")).is_err());
    }

    #[test]
    fn test_file_order_is_sorted() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/z.jpg"), b"z").unwrap();
        fs::write(dir.path().join("a.jpg"), b"a").unwrap();

        let files = find_media_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.jpg"));
        assert!(files[1].ends_with("b/z.jpg"));
    }
}
