//! Input scanner module.
//!
//! Enumerates the files under a task's input path, skipping ignored
//! directories and extensions. Results are sorted so plans are deterministic.

use crate::models::config::ScanConfig;
use crate::utils::fs::{has_extension_in, is_ignored_dir, is_subtitle_file, is_video_file};
use crate::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files found under one input path.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// The scanned input path.
    pub root: PathBuf,
    /// Whether the input path is a directory.
    pub is_dir: bool,
    /// All kept files, sorted by path.
    pub files: Vec<PathBuf>,
}

impl ScanResult {
    /// Video files, sorted by path.
    pub fn videos(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter().filter(|p| is_video_file(p))
    }

    /// Subtitle files, sorted by path.
    pub fn subtitles(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter().filter(|p| is_subtitle_file(p))
    }

    /// Path of `file` relative to the input, `/`-separated.
    ///
    /// For a single-file input this is the file name.
    pub fn relative(&self, file: &Path) -> String {
        let rel = if self.is_dir {
            file.strip_prefix(&self.root).unwrap_or(file)
        } else {
            file.file_name().map(Path::new).unwrap_or(file)
        };
        rel.to_string_lossy().replace('\\', "/")
    }

    /// Relative paths of every video file.
    pub fn video_entries(&self) -> Vec<String> {
        self.videos().map(|p| self.relative(p)).collect()
    }

    /// Relative paths of every directory that holds a kept file.
    pub fn folder_names(&self) -> Vec<String> {
        if !self.is_dir {
            return Vec::new();
        }
        let mut folders: Vec<String> = self
            .files
            .iter()
            .filter_map(|p| p.parent())
            .filter(|p| *p != self.root)
            .map(|p| self.relative(p))
            .collect();
        folders.sort();
        folders.dedup();
        folders
    }
}

/// Scan a file or directory.
///
/// A file input yields itself unless its extension is ignored. A directory
/// is walked recursively; directories whose names match an ignore fragment
/// are pruned along with everything beneath them.
pub fn scan_path(path: &Path, scan: &ScanConfig) -> Result<ScanResult> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }

    let mut result = ScanResult {
        root: path.to_path_buf(),
        is_dir: path.is_dir(),
        files: Vec::new(),
    };

    if !result.is_dir {
        if !has_extension_in(path, &scan.ignore_extensions) {
            result.files.push(path.to_path_buf());
        }
        return Ok(result);
    }

    let walker = WalkDir::new(path)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !is_ignored_dir(&e.file_name().to_string_lossy(), &scan.ignore_dirs)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if has_extension_in(entry.path(), &scan.ignore_extensions) {
            tracing::debug!("Ignored by extension: {}", entry.path().display());
            continue;
        }
        result.files.push(entry.into_path());
    }

    result.files.sort();

    tracing::debug!(
        "Scanned {}: {} files, {} videos",
        path.display(),
        result.files.len(),
        result.videos().count()
    );

    Ok(result)
}

/// Number of direct entries of a directory, or 1 for a file.
pub fn direct_entry_count(path: &Path) -> usize {
    if !path.is_dir() {
        return 1;
    }
    std::fs::read_dir(path)
        .map(|entries| entries.filter_map(|e| e.ok()).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_prunes_ignored_dirs_and_extensions() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Show");
        fs::create_dir_all(root.join("Scans")).unwrap();
        fs::create_dir_all(root.join("Season 2")).unwrap();
        fs::write(root.join("b.mkv"), "v").unwrap();
        fs::write(root.join("a.mkv"), "v").unwrap();
        fs::write(root.join("a.ass"), "s").unwrap();
        fs::write(root.join("cover.jpg"), "i").unwrap();
        fs::write(root.join("Scans").join("x.mkv"), "v").unwrap();
        fs::write(root.join("Season 2").join("c.mkv"), "v").unwrap();

        let result = scan_path(&root, &ScanConfig::default()).unwrap();

        assert!(result.is_dir);
        assert_eq!(
            result.video_entries(),
            vec!["Season 2/c.mkv", "a.mkv", "b.mkv"]
        );
        assert_eq!(result.subtitles().count(), 1);
        assert_eq!(result.folder_names(), vec!["Season 2"]);
    }

    #[test]
    fn test_scan_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Movie.Name.2020.mkv");
        fs::write(&file, "v").unwrap();

        let result = scan_path(&file, &ScanConfig::default()).unwrap();

        assert!(!result.is_dir);
        assert_eq!(result.files, vec![file.clone()]);
        assert_eq!(result.relative(&file), "Movie.Name.2020.mkv");
        assert!(result.folder_names().is_empty());
    }

    #[test]
    fn test_scan_missing_path() {
        let temp = TempDir::new().unwrap();
        let result = scan_path(&temp.path().join("missing"), &ScanConfig::default());
        assert!(matches!(result, Err(crate::Error::PathNotFound(_))));
    }

    #[test]
    fn test_direct_entry_count() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.mkv"), "v").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub").join("b.mkv"), "v").unwrap();

        assert_eq!(direct_entry_count(temp.path()), 2);
        assert_eq!(direct_entry_count(&temp.path().join("a.mkv")), 1);
    }
}
