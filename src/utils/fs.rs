//! File system utilities.

use std::io;
use std::path::Path;

/// Video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "m4v", "ts", "m2ts", "wmv", "flv", "webm", "mpg", "mpeg", "rm",
    "rmvb",
];

/// Subtitle file extensions.
const SUBTITLE_EXTENSIONS: &[&str] = &["ass", "ssa", "srt", "vtt", "sub", "idx", "sup", "smi"];

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check if a file is a video file based on extension.
pub fn is_video_file(path: &Path) -> bool {
    get_extension(path)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check if a file is a subtitle file based on extension.
pub fn is_subtitle_file(path: &Path) -> bool {
    get_extension(path)
        .map(|ext| SUBTITLE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check if a file's extension is in the given ignore list.
pub fn has_extension_in(path: &Path, extensions: &[String]) -> bool {
    get_extension(path)
        .map(|ext| {
            extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// Check if a directory name contains any of the ignore fragments (case insensitive).
pub fn is_ignored_dir(name: &str, fragments: &[String]) -> bool {
    let lower = name.to_lowercase();
    fragments
        .iter()
        .filter(|f| !f.is_empty())
        .any(|f| lower.contains(&f.to_lowercase()))
}

/// Replace characters that are invalid in file names on common filesystems.
pub fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Filesystem primitives used by the transfer executor.
pub trait FileOps: Send + Sync {
    /// Whether anything (including a dangling symlink) occupies `path`.
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;
    fn hard_link(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn symlink(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Whether `path` itself is a symbolic link.
    fn is_symlink(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Whether both paths resolve to the same file on disk.
    fn same_file(&self, a: &Path, b: &Path) -> bool {
        same_file_on_disk(a, b)
    }
}

#[cfg(unix)]
fn same_file_on_disk(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file_on_disk(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileOps for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn hard_link(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::hard_link(from, to)
    }

    #[cfg(unix)]
    fn symlink(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(from, to)
    }

    #[cfg(windows)]
    fn symlink(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::os::windows::fs::symlink_file(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(&PathBuf::from("movie.mkv")));
        assert!(is_video_file(&PathBuf::from("movie.MP4")));
        assert!(is_video_file(&PathBuf::from("episode.rmvb")));
        assert!(!is_video_file(&PathBuf::from("movie.txt")));
        assert!(!is_video_file(&PathBuf::from("movie.ass")));
    }

    #[test]
    fn test_is_subtitle_file() {
        assert!(is_subtitle_file(&PathBuf::from("S01E01.sc.ass")));
        assert!(is_subtitle_file(&PathBuf::from("movie.SRT")));
        assert!(!is_subtitle_file(&PathBuf::from("movie.mkv")));
    }

    #[test]
    fn test_ignore_filters() {
        let exts = vec!["rar".to_string(), ".jpg".to_string()];
        assert!(has_extension_in(Path::new("cover.JPG"), &exts));
        assert!(has_extension_in(Path::new("pack.rar"), &exts));
        assert!(!has_extension_in(Path::new("ep.mkv"), &exts));

        let dirs = vec!["cd".to_string(), "scan".to_string()];
        assert!(is_ignored_dir("Scans", &dirs));
        assert!(is_ignored_dir("CDs", &dirs));
        assert!(!is_ignored_dir("Season 1", &dirs));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Fate/Zero"), "Fate_Zero");
        assert_eq!(sanitize_filename("Re:Zero"), "Re_Zero");
        assert_eq!(sanitize_filename("进击的巨人"), "进击的巨人");
    }

    #[cfg(unix)]
    #[test]
    fn test_same_file_sees_links() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("a.mkv");
        std::fs::write(&source, "x").unwrap();
        let hard = temp.path().join("hard.mkv");
        std::fs::hard_link(&source, &hard).unwrap();
        let soft = temp.path().join("soft.mkv");
        std::os::unix::fs::symlink(&source, &soft).unwrap();
        let other = temp.path().join("other.mkv");
        std::fs::write(&other, "x").unwrap();

        assert!(LocalFs.same_file(&source, &hard));
        assert!(LocalFs.same_file(&source, &soft));
        assert!(!LocalFs.same_file(&source, &other));
        assert!(!LocalFs.same_file(&source, &temp.path().join("missing.mkv")));
        assert!(LocalFs.is_symlink(&soft));
        assert!(!LocalFs.is_symlink(&hard));
    }
}
