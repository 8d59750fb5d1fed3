//! Library root preflight check.

use super::CheckResult;
use crate::models::config::LibraryConfig;

/// One result per library root. Unset roots are skipped since they only
/// fail the tasks routed to them, but at least one root must be set.
pub fn check(library: &LibraryConfig) -> Vec<CheckResult> {
    let roots = [
        ("TV library", &library.tv_path),
        ("Anime library", &library.anime_path),
        ("Movie library", &library.movie_path),
        ("Anime movie library", &library.anime_movie_path),
    ];

    if roots.iter().all(|(_, path)| path.as_os_str().is_empty()) {
        return vec![CheckResult::fail(
            "Library",
            "no library roots configured",
            "Set tv_path, anime_path, movie_path or anime_movie_path under [library]",
        )];
    }

    roots
        .iter()
        .map(|(name, path)| {
            if path.as_os_str().is_empty() {
                CheckResult::skipped(name, "not configured")
            } else if path.is_dir() {
                CheckResult::ok(name, &path.display().to_string())
            } else {
                CheckResult::fail(
                    name,
                    &format!("{} is not a directory", path.display()),
                    "Create the directory or fix the [library] section",
                )
            }
        })
        .collect()
}
