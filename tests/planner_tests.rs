//! Integration tests for transfer planning.
//!
//! Tests cover:
//! - Movie naming for single-file inputs
//! - Series layout with extras and subtitles
//! - Ignored directories and extensions
//! - Destination collisions and AI overrides

use media_renamer::core::planner::{plan_transfers, PlanTarget, SkipReason};
use media_renamer::models::config::ScanConfig;
use media_renamer::models::media::AiEpisodeItem;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "fake").unwrap();
}

fn series_target(root: &Path) -> PlanTarget<'_> {
    PlanTarget {
        target_root: root,
        display_name: "Show Name",
        default_season: 1,
        is_movie: false,
    }
}

#[test]
fn test_movie_single_file() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("downloads/Movie.Name.2020.mkv");
    touch(&input);
    let root = temp.path().join("lib/Movie Name (2020)");

    let outcome = plan_transfers(
        &input,
        PlanTarget {
            target_root: &root,
            display_name: "Movie Name",
            default_season: 0,
            is_movie: true,
        },
        None,
        &ScanConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.mapping.len(), 1);
    assert_eq!(
        outcome.mapping.get(&input),
        Some(root.join("Movie Name - Movie.Name.2020.mkv").as_path())
    );
    assert!(outcome.skipped.is_empty());
}

#[test]
fn test_movie_directory_keeps_subtitles() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("Movie Name");
    touch(&input.join("Movie.Name.2020.mkv"));
    touch(&input.join("Movie.Name.2020.chs.srt"));
    let root = temp.path().join("lib/Movie Name (2020)");

    let outcome = plan_transfers(
        &input,
        PlanTarget {
            target_root: &root,
            display_name: "Movie Name",
            default_season: 0,
            is_movie: true,
        },
        None,
        &ScanConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.mapping.len(), 2);
    assert_eq!(
        outcome.mapping.get(&input.join("Movie.Name.2020.chs.srt")),
        Some(root.join("Movie Name - Movie.Name.2020.chs.srt").as_path())
    );
}

#[test]
fn test_series_layout_with_extras_and_subtitles() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("Show Name");
    touch(&input.join("S01E01.mkv"));
    touch(&input.join("S01E01.ass"));
    touch(&input.join("S01E02.mp4"));
    touch(&input.join("NCOP1.mkv"));
    touch(&input.join("cover.jpg"));
    let root = temp.path().join("lib/Show Name (2020)");

    let outcome =
        plan_transfers(&input, series_target(&root), None, &ScanConfig::default()).unwrap();

    let expected: Vec<(PathBuf, PathBuf)> = vec![
        (input.join("NCOP1.mkv"), root.join("extra/S01E01.mkv")),
        (input.join("S01E01.mkv"), root.join("Season1/S01E01.mkv")),
        (input.join("S01E01.ass"), root.join("Season1/S01E01.ass")),
        (input.join("S01E02.mp4"), root.join("Season1/S01E02.mp4")),
    ];
    for (source, destination) in &expected {
        assert_eq!(
            outcome.mapping.get(source),
            Some(destination.as_path()),
            "{}",
            source.display()
        );
    }
    assert_eq!(outcome.mapping.len(), expected.len());
}

#[test]
fn test_video_without_episode_is_skipped() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("Show Name");
    touch(&input.join("S01E01.mkv"));
    touch(&input.join("NCOP.mkv"));
    let root = temp.path().join("lib/Show Name (2020)");

    let outcome =
        plan_transfers(&input, series_target(&root), None, &ScanConfig::default()).unwrap();

    assert_eq!(outcome.mapping.len(), 1);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].path, input.join("NCOP.mkv"));
    assert_eq!(outcome.skipped[0].reason, SkipReason::MissingEpisode);
}

#[test]
fn test_ignored_directories_are_pruned() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("Show Name");
    touch(&input.join("S01E01.mkv"));
    touch(&input.join("Scans/S01E02.mkv"));
    touch(&input.join("CD1/S01E03.mkv"));
    let root = temp.path().join("lib/Show Name (2020)");

    let outcome =
        plan_transfers(&input, series_target(&root), None, &ScanConfig::default()).unwrap();

    assert_eq!(outcome.mapping.len(), 1);
    assert!(outcome.mapping.get(&input.join("S01E01.mkv")).is_some());
}

#[test]
fn test_season_from_parent_folder() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("Show Name");
    touch(&input.join("Season 2/Show Name - 03.mkv"));
    let root = temp.path().join("lib/Show Name (2020)");

    let outcome =
        plan_transfers(&input, series_target(&root), None, &ScanConfig::default()).unwrap();

    assert_eq!(
        outcome.mapping.get(&input.join("Season 2/Show Name - 03.mkv")),
        Some(root.join("Season2/S02E03.mkv").as_path())
    );
}

#[test]
fn test_destination_collision_skips_later_video() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("Show Name");
    touch(&input.join("A/S01E01.mkv"));
    touch(&input.join("B/S01E01.mkv"));
    touch(&input.join("B/S01E01.ass"));
    let root = temp.path().join("lib/Show Name (2020)");

    let outcome =
        plan_transfers(&input, series_target(&root), None, &ScanConfig::default()).unwrap();

    assert_eq!(outcome.mapping.len(), 1);
    assert!(outcome.mapping.get(&input.join("A/S01E01.mkv")).is_some());
    assert!(outcome.mapping.get(&input.join("B/S01E01.ass")).is_none());
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(
        outcome.skipped[0].reason,
        SkipReason::DestinationTaken(root.join("Season1/S01E01.mkv"))
    );
}

#[test]
fn test_ai_overrides_take_precedence() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("Show Name");
    touch(&input.join("Disc/Track 7.mkv"));
    touch(&input.join("S01E02.mkv"));
    let root = temp.path().join("lib/Show Name (2020)");

    let mut ai = HashMap::new();
    ai.insert(
        "Disc/Track 7.mkv".to_string(),
        AiEpisodeItem {
            file: "Disc/Track 7.mkv".to_string(),
            season: 2,
            episode: 5,
            extra: false,
        },
    );

    let outcome = plan_transfers(
        &input,
        series_target(&root),
        Some(&ai),
        &ScanConfig::default(),
    )
    .unwrap();

    assert_eq!(
        outcome.mapping.get(&input.join("Disc/Track 7.mkv")),
        Some(root.join("Season2/S02E05.mkv").as_path())
    );
    // files the AI did not mention fall back to the name
    assert_eq!(
        outcome.mapping.get(&input.join("S01E02.mkv")),
        Some(root.join("Season1/S01E02.mkv").as_path())
    );
}

#[test]
fn test_missing_input_is_error() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("lib");
    let result = plan_transfers(
        &temp.path().join("missing"),
        series_target(&root),
        None,
        &ScanConfig::default(),
    );
    assert!(result.is_err());
}
