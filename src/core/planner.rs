//! Transfer planner module.
//!
//! Turns a scanned input into a source -> destination mapping under the
//! library target root:
//! - movies: `<root>/<name> - <original stem><ext>`
//! - episodes: `<root>/Season<N>/SxxEyy<ext>`, bonus content under `<root>/extra/`
//! - subtitles next to a mapped video follow it with their own suffix

use crate::core::extractor::{
    extract_episode, extract_season, has_extra_tag, has_season0_tag, pad_number,
};
use crate::core::scanner::{scan_path, ScanResult};
use crate::models::config::ScanConfig;
use crate::models::media::AiEpisodeItem;
use crate::models::task::TransferMapping;
use crate::Result;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Highest episode number accepted for naming.
pub const MAX_EPISODE: u32 = 999;

/// Where and how a task's videos are laid out.
#[derive(Debug, Clone, Copy)]
pub struct PlanTarget<'a> {
    /// `<library root>/<name> (<year>)`.
    pub target_root: &'a Path,
    /// Name used as the movie file prefix.
    pub display_name: &'a str,
    /// Season used when neither the AI nor the name supplies one.
    pub default_season: u32,
    pub is_movie: bool,
}

/// Why a video was left out of the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingEpisode,
    InvalidEpisode(u32),
    DestinationTaken(PathBuf),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingEpisode => write!(f, "no episode number"),
            SkipReason::InvalidEpisode(ep) => {
                write!(f, "episode {} outside 1-{}", ep, MAX_EPISODE)
            }
            SkipReason::DestinationTaken(dest) => {
                write!(f, "destination {} already planned", dest.display())
            }
        }
    }
}

/// A video that produced no mapping entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Planned mapping plus the videos that were skipped.
#[derive(Debug, Default)]
pub struct PlanOutcome {
    pub mapping: TransferMapping,
    pub skipped: Vec<SkippedFile>,
}

/// Scan `base_path` and plan its transfers.
pub fn plan_transfers(
    base_path: &Path,
    target: PlanTarget<'_>,
    ai_overrides: Option<&HashMap<String, AiEpisodeItem>>,
    scan: &ScanConfig,
) -> Result<PlanOutcome> {
    let scanned = scan_path(base_path, scan)?;
    Ok(plan_scanned(&scanned, target, ai_overrides))
}

/// Plan transfers for an already scanned input.
pub fn plan_scanned(
    scanned: &ScanResult,
    target: PlanTarget<'_>,
    ai_overrides: Option<&HashMap<String, AiEpisodeItem>>,
) -> PlanOutcome {
    let subtitles: Vec<&PathBuf> = scanned.subtitles().collect();
    let mut outcome = PlanOutcome::default();

    for video in scanned.videos() {
        let rel = scanned.relative(video);
        let ai_item = ai_overrides.and_then(|m| m.get(&rel));

        let target_base = if target.is_movie {
            Ok(movie_target_base(video, target))
        } else {
            episode_target_base(video, target, ai_item)
        };

        let target_base = match target_base {
            Ok(base) => base,
            Err(reason) => {
                tracing::debug!("Skipping {}: {}", video.display(), reason);
                outcome.skipped.push(SkippedFile {
                    path: video.clone(),
                    reason,
                });
                continue;
            }
        };

        let destination = with_suffix(&target_base, &extension_suffix(video));
        if outcome.mapping.contains_destination(&destination) {
            let reason = SkipReason::DestinationTaken(destination);
            tracing::debug!("Skipping {}: {}", video.display(), reason);
            outcome.skipped.push(SkippedFile {
                path: video.clone(),
                reason,
            });
            continue;
        }

        tracing::debug!("Plan {} -> {}", video.display(), destination.display());
        outcome.mapping.insert(video.clone(), destination);
        attach_subtitles(video, &target_base, &subtitles, &mut outcome.mapping);
    }

    outcome
}

fn movie_target_base(video: &Path, target: PlanTarget<'_>) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    target
        .target_root
        .join(format!("{} - {}", target.display_name, stem))
}

fn episode_target_base(
    video: &Path,
    target: PlanTarget<'_>,
    ai_item: Option<&AiEpisodeItem>,
) -> std::result::Result<PathBuf, SkipReason> {
    let file_name = video
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let (extra, season0) = match ai_item {
        Some(item) => (item.extra, item.season == 0),
        None => (has_extra_tag(&file_name), has_season0_tag(&file_name)),
    };

    let season = if season0 {
        0
    } else if let Some(item) = ai_item {
        item.season
    } else {
        extract_season(&file_name)
            .or_else(|| parent_name(video).and_then(|p| extract_season(&p)))
            .unwrap_or(target.default_season)
    };

    let episode = ai_item
        .map(|item| item.episode)
        .or_else(|| extract_episode(&stem))
        .ok_or(SkipReason::MissingEpisode)?;
    if episode == 0 || episode > MAX_EPISODE {
        return Err(SkipReason::InvalidEpisode(episode));
    }

    let folder = if extra {
        target.target_root.join("extra")
    } else {
        target.target_root.join(format!("Season{}", season))
    };
    Ok(folder.join(format!("S{}E{}", pad_number(season), pad_number(episode))))
}

fn parent_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
}

/// `.ext` of a file, or empty.
fn extension_suffix(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Append `suffix` to the last component of `base` without treating dots specially.
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut raw = base.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Map every subtitle in the video's directory named `<video stem>.<anything>`
/// (case-insensitive) to `<target base>.<anything>`.
fn attach_subtitles(
    video: &Path,
    target_base: &Path,
    subtitles: &[&PathBuf],
    mapping: &mut TransferMapping,
) {
    let Some(stem) = video.file_stem().map(|s| s.to_string_lossy().to_string()) else {
        return;
    };
    let prefix = format!("{}.", stem.to_lowercase());

    for subtitle in subtitles
        .iter()
        .filter(|s| s.parent() == video.parent())
    {
        let Some(name) = subtitle.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if !name.to_lowercase().starts_with(&prefix) || !name.is_char_boundary(stem.len()) {
            continue;
        }
        let destination = with_suffix(target_base, &name[stem.len()..]);
        tracing::debug!("Attach subtitle {} -> {}", subtitle.display(), destination.display());
        mapping.insert((*subtitle).clone(), destination);
    }
}
