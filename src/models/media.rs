//! Media-related data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// TMDB genre id for animation.
pub const ANIMATION_GENRE_ID: u64 = 16;

/// Media kind enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Tv,
    Movie,
}

impl MediaKind {
    /// Path segment used by the TMDB API.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Tv => "tv",
            MediaKind::Movie => "movie",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tv" | "tvshow" | "series" => Ok(MediaKind::Tv),
            "movie" | "film" => Ok(MediaKind::Movie),
            other => Err(format!("unknown media kind: {}", other)),
        }
    }
}

/// A metadata search result not yet confirmed as the chosen match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaCandidate {
    /// TMDB ID.
    pub id: u64,
    /// Localized name (TV) or title (movie).
    pub display_name: String,
    /// First air date (TV) or release date (movie).
    pub original_air_date: Option<NaiveDate>,
    /// TMDB genre ids.
    pub genre_ids: BTreeSet<u64>,
}

impl MediaCandidate {
    /// Whether the candidate carries the animation genre.
    pub fn is_animation(&self) -> bool {
        self.genre_ids.contains(&ANIMATION_GENRE_ID)
    }

    /// Year of the air/release date, if known.
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.original_air_date.map(|d| d.year())
    }
}

/// Caller intent that can override automatic classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOverrides {
    pub is_anime: Option<bool>,
    pub is_movie: Option<bool>,
}

/// Outcome of the type decider for one task.
#[derive(Debug, Clone)]
pub struct ClassificationDecision {
    pub kind: MediaKind,
    pub tv_candidate: Option<MediaCandidate>,
    pub movie_candidate: Option<MediaCandidate>,
    pub season_from_name: Option<u32>,
    /// Final heuristic score (positive means TV).
    pub score: f64,
}

impl ClassificationDecision {
    /// Candidate for the decided kind.
    pub fn chosen(&self) -> Option<&MediaCandidate> {
        match self.kind {
            MediaKind::Tv => self.tv_candidate.as_ref(),
            MediaKind::Movie => self.movie_candidate.as_ref(),
        }
    }
}

/// One AI-proposed per-file classification.
///
/// Produced from untrusted free text; only items with finite,
/// non-negative integral season and episode survive parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiEpisodeItem {
    /// Path relative to the task input, `/`-separated.
    pub file: String,
    pub season: u32,
    pub episode: u32,
    pub extra: bool,
}
