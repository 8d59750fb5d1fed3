//! TV-versus-movie decision.
//!
//! Searches both kinds and combines the hits with name and layout signals
//! into a signed score. This is a best-effort heuristic; callers can always
//! force the outcome with an explicit `is_movie` override.

use crate::core::extractor::extract_season;
use crate::models::media::{ClassificationDecision, MediaKind, TypeOverrides};
use crate::services::MetadataSearch;
use crate::Result;

const TV_HIT_WEIGHT: f64 = 1.0;
const MOVIE_HIT_WEIGHT: f64 = 1.0;
const SEASON_TOKEN_WEIGHT: f64 = 0.6;
const LAYOUT_WEIGHT: f64 = 0.5;
const FILE_COUNT_WEIGHT: f64 = 0.4;
const FILE_COUNT_THRESHOLD: usize = 6;
const OVERRIDE_WEIGHT: f64 = 1.0;

/// Signals that feed the score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputs {
    pub tv_found: bool,
    pub movie_found: bool,
    pub has_season_token: bool,
    pub path_is_file: bool,
    pub file_count: usize,
    pub is_movie: Option<bool>,
}

/// Signed score; positive means TV.
pub fn compute_score(inputs: &ScoreInputs) -> f64 {
    let mut score = 0.0;
    if inputs.tv_found {
        score += TV_HIT_WEIGHT;
    }
    if inputs.movie_found {
        score -= MOVIE_HIT_WEIGHT;
    }
    score += if inputs.has_season_token {
        SEASON_TOKEN_WEIGHT
    } else {
        -SEASON_TOKEN_WEIGHT
    };
    score += if inputs.path_is_file {
        -LAYOUT_WEIGHT
    } else {
        LAYOUT_WEIGHT
    };
    score += if inputs.file_count > FILE_COUNT_THRESHOLD {
        FILE_COUNT_WEIGHT
    } else {
        -FILE_COUNT_WEIGHT
    };
    match inputs.is_movie {
        Some(false) => score += OVERRIDE_WEIGHT,
        Some(true) => score -= OVERRIDE_WEIGHT,
        None => {}
    }
    score
}

/// Ties resolve to movie.
pub fn kind_for_score(score: f64) -> MediaKind {
    if score > 0.0 {
        MediaKind::Tv
    } else {
        MediaKind::Movie
    }
}

/// Search both kinds for `base_name` and decide which one the input is.
///
/// Search transport errors propagate; an empty result list is simply "not found".
pub async fn decide_type(
    search: &dyn MetadataSearch,
    base_name: &str,
    year: Option<u16>,
    overrides: TypeOverrides,
    path_is_file: bool,
    file_count: usize,
) -> Result<ClassificationDecision> {
    let (tv, movie) = tokio::join!(
        search.search(MediaKind::Tv, base_name, year),
        search.search(MediaKind::Movie, base_name, year)
    );
    let tv_candidate = tv?.into_iter().next();
    let movie_candidate = movie?.into_iter().next();
    let season_from_name = extract_season(base_name);

    let score = compute_score(&ScoreInputs {
        tv_found: tv_candidate.is_some(),
        movie_found: movie_candidate.is_some(),
        // a parsed season of zero does not count as a season token
        has_season_token: season_from_name.is_some_and(|s| s > 0),
        path_is_file,
        file_count,
        is_movie: overrides.is_movie,
    });
    let kind = kind_for_score(score);

    tracing::debug!(
        "Decided {} for {:?} (score {:.1}, tv hit: {}, movie hit: {})",
        kind,
        base_name,
        score,
        tv_candidate.is_some(),
        movie_candidate.is_some()
    );

    Ok(ClassificationDecision {
        kind,
        tv_candidate,
        movie_candidate,
        season_from_name,
        score,
    })
}
