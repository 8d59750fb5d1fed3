//! Error types for the media renamer.

use crate::models::media::MediaKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media renamer.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("TMDB API key not configured. Set [tmdb].api_key or TMDB_API_KEY")]
    TmdbApiKeyMissing,

    #[error("Library path for {0} is not configured")]
    LibraryPathMissing(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // Input errors
    #[error("Input path is empty")]
    EmptyPath,

    #[error("Path not found: {0}")]
    PathNotFound(String),

    // Classification errors
    #[error("no metadata match found ({0})")]
    NoMetadataMatch(MediaKind),

    #[error("no processable video files")]
    NoProcessableVideos,

    // Transfer errors
    #[error("Transfer failed {from:?} -> {to:?}: {source}")]
    Transfer {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // AI errors
    #[error("AI request failed: {0}")]
    AiRequest(String),

    // Task store errors
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // TOML errors
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
