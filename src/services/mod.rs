//! External service clients and the seams the pipeline talks to them through.

pub mod ai;
pub mod task_store;
pub mod tmdb;

use crate::models::media::{MediaCandidate, MediaKind};
use crate::Result;
use futures::future::BoxFuture;

pub use task_store::{FileTaskStore, MemoryTaskStore, TaskSink};

/// Metadata search backend (TMDB in production).
pub trait MetadataSearch: Send + Sync {
    /// Ranked candidates for `query`; the first element is the best match.
    fn search<'a>(
        &'a self,
        kind: MediaKind,
        query: &'a str,
        year: Option<u16>,
    ) -> BoxFuture<'a, Result<Vec<MediaCandidate>>>;

    /// Full record for `id`, or `None` when it does not exist.
    fn detail<'a>(
        &'a self,
        kind: MediaKind,
        id: u64,
    ) -> BoxFuture<'a, Result<Option<serde_json::Value>>>;
}

/// Free-text completion backend used for AI classification hints.
pub trait AiService: Send + Sync {
    /// Raw response body for `prompt`.
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;
}
