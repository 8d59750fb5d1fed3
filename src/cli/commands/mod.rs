//! CLI command implementations.

pub mod batch;
pub mod check;
pub mod lookup;
pub mod process;
pub mod show;

use crate::core::Pipeline;
use crate::models::config::AppConfig;
use crate::models::task::TaskRecord;
use crate::services::ai::AiClient;
use crate::services::tmdb::TmdbClient;
use crate::services::FileTaskStore;
use crate::Result;
use colored::Colorize;
use std::sync::Arc;

/// Pipeline wired to TMDB, the file task store and, when usable, the AI provider.
pub fn build_pipeline(config: Arc<AppConfig>) -> Result<Pipeline> {
    let metadata = Arc::new(TmdbClient::new(&config.tmdb)?);
    let store = Arc::new(FileTaskStore::new(config.data_dir.clone()));
    let mut pipeline = Pipeline::new(config.clone(), metadata, store);
    if config.ai.is_usable() {
        let client = AiClient::new(&config.ai)?;
        tracing::debug!("AI passes enabled: {} ({})", client.provider(), client.model());
        pipeline = pipeline.with_ai(Arc::new(client));
    }
    Ok(pipeline)
}

/// Print the fields of a task record.
pub fn print_record(record: &TaskRecord) {
    let status = if record.is_failed() {
        "[FAILED]".bold().red()
    } else {
        "[OK]".bold().green()
    };
    println!("{} {}", status, record.uuid);
    println!("  {} {}", "Path:".bold(), record.path);
    println!("  {} {}", "Created:".bold(), record.created_at);
    if let Some(ref name) = record.name {
        println!("  {} {}", "Name:".bold(), name);
    }
    if let (Some(kind), Some(id)) = (record.tmdb_type, record.tmdb_id) {
        println!("  {} {} #{}", "TMDB:".bold(), kind, id);
    }
    if let Some(season) = record.season_id {
        println!("  {} {}", "Season:".bold(), season);
    }
    if let Some(is_anime) = record.is_anime {
        println!("  {} {}", "Anime:".bold(), is_anime);
    }
    println!("  {} {}", "AI:".bold(), record.use_ai);
    if let Some(ref error) = record.error {
        println!("  {} {}", "Error:".bold(), error.red());
    }
}
