//! Process command implementation.

use super::{build_pipeline, print_record};
use crate::models::config::AppConfig;
use crate::models::media::TypeOverrides;
use crate::models::task::{TaskRecord, TaskRequest};
use crate::Result;
use colored::Colorize;
use std::sync::Arc;
use uuid::Uuid;

/// Run one task in the foreground and print its record.
pub async fn process(
    config: Arc<AppConfig>,
    path: &str,
    overrides: TypeOverrides,
) -> Result<TaskRecord> {
    println!("{} {}", "[PROCESS]".bold().cyan(), path);
    println!();

    let pipeline = build_pipeline(config.clone())?;
    let record = pipeline
        .run(Uuid::new_v4(), TaskRequest::new(path, overrides))
        .await;

    print_record(&record);
    println!();
    println!(
        "Log: media-renamer show {}  (data dir: {})",
        record.uuid,
        config.data_dir.display()
    );

    Ok(record)
}
