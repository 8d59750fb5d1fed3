//! Batch command implementation.

use super::build_pipeline;
use crate::core::TaskDispatcher;
use crate::models::config::AppConfig;
use crate::models::media::TypeOverrides;
use crate::models::task::{TaskRecord, TaskRequest};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

/// Submit every path to the dispatcher and wait for all records.
pub async fn batch(
    config: Arc<AppConfig>,
    paths: &[String],
    overrides: TypeOverrides,
    workers: Option<usize>,
) -> Result<Vec<TaskRecord>> {
    let workers = workers.unwrap_or(config.workers).max(1);
    println!(
        "{} {} paths, {} workers",
        "[BATCH]".bold().cyan(),
        paths.len(),
        workers
    );
    println!();

    let pipeline = Arc::new(build_pipeline(config)?);
    let (dispatcher, mut finished) = TaskDispatcher::spawn(pipeline, workers);

    for path in paths {
        let uuid = dispatcher.submit(TaskRequest::new(path.as_str(), overrides))?;
        tracing::debug!("Queued {} as {}", path, uuid);
    }

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut records = Vec::with_capacity(paths.len());
    while records.len() < paths.len() {
        let Some(record) = finished.recv().await else {
            break;
        };
        pb.set_message(record.name.clone().unwrap_or_else(|| record.path.clone()));
        pb.inc(1);
        records.push(record);
    }
    pb.finish_and_clear();
    dispatcher.shutdown().await;

    let failed = records.iter().filter(|r| r.is_failed()).count();
    for record in &records {
        match &record.error {
            None => println!(
                "{} {} -> {}",
                "[OK]".green(),
                record.path,
                record.name.as_deref().unwrap_or("?")
            ),
            Some(error) => println!("{} {}: {}", "[FAIL]".red(), record.path, error),
        }
    }
    println!();
    println!(
        "{} {} succeeded, {} failed",
        "[DONE]".bold().green(),
        records.len() - failed,
        failed
    );

    Ok(records)
}
