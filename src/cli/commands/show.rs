//! Show command implementation.

use super::print_record;
use crate::models::config::AppConfig;
use crate::services::FileTaskStore;
use crate::{Error, Result};
use colored::Colorize;
use uuid::Uuid;

/// Print a stored task record, its mapping snapshot and its log.
pub fn show(config: &AppConfig, uuid: &str) -> Result<()> {
    let uuid = Uuid::parse_str(uuid.trim()).map_err(|_| Error::TaskNotFound(uuid.to_string()))?;
    let store = FileTaskStore::new(config.data_dir.clone());

    let record = store.read_record(uuid)?;
    print_record(&record);
    println!();

    match store.read_mapping(uuid)? {
        Some(mapping) => {
            println!("{} ({} entries)", "Mapping:".bold(), mapping.len());
            for entry in mapping.iter() {
                println!(
                    "  {} -> {}",
                    entry.source.display(),
                    entry.destination.display()
                );
            }
        }
        None => println!("{} none", "Mapping:".bold()),
    }
    println!();

    println!("{}", "Log:".bold());
    for line in store.read_log(uuid)? {
        println!("  {}", line);
    }

    Ok(())
}
