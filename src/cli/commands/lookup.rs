//! Lookup command implementation.

use crate::models::config::AppConfig;
use crate::models::media::MediaKind;
use crate::services::tmdb::TmdbClient;
use crate::services::MetadataSearch;
use crate::{Error, Result};
use colored::Colorize;

/// Print the TMDB record for `kind`/`id` as JSON.
pub async fn lookup(config: &AppConfig, kind: MediaKind, id: u64) -> Result<()> {
    if config.tmdb.api_key.trim().is_empty() {
        return Err(Error::TmdbApiKeyMissing);
    }
    let client = TmdbClient::new(&config.tmdb)?;

    match client.detail(kind, id).await? {
        Some(detail) => {
            println!("{}", serde_json::to_string_pretty(&detail)?);
            Ok(())
        }
        None => {
            println!("{} {} #{} not found", "[NOT FOUND]".yellow(), kind, id);
            Err(Error::NoMetadataMatch(kind))
        }
    }
}
