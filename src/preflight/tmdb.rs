//! TMDB API preflight check.

use super::CheckResult;
use crate::models::config::TmdbConfig;
use crate::services::tmdb::TmdbClient;

/// Check if TMDB API is accessible with the configured key.
pub async fn check(config: &TmdbConfig) -> CheckResult {
    if config.api_key.trim().is_empty() {
        return CheckResult::fail(
            "TMDB API",
            "API key not configured",
            "Set [tmdb].api_key in the config file or the TMDB_API_KEY environment variable",
        );
    }

    match TmdbClient::new(config) {
        Ok(client) => match client.verify_api_key().await {
            Ok(true) => CheckResult::ok("TMDB API", "connected"),
            Ok(false) => CheckResult::fail(
                "TMDB API",
                "invalid API key or unreachable",
                "Check [tmdb].api_key (or TMDB_API_KEY) and your network connection",
            ),
            Err(_) => CheckResult::fail(
                "TMDB API",
                "connection failed",
                "Check your network connection",
            ),
        },
        Err(e) => CheckResult::fail("TMDB API", &e.to_string(), "Check the [tmdb] section"),
    }
}
