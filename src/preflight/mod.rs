//! Environment checks run before tasks are accepted.

mod ai;
mod library;
mod tmdb;

use crate::models::config::AppConfig;
use colored::Colorize;

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    /// Not applicable to this configuration; never blocks.
    Skipped,
    Failed,
}

/// One line of the preflight report.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: &str, hint: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.to_string(),
            hint: hint.map(str::to_string),
        }
    }

    pub fn ok(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Passed, message, None)
    }

    pub fn skipped(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Skipped, message, None)
    }

    pub fn fail(name: &str, message: &str, hint: &str) -> Self {
        Self::new(name, CheckStatus::Failed, message, Some(hint))
    }
}

/// TMDB, AI provider and library roots, in that order.
pub async fn run_preflight_checks(config: &AppConfig) -> Vec<CheckResult> {
    let mut results = vec![tmdb::check(&config.tmdb).await];

    if config.ai.enabled {
        results.push(ai::check(&config.ai).await);
    } else {
        results.push(CheckResult::skipped(
            &format!("AI ({})", config.ai.provider),
            "disabled, rule-based extraction only",
        ));
    }

    results.extend(library::check(&config.library));
    results
}

/// Print the report.
pub fn print_results(results: &[CheckResult]) {
    for result in results {
        let label = match result.status {
            CheckStatus::Passed => "[OK]".green(),
            CheckStatus::Skipped => "[SKIP]".dimmed(),
            CheckStatus::Failed => "[FAIL]".red(),
        };
        println!("{} {}: {}", label, result.name.bold(), result.message);
        if let Some(ref hint) = result.hint {
            println!("  {} {}", "->".yellow(), hint);
        }
    }
}

/// True when nothing failed; skipped checks count as passed.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.status != CheckStatus::Failed)
}
