//! Check command implementation.

use crate::models::config::AppConfig;
use crate::preflight;
use colored::Colorize;

/// Run and print the preflight checks; true when all passed.
pub async fn check(config: &AppConfig) -> bool {
    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await;
    preflight::print_results(&results);
    println!();

    preflight::all_passed(&results)
}
