//! Media Renamer CLI
//!
//! Classifies downloaded video files as TV or movie with TMDB (and optionally
//! an AI provider) and transfers them into a Plex/Emby style library.

use clap::Parser;
use media_renamer::cli::{
    args::{Cli, Commands},
    commands::{batch, check, lookup, process, show},
};
use media_renamer::models::config::{load_config, AppConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Arc::new(load_config(cli.config.as_deref())?);

    match cli.command {
        Commands::Process { path, kind } => {
            if !cli.skip_preflight {
                run_preflight_checks(&config).await?;
            }
            let record = process::process(config, &path, kind.overrides()).await?;
            if record.is_failed() {
                std::process::exit(1);
            }
        }

        Commands::Batch {
            paths,
            kind,
            workers,
        } => {
            if !cli.skip_preflight {
                run_preflight_checks(&config).await?;
            }
            let records = batch::batch(config, &paths, kind.overrides(), workers).await?;
            if records.iter().any(|r| r.is_failed()) {
                std::process::exit(1);
            }
        }

        Commands::Show { uuid } => {
            show::show(&config, &uuid)?;
        }

        Commands::Lookup { kind, id } => {
            lookup::lookup(&config, kind, id).await?;
        }

        Commands::Check => {
            if !check::check(&config).await {
                anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
            }
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("media_renamer=debug")
    } else {
        EnvFilter::new("media_renamer=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &AppConfig) -> anyhow::Result<()> {
    if !check::check(config).await {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }
    Ok(())
}
