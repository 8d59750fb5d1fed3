//! Command line argument definitions.

use crate::models::media::{MediaKind, TypeOverrides};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Media Renamer - classify downloads with TMDB and link them into your library
#[derive(Parser, Debug)]
#[command(name = "media-renamer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: <config dir>/media_renamer/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify and transfer one file or directory
    Process {
        /// File or directory to organize
        #[arg(value_name = "PATH")]
        path: String,

        #[command(flatten)]
        kind: KindArgs,
    },

    /// Submit several paths to the background dispatcher
    Batch {
        /// Files or directories to organize
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<String>,

        #[command(flatten)]
        kind: KindArgs,

        /// Concurrent tasks (default: `workers` from the config)
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Show a stored task record, its mapping and its log
    Show {
        /// Task id
        #[arg(value_name = "UUID")]
        uuid: String,
    },

    /// Print the TMDB record for an id
    Lookup {
        /// Media kind: tv or movie
        #[arg(value_name = "KIND")]
        kind: MediaKind,

        /// TMDB id
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Run preflight checks
    Check,
}

/// Classification overrides shared by `process` and `batch`.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct KindArgs {
    /// Treat the input as a movie
    #[arg(long, conflicts_with = "tv")]
    pub movie: bool,

    /// Treat the input as a series
    #[arg(long)]
    pub tv: bool,

    /// Put the result in the anime library
    #[arg(long, conflicts_with = "no_anime")]
    pub anime: bool,

    /// Keep the result out of the anime library
    #[arg(long)]
    pub no_anime: bool,
}

impl KindArgs {
    pub fn overrides(&self) -> TypeOverrides {
        TypeOverrides {
            is_movie: flag_pair(self.movie, self.tv),
            is_anime: flag_pair(self.anime, self.no_anime),
        }
    }
}

fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_with_overrides() {
        let cli = Cli::parse_from(["media-renamer", "process", "/dl/Show", "--tv", "--anime"]);
        match cli.command {
            Commands::Process { path, kind } => {
                assert_eq!(path, "/dl/Show");
                let overrides = kind.overrides();
                assert_eq!(overrides.is_movie, Some(false));
                assert_eq!(overrides.is_anime, Some(true));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        assert!(Cli::try_parse_from(["media-renamer", "process", "x", "--movie", "--tv"]).is_err());
    }

    #[test]
    fn test_parse_lookup() {
        let cli = Cli::parse_from(["media-renamer", "lookup", "movie", "129"]);
        assert!(matches!(
            cli.command,
            Commands::Lookup {
                kind: MediaKind::Movie,
                id: 129
            }
        ));
    }
}
