//! Command-line argument parsing for Wayback Fetcher
//!
//! This module defines the CLI structure using clap derive macros. The
//! tool is single-purpose, so the surface is two positionals plus a small
//! set of flags.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::constants::files;

/// Wayback Fetcher - Download historical website snapshots
#[derive(Parser, Debug)]
#[command(
    name = "wayback_fetcher",
    version,
    about = "Download files from the Wayback Machine for a URL prefix",
    long_about = "Downloads historical snapshots of a website's files from the Wayback Machine.
Queries the CDX index for every capture under a URL prefix, filters by extension,
skips files already on disk, and fetches each snapshot with retry and backoff."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The URL prefix to download files from
    #[arg(value_name = "URL")]
    pub url: String,

    /// File extensions to filter by (all files if left empty)
    #[arg(value_name = "EXT")]
    pub ext: Vec<String>,
}

/// Global arguments
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory to save downloaded files to
    #[arg(short, long, value_name = "DIR", default_value = files::DOWNLOAD_DIR)]
    pub output_dir: PathBuf,

    /// Retry files whose earlier fetch failed instead of skipping them
    /// for the rest of the run
    #[arg(long)]
    pub retry_failed: bool,

    /// Skip the confirmation prompt and start immediately
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}
