//! Command-line interface components
//!
//! This module contains CLI-specific code for the Wayback Fetcher
//! application: argument parsing, startup setup, and the download
//! command driver.

pub mod args;
pub mod startup;

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::app::{
    fetch_index, ClientConfig, Coordinator, CoordinatorConfig, ExtensionFilter, FailureLog,
    FetchConfig, SnapshotClient,
};
use crate::constants::{files, wayback};
use crate::errors::Result;

pub use args::{Cli, GlobalArgs};
pub use startup::{confirm_start, prepare_download_dir, scan_existing_downloads, show_welcome};

/// Execute the download command
///
/// Drives the full pipeline: confirmation, directory setup, index query,
/// and the coordinator run, ending with the summary line.
pub async fn handle_download(cli: Cli) -> Result<()> {
    let extensions = ExtensionFilter::new(cli.ext.clone());
    show_welcome(&cli.url, &extensions);

    if !confirm_start(cli.global.yes)? {
        println!("\nDownload cancelled. Exiting...\n");
        return Ok(());
    }

    println!("\nSetting up...");
    prepare_download_dir(&cli.global.output_dir)?;
    let downloaded = scan_existing_downloads(&cli.global.output_dir)?;
    if !downloaded.is_empty() {
        println!(
            "Found {} file(s) already downloaded, marking as complete...",
            downloaded.len()
        );
    }

    let logs = FailureLog::open(
        Path::new(files::SERVER_ERROR_LOG),
        Path::new(files::RECORD_ERROR_LOG),
    )?;
    let client = SnapshotClient::new(&ClientConfig::default(), FetchConfig::default())?;

    println!("Fetching data from the Wayback Machine API...");
    let rows = fetch_index(client.http(), wayback::CDX_BASE_URL, &cli.url).await?;
    println!(
        "Data fetched successfully! (found {} capture(s))\n",
        rows.len()
    );

    let config = CoordinatorConfig {
        download_dir: cli.global.output_dir.clone(),
        snapshot_base_url: wayback::SNAPSHOT_BASE_URL.to_string(),
        mark_failed_as_done: !cli.global.retry_failed,
    };

    info!(
        "Starting run: {} row(s), extensions [{}], retry_failed={}",
        rows.len(),
        extensions.suffixes().join(", "),
        cli.global.retry_failed
    );

    let mut coordinator = Coordinator::new(config, client, extensions, downloaded, logs);
    if !cli.global.quiet {
        coordinator = coordinator.with_progress(record_progress_bar(rows.len() as u64));
    }

    println!("Beginning download...\n");
    let stats = coordinator.run(rows).await;

    println!("\n{}\n", stats.summary());
    Ok(())
}

/// Progress bar ticked once per index row
fn record_progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} records")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
