//! Startup setup and user confirmation for Wayback Fetcher
//!
//! Prepares the download directory, seeds the downloaded-file set from
//! disk, and asks the user to confirm before any network work begins.
//! Cancelling at the prompt terminates cleanly with no side effects
//! beyond directory creation.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::app::filter::{DownloadedSet, ExtensionFilter};
use crate::errors::{SetupError, SetupResult};

/// Create the download directory if it does not exist
///
/// # Errors
///
/// Returns `SetupError::DirectoryCreation` if the directory cannot be
/// created; this is fatal.
pub fn prepare_download_dir(dir: &Path) -> SetupResult<()> {
    fs::create_dir_all(dir).map_err(|source| SetupError::DirectoryCreation {
        path: dir.to_path_buf(),
        source,
    })?;
    debug!("Download directory ready: {}", dir.display());
    Ok(())
}

/// Seed the downloaded-file set from the download directory
///
/// Files already on disk are never fetched again, which makes reruns
/// resume where the last run stopped.
pub fn scan_existing_downloads(dir: &Path) -> SetupResult<DownloadedSet> {
    let downloaded = DownloadedSet::scan_dir(dir)?;
    if !downloaded.is_empty() {
        info!(
            "Found {} file(s) already downloaded, marking as complete",
            downloaded.len()
        );
    }
    Ok(downloaded)
}

/// Print the welcome banner and the run description
pub fn show_welcome(url: &str, extensions: &ExtensionFilter) {
    println!("\n==========================================");
    println!("Welcome to the Wayback Machine Downloader!");
    println!("==========================================\n");

    if extensions.is_all() {
        println!("Downloading all files from '{}'.\n", url);
    } else {
        println!(
            "You are about to download files from '{}' with the following extensions: {}\n",
            url,
            extensions.suffixes().join(", ")
        );
    }
}

/// Ask the user to confirm before downloading begins
///
/// Returns `Ok(false)` when the user cancels. With `skip` (the `--yes`
/// flag) no prompt is shown.
///
/// # Errors
///
/// Returns `SetupError::Prompt` if stdin/stdout I/O fails.
pub fn confirm_start(skip: bool) -> SetupResult<bool> {
    if skip {
        return Ok(true);
    }

    print!("Press Enter to begin downloading, or type 'n' to cancel. ");
    io::stdout().flush().map_err(SetupError::Prompt)?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(SetupError::Prompt)?;

    Ok(!input.trim().eq_ignore_ascii_case("n"))
}
