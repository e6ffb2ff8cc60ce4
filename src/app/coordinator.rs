//! Download coordination and run statistics
//!
//! The coordinator drives the pipeline sequentially: it consumes the CDX
//! rows, applies the eligibility filter, invokes the fetcher for each
//! eligible record, and tracks counters and failure logs. One record is
//! processed at a time; there is no overlap.

use std::path::PathBuf;

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::app::client::{FetchOutcome, SnapshotClient};
use crate::app::filter::{is_eligible, DownloadedSet, ExtensionFilter};
use crate::app::logs::FailureLog;
use crate::app::models::{CdxRow, DownloadTarget, IndexRecord, RunStats};
use crate::constants::{files, wayback};

/// Configuration for the download coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Directory downloaded snapshots are written to
    pub download_dir: PathBuf,
    /// Base URL for snapshot content retrieval
    pub snapshot_base_url: String,
    /// Mark failed fetches as done, so they are never retried within the
    /// run. This preserves the tool's historical behavior; disabling it
    /// lets later captures of the same filename try again.
    pub mark_failed_as_done: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(files::DOWNLOAD_DIR),
            snapshot_base_url: wayback::SNAPSHOT_BASE_URL.to_string(),
            mark_failed_as_done: true,
        }
    }
}

/// Sequential driver for one download run
pub struct Coordinator {
    config: CoordinatorConfig,
    client: SnapshotClient,
    extensions: ExtensionFilter,
    downloaded: DownloadedSet,
    logs: FailureLog,
    stats: RunStats,
    progress: Option<ProgressBar>,
}

impl Coordinator {
    /// Create a coordinator owning the shared client, logs and state
    pub fn new(
        config: CoordinatorConfig,
        client: SnapshotClient,
        extensions: ExtensionFilter,
        downloaded: DownloadedSet,
        logs: FailureLog,
    ) -> Self {
        Self {
            config,
            client,
            extensions,
            downloaded,
            logs,
            stats: RunStats::default(),
            progress: None,
        }
    }

    /// Attach a progress bar ticked once per index row
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Process every index row and return the final counters
    ///
    /// Per-record failures of any kind are logged and counted; none of
    /// them aborts the run.
    pub async fn run(&mut self, rows: Vec<CdxRow>) -> RunStats {
        for row in &rows {
            self.process_row(row).await;
            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        debug!(
            "Run finished: {} processed, {} downloaded, {} failed",
            self.stats.processed, self.stats.downloaded, self.stats.failed
        );
        self.stats
    }

    /// Handle a single CDX row
    async fn process_row(&mut self, row: &CdxRow) {
        let Some(record) = IndexRecord::from_row(row) else {
            warn!("Skipping malformed index row ({} column(s))", row.len());
            self.stats.failed += 1;
            let url = row
                .get(wayback::COL_ORIGINAL_URL)
                .map(String::as_str)
                .unwrap_or("<unknown>");
            self.log_record_error(url, "index row has too few columns");
            return;
        };

        if !is_eligible(&record, &self.extensions, &self.downloaded) {
            return;
        }
        self.stats.processed += 1;

        let target = DownloadTarget::from_record(
            &record,
            &self.config.snapshot_base_url,
            &self.config.download_dir,
        );

        match self
            .client
            .fetch_snapshot(&target.archive_url, &target.save_path, &mut self.logs)
            .await
        {
            Ok(FetchOutcome::Downloaded) => {
                self.stats.downloaded += 1;
                self.downloaded.insert(target.filename);
            }
            Ok(FetchOutcome::ServerError { .. }) | Ok(FetchOutcome::RetriesExhausted) => {
                // Already appended to the server-error log by the fetcher
                self.stats.failed += 1;
                if self.config.mark_failed_as_done {
                    self.downloaded.insert(target.filename);
                }
            }
            Err(e) => {
                warn!("Could not download {}: {}", record.original_url, e);
                self.stats.failed += 1;
                self.log_record_error(&record.original_url, &e.to_string());
                if self.config.mark_failed_as_done {
                    self.downloaded.insert(target.filename);
                }
            }
        }
    }

    fn log_record_error(&mut self, url: &str, detail: &str) {
        if let Err(e) = self.logs.record_error(url, detail) {
            error!("Failed to append to record error log: {}", e);
        }
    }
}
