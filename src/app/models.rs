//! Data models for Wayback Fetcher
//!
//! This module defines the core data structures used throughout the
//! application: CDX index rows, parsed snapshot records, per-record
//! download targets, and run statistics.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::wayback;

/// One raw row from the CDX index response
///
/// The header row is discarded by the index client, so every `CdxRow`
/// handed to the coordinator is a candidate record. Rows may still be
/// malformed (too few columns); that is a per-record failure, not a
/// fatal one.
pub type CdxRow = Vec<String>;

/// A single historical capture of a URL, parsed from a CDX row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Capture timestamp (e.g., "20200101000000")
    pub timestamp: String,
    /// The originally archived URL
    pub original_url: String,
    /// HTTP status code recorded at capture time ("200", "404", "-", ...)
    pub status_code: String,
}

impl IndexRecord {
    /// Parse an index record from a raw CDX row
    ///
    /// Expects at least 5 columns with the timestamp at index 1, the
    /// original URL at index 2 and the status code at index 4.
    ///
    /// Returns `None` for rows with too few columns; the caller treats
    /// those as individual failures.
    pub fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < wayback::MIN_ROW_COLUMNS {
            return None;
        }

        Some(Self {
            timestamp: row[wayback::COL_TIMESTAMP].clone(),
            original_url: row[wayback::COL_ORIGINAL_URL].clone(),
            status_code: row[wayback::COL_STATUS_CODE].clone(),
        })
    }

    /// Extract the basename from the original URL
    ///
    /// The basename is the final path segment after the last '/', used as
    /// the local filename. A URL ending in '/' yields an empty basename;
    /// the fetch for such a record fails locally and is logged.
    pub fn basename(&self) -> &str {
        self.original_url
            .rsplit('/')
            .next()
            .unwrap_or(&self.original_url)
    }

    /// Check whether the recorded status marks the capture as fetchable
    ///
    /// "200" is an ordinary capture; "-" marks redirects/unknown captures
    /// that the archive still serves.
    pub fn is_fetchable_status(&self) -> bool {
        wayback::FETCHABLE_STATUSES
            .iter()
            .any(|s| self.status_code == *s)
    }

    /// Construct the archive content URL for this capture
    pub fn snapshot_url(&self, base_url: &str) -> String {
        format!(
            "{}/web/{}/{}",
            base_url.trim_end_matches('/'),
            self.timestamp,
            self.original_url
        )
    }
}

/// Everything needed to fetch and store one eligible record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Full archive URL for the capture
    pub archive_url: String,
    /// Local path the body is streamed to
    pub save_path: PathBuf,
    /// Basename used for deduplication
    pub filename: String,
}

impl DownloadTarget {
    /// Derive a download target from an eligible record
    pub fn from_record(record: &IndexRecord, base_url: &str, download_dir: &Path) -> Self {
        let filename = record.basename().to_string();
        Self {
            archive_url: record.snapshot_url(base_url),
            save_path: download_dir.join(&filename),
            filename,
        }
    }
}

/// Counters for one coordinator run
///
/// `processed` counts only records that passed the filter, so
/// `processed == downloaded + failed` holds over filter-passing records.
/// Malformed rows increment `failed` without incrementing `processed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Records that passed the eligibility filter
    pub processed: u64,
    /// Snapshots written to disk
    pub downloaded: u64,
    /// Records that terminally failed (server error, exhausted retries,
    /// malformed row, local I/O error)
    pub failed: u64,
}

impl RunStats {
    /// Whether any record was actually attempted
    pub fn is_empty(&self) -> bool {
        self.downloaded + self.failed == 0
    }

    /// Success rate as a percentage, rounded to the nearest integer
    ///
    /// Returns `None` when nothing was attempted, so callers emit the
    /// "nothing to do" message instead of dividing by zero.
    pub fn success_rate(&self) -> Option<u32> {
        let attempted = self.downloaded + self.failed;
        if attempted == 0 {
            return None;
        }
        let rate = self.downloaded as f64 / attempted as f64 * 100.0;
        Some(rate.round() as u32)
    }

    /// Human-readable end-of-run summary
    pub fn summary(&self) -> String {
        match self.success_rate() {
            Some(rate) => format!(
                "Download complete! ({} processed, {} downloaded, {} failed - {}% success rate)",
                self.processed, self.downloaded, self.failed, rate
            ),
            None => "Complete - No files were found to download. Either you already have \
                     them all, or all of the files processed were duplicates/redirects."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cols: &[&str]) -> CdxRow {
        cols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_from_valid_row() {
        let record = IndexRecord::from_row(&row(&[
            "com,example)/a.txt",
            "20200101000000",
            "http://example.com/a.txt",
            "text/plain",
            "200",
        ]))
        .unwrap();

        assert_eq!(record.timestamp, "20200101000000");
        assert_eq!(record.original_url, "http://example.com/a.txt");
        assert_eq!(record.status_code, "200");
    }

    #[test]
    fn test_record_from_short_row() {
        // Rows with fewer than 5 columns are malformed
        assert!(IndexRecord::from_row(&row(&["a", "b", "c"])).is_none());
        assert!(IndexRecord::from_row(&row(&[])).is_none());
    }

    #[test]
    fn test_basename_extraction() {
        let record = IndexRecord {
            timestamp: "20200101000000".to_string(),
            original_url: "http://example.com/docs/report.pdf?v=2".to_string(),
            status_code: "200".to_string(),
        };
        // Query strings stay attached; only path splitting is applied
        assert_eq!(record.basename(), "report.pdf?v=2");
    }

    #[test]
    fn test_basename_trailing_slash() {
        let record = IndexRecord {
            timestamp: "20200101000000".to_string(),
            original_url: "http://example.com/docs/".to_string(),
            status_code: "200".to_string(),
        };
        assert_eq!(record.basename(), "");
    }

    #[test]
    fn test_fetchable_status() {
        let mut record = IndexRecord {
            timestamp: "t".to_string(),
            original_url: "http://example.com/a".to_string(),
            status_code: "200".to_string(),
        };
        assert!(record.is_fetchable_status());

        record.status_code = "-".to_string();
        assert!(record.is_fetchable_status());

        record.status_code = "404".to_string();
        assert!(!record.is_fetchable_status());

        record.status_code = "301".to_string();
        assert!(!record.is_fetchable_status());
    }

    #[test]
    fn test_snapshot_url_construction() {
        let record = IndexRecord {
            timestamp: "20200101000000".to_string(),
            original_url: "http://example.com/a.txt".to_string(),
            status_code: "200".to_string(),
        };
        assert_eq!(
            record.snapshot_url("https://web.archive.org"),
            "https://web.archive.org/web/20200101000000/http://example.com/a.txt"
        );
        // Trailing slash on the base must not double up
        assert_eq!(
            record.snapshot_url("https://web.archive.org/"),
            "https://web.archive.org/web/20200101000000/http://example.com/a.txt"
        );
    }

    #[test]
    fn test_download_target_paths() {
        let record = IndexRecord {
            timestamp: "20200101000000".to_string(),
            original_url: "http://example.com/a.txt".to_string(),
            status_code: "200".to_string(),
        };
        let target =
            DownloadTarget::from_record(&record, "https://web.archive.org", Path::new("files"));

        assert_eq!(target.filename, "a.txt");
        assert_eq!(target.save_path, PathBuf::from("files/a.txt"));
        assert!(target.archive_url.ends_with("/http://example.com/a.txt"));
    }

    #[test]
    fn test_success_rate_rounding() {
        let stats = RunStats {
            processed: 3,
            downloaded: 2,
            failed: 1,
        };
        // 66.67% rounds to 67
        assert_eq!(stats.success_rate(), Some(67));
    }

    #[test]
    fn test_success_rate_empty_run() {
        let stats = RunStats::default();
        assert!(stats.is_empty());
        assert_eq!(stats.success_rate(), None);
        assert!(stats.summary().contains("No files were found"));
    }

    #[test]
    fn test_summary_full_success() {
        let stats = RunStats {
            processed: 1,
            downloaded: 1,
            failed: 0,
        };
        let summary = stats.summary();
        assert!(summary.contains("1 processed"));
        assert!(summary.contains("100% success rate"));
    }
}
