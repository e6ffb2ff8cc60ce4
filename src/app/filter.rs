//! Record eligibility filtering
//!
//! Decides which index records are worth fetching: extension match,
//! fetchable capture status, and not-already-downloaded. The downloaded
//! set is seeded from the download directory at startup so reruns skip
//! files already on disk.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::app::models::IndexRecord;
use crate::errors::{SetupError, SetupResult};

/// Extension filter for download candidates
///
/// An empty filter means "all files". Matching is a raw suffix match on
/// the basename, so "txt" matches "a.txt" (and also "atxt"); dot-aware
/// parsing would change which files download.
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
}

impl ExtensionFilter {
    /// Create a filter from the extension strings given on the CLI
    pub fn new(suffixes: Vec<String>) -> Self {
        Self { suffixes }
    }

    /// Whether this filter accepts every file
    pub fn is_all(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// Check a basename against the filter
    pub fn matches(&self, basename: &str) -> bool {
        self.is_all() || self.suffixes.iter().any(|s| basename.ends_with(s.as_str()))
    }

    /// The configured suffixes, for display
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}

/// Set of basenames that must not be fetched again
///
/// Grows monotonically: seeded from the download directory, then extended
/// after every attempted record during the run. Membership is checked
/// before every fetch, which is what guarantees a filename is fetched at
/// most once per run.
#[derive(Debug, Clone, Default)]
pub struct DownloadedSet {
    names: HashSet<String>,
}

impl DownloadedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the set with the filenames already present in a directory
    ///
    /// # Errors
    ///
    /// Returns `SetupError::DirectoryScan` if the directory cannot be
    /// read; this is fatal at startup.
    pub fn scan_dir(dir: &Path) -> SetupResult<Self> {
        let mut names = HashSet::new();
        let entries = fs::read_dir(dir).map_err(|source| SetupError::DirectoryScan {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| SetupError::DirectoryScan {
                path: dir.to_path_buf(),
                source,
            })?;
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }

        debug!("Found {} file(s) already downloaded", names.len());
        Ok(Self { names })
    }

    /// Check membership
    pub fn contains(&self, basename: &str) -> bool {
        self.names.contains(basename)
    }

    /// Mark a basename as handled for the rest of the run
    pub fn insert(&mut self, basename: impl Into<String>) {
        self.names.insert(basename.into());
    }

    /// Number of known basenames
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Check whether a record is eligible for download
///
/// Eligible iff the basename passes the extension filter, the capture
/// status is fetchable ("200" or "-"), and the basename has not already
/// been downloaded or attempted.
pub fn is_eligible(
    record: &IndexRecord,
    extensions: &ExtensionFilter,
    downloaded: &DownloadedSet,
) -> bool {
    let basename = record.basename();

    extensions.matches(basename)
        && record.is_fetchable_status()
        && !downloaded.contains(basename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(url: &str, status: &str) -> IndexRecord {
        IndexRecord {
            timestamp: "20200101000000".to_string(),
            original_url: url.to_string(),
            status_code: status.to_string(),
        }
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = ExtensionFilter::default();
        assert!(filter.is_all());
        assert!(filter.matches("a.txt"));
        assert!(filter.matches("image.png"));
        assert!(filter.matches(""));
    }

    #[test]
    fn test_suffix_matching() {
        let filter = ExtensionFilter::new(vec!["txt".to_string(), "html".to_string()]);
        assert!(filter.matches("a.txt"));
        assert!(filter.matches("index.html"));
        assert!(!filter.matches("image.png"));
        // Raw suffix semantics: no dot is required
        assert!(filter.matches("atxt"));
    }

    #[test]
    fn test_eligibility_extension_and_status() {
        let filter = ExtensionFilter::new(vec!["txt".to_string()]);
        let downloaded = DownloadedSet::new();

        assert!(is_eligible(
            &record("http://ex.com/a.txt", "200"),
            &filter,
            &downloaded
        ));
        // Redirect sentinel is fetchable
        assert!(is_eligible(
            &record("http://ex.com/a.txt", "-"),
            &filter,
            &downloaded
        ));
        // Wrong extension
        assert!(!is_eligible(
            &record("http://ex.com/a.png", "200"),
            &filter,
            &downloaded
        ));
        // Non-fetchable capture status
        assert!(!is_eligible(
            &record("http://ex.com/a.txt", "404"),
            &filter,
            &downloaded
        ));
    }

    #[test]
    fn test_downloaded_set_always_rejects() {
        let filter = ExtensionFilter::default();
        let mut downloaded = DownloadedSet::new();
        downloaded.insert("a.txt");

        // Already-present basenames are rejected regardless of other fields
        assert!(!is_eligible(
            &record("http://ex.com/a.txt", "200"),
            &filter,
            &downloaded
        ));
        assert!(!is_eligible(
            &record("http://ex.com/dir/a.txt", "-"),
            &filter,
            &downloaded
        ));
    }

    #[test]
    fn test_scan_dir_seeds_set() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("b.html"), b"x").unwrap();

        let downloaded = DownloadedSet::scan_dir(dir.path()).unwrap();
        assert_eq!(downloaded.len(), 2);
        assert!(downloaded.contains("a.txt"));
        assert!(downloaded.contains("b.html"));
        assert!(!downloaded.contains("c.txt"));
    }

    #[test]
    fn test_scan_dir_missing_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        assert!(DownloadedSet::scan_dir(&missing).is_err());
    }
}
