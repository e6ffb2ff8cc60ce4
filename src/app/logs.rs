//! Append-only failure logs
//!
//! Two separate streams survive every run: the server-error log records
//! per-file terminal skips (5xx responses, exhausted retries), and the
//! record-error log records malformed rows and unexpected per-record
//! failures. Entries are never removed.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::errors::{SetupError, SetupResult};

/// Writers for the two failure log streams
#[derive(Debug)]
pub struct FailureLog {
    server_errors: File,
    record_errors: File,
}

impl FailureLog {
    /// Open both log files in append mode, creating them if absent
    ///
    /// # Errors
    ///
    /// Returns `SetupError::LogOpen` if either file cannot be opened;
    /// fatal at startup.
    pub fn open(server_errors: &Path, record_errors: &Path) -> SetupResult<Self> {
        Ok(Self {
            server_errors: open_append(server_errors)?,
            record_errors: open_append(record_errors)?,
        })
    }

    /// Record a permanent skip caused by a 5xx response
    pub fn server_error(&mut self, status: u16, url: &str) -> io::Result<()> {
        writeln!(self.server_errors, "Got {}: {}", status, url)
    }

    /// Record a permanent skip after all fetch attempts failed
    pub fn retries_exhausted(&mut self, url: &str) -> io::Result<()> {
        writeln!(self.server_errors, "Maximum retries reached: {}", url)
    }

    /// Record a per-record processing failure
    pub fn record_error(&mut self, url: &str, detail: &str) -> io::Result<()> {
        writeln!(self.record_errors, "Error downloading {}: {}", url, detail)
    }
}

fn open_append(path: &Path) -> SetupResult<File> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|source| SetupError::LogOpen {
            path: path.to_path_buf(),
            source,
        })
}
