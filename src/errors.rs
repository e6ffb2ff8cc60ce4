//! Error types for Wayback Fetcher
//!
//! This module defines error types for all components of the application.
//! The taxonomy separates fatal setup failures (which abort the run) from
//! per-record failures (which are logged and skipped).

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors during run setup
///
/// Any of these aborts the entire run before or at the start of record
/// processing; there is no partial recovery.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Download directory could not be created
    #[error("Failed to create download directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Download directory could not be scanned for existing files
    #[error("Failed to read download directory: {path}")]
    DirectoryScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure log file could not be opened for appending
    #[error("Failed to open log file: {path}")]
    LogOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the confirmation prompt from stdin failed
    #[error("Failed to read confirmation prompt")]
    Prompt(#[from] std::io::Error),

    /// HTTP client construction failed
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Fatal errors from the CDX index query
///
/// The index request is issued once and never retried; any failure here
/// aborts the run.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Index endpoint URL could not be constructed
    #[error("Invalid index URL for prefix '{prefix}': {source}")]
    InvalidUrl {
        prefix: String,
        #[source]
        source: url::ParseError,
    },

    /// Network-level failure talking to the index API
    #[error("Index API request failed")]
    Http(#[from] reqwest::Error),

    /// Index API answered with a non-success status
    #[error("Index API returned HTTP {status}")]
    BadStatus { status: u16 },

    /// Response body was not the expected JSON array of arrays
    #[error("Malformed index response")]
    MalformedBody(#[from] serde_json::Error),
}

/// Local failures while fetching a single snapshot
///
/// These cover I/O around the fetch (creating the output file, writing
/// chunks, appending to the failure log). They are isolated to the record
/// in question and never abort the run.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Snapshot URL could not be parsed
    #[error("Invalid snapshot URL: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Output file creation or write failed
    #[error("Failed to write snapshot to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Streaming the response body failed mid-transfer
    #[error("Failed to read response body")]
    Body(#[source] reqwest::Error),

    /// Appending to the failure log failed
    #[error("Failed to append to failure log")]
    LogAppend(#[source] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Setup error
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// Index query error
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Per-snapshot fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl AppError {
    /// Check whether this error aborts the whole run
    ///
    /// Setup and index failures are fatal; fetch failures are isolated to
    /// a single record and handled by the coordinator.
    pub fn is_fatal(&self) -> bool {
        match self {
            AppError::Setup(_) | AppError::Index(_) => true,
            AppError::Fetch(_) => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Setup(_) => "setup",
            AppError::Index(_) => "index",
            AppError::Fetch(_) => "fetch",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Index result type alias
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Setup result type alias
pub type SetupResult<T> = std::result::Result<T, SetupError>;
