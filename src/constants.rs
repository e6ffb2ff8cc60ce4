//! Application constants for Wayback Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Wayback-Fetcher/0.1.0 (Web Archive Research Tool)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;
}

/// Wayback Machine service URLs and endpoints
pub mod wayback {
    /// CDX index API base URL
    pub const CDX_BASE_URL: &str = "http://web.archive.org";

    /// CDX search path on the index host
    pub const CDX_SEARCH_PATH: &str = "/cdx/search/cdx";

    /// Base URL for retrieving snapshot content
    pub const SNAPSHOT_BASE_URL: &str = "https://web.archive.org";

    /// Fetchable status codes in CDX rows ("-" marks redirects/unknown
    /// captures that the archive still serves)
    pub const FETCHABLE_STATUSES: [&str; 2] = ["200", "-"];

    /// Minimum number of columns a CDX row must carry
    pub const MIN_ROW_COLUMNS: usize = 5;

    /// Column index of the capture timestamp in a CDX row
    pub const COL_TIMESTAMP: usize = 1;

    /// Column index of the original URL in a CDX row
    pub const COL_ORIGINAL_URL: usize = 2;

    /// Column index of the HTTP status code in a CDX row
    pub const COL_STATUS_CODE: usize = 4;
}

/// Retry and backoff configuration
pub mod limits {
    use super::Duration;

    /// Maximum fetch attempts per snapshot before giving up
    pub const MAX_FETCH_ATTEMPTS: u32 = 10;

    /// Initial backoff delay after a connection-level failure; doubles
    /// after every further failure
    pub const INITIAL_BACKOFF: Duration = Duration::from_secs(15);

    /// Response statuses treated as a permanent per-file skip
    pub const SERVER_ERROR_STATUSES: [u16; 4] = [500, 502, 503, 504];
}

/// File operation constants
pub mod files {
    /// Default directory for downloaded snapshots
    pub const DOWNLOAD_DIR: &str = "files";

    /// Append-only log for server errors and exhausted retries
    pub const SERVER_ERROR_LOG: &str = "failed.txt";

    /// Append-only log for per-record processing errors
    pub const RECORD_ERROR_LOG: &str = "errors.log";
}

// Re-export commonly used constants for convenience
pub use files::{DOWNLOAD_DIR, RECORD_ERROR_LOG, SERVER_ERROR_LOG};
pub use http::USER_AGENT;
pub use limits::{INITIAL_BACKOFF, MAX_FETCH_ATTEMPTS};
pub use wayback::{CDX_BASE_URL, SNAPSHOT_BASE_URL};
