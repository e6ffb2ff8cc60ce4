//! Wayback Fetcher Library
//!
//! A Rust library for downloading historical website snapshots from the
//! Wayback Machine CDX index, with extension filtering, deduplication
//! against already-downloaded files, and bounded retry/backoff.

pub mod app;
pub mod cli;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        // Test that our constants are accessible
        assert_eq!(MAX_FETCH_ATTEMPTS, 10);
        assert_eq!(DOWNLOAD_DIR, "files");
        assert!(USER_AGENT.contains("Wayback-Fetcher"));
    }

    #[test]
    fn test_error_types() {
        // Test that our error types work correctly
        let index_error = errors::IndexError::BadStatus { status: 500 };
        let app_error = AppError::Index(index_error);

        assert_eq!(app_error.category(), "index");
        assert!(app_error.is_fatal());
    }
}
