//! Core application logic for Wayback Fetcher
//!
//! This module contains the retrieval pipeline: the CDX index client,
//! record eligibility filtering, the snapshot fetcher with retry/backoff,
//! the failure logs, and the coordinator that drives a run.

pub mod client;
pub mod coordinator;
pub mod filter;
pub mod index;
pub mod logs;
pub mod models;

// Re-export main public API
pub use client::{backoff_delay, ClientConfig, FetchConfig, FetchOutcome, SnapshotClient};
pub use coordinator::{Coordinator, CoordinatorConfig};
pub use filter::{is_eligible, DownloadedSet, ExtensionFilter};
pub use index::fetch_index;
pub use logs::FailureLog;
pub use models::{CdxRow, DownloadTarget, IndexRecord, RunStats};
