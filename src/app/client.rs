//! Snapshot fetching with retry and backoff
//!
//! This module owns the HTTP client configuration and the per-file fetch
//! loop. One `reqwest::Client` (and its connection pool) is built at
//! startup and reused for the index query and every snapshot fetch.
//!
//! Failure classification per attempt:
//! - 5xx response: permanent per-file skip, logged, no retry
//! - any other response status: body streamed to disk, success
//! - connection-level error (timeout, DNS, reset, mid-stream drop):
//!   sleep a doubling backoff and retry, up to the attempt limit

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::app::logs::FailureLog;
use crate::constants::{http, limits};
use crate::errors::{FetchError, FetchResult, SetupError, SetupResult};

/// Configuration for the shared HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: http::POOL_IDLE_TIMEOUT,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> SetupResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_per_host)
            .tcp_nodelay(true)
            .build()
            .map_err(SetupError::HttpClient)
    }
}

/// Configuration for the per-file retry scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum attempts per snapshot
    pub max_attempts: u32,
    /// Backoff after the first connection failure; doubles per failure
    pub initial_backoff: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: limits::MAX_FETCH_ATTEMPTS,
            initial_backoff: limits::INITIAL_BACKOFF,
        }
    }
}

/// Terminal outcome of one snapshot fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body written to disk
    Downloaded,
    /// 5xx response; skipped permanently and logged
    ServerError { status: u16 },
    /// Every attempt failed at the connection level; logged
    RetriesExhausted,
}

/// Outcome of a single attempt
enum Attempt {
    Fetched,
    ServerError(u16),
}

/// Why a single attempt did not produce an outcome
enum AttemptError {
    /// Connection-level failure; retried with backoff
    Transient(reqwest::Error),
    /// Local I/O failure; propagated to the coordinator as a per-record error
    Io(FetchError),
}

/// Snapshot downloader sharing one connection pool across the run
#[derive(Debug)]
pub struct SnapshotClient {
    http: Client,
    config: FetchConfig,
}

impl SnapshotClient {
    /// Build the client from configuration
    pub fn new(client_config: &ClientConfig, config: FetchConfig) -> SetupResult<Self> {
        Ok(Self {
            http: client_config.build_http_client()?,
            config,
        })
    }

    /// Wrap an existing HTTP client (tests use this with fast backoff)
    pub fn with_http_client(http: Client, config: FetchConfig) -> Self {
        Self { http, config }
    }

    /// The shared HTTP client, also used for the index query
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Fetch one snapshot to disk
    ///
    /// Attempts up to `max_attempts` times. Terminal skips (5xx response,
    /// exhausted retries) append one line to the server-error log and are
    /// returned as an `Ok` outcome; only local I/O failures surface as
    /// `Err`, which the coordinator handles as a per-record error.
    pub async fn fetch_snapshot(
        &self,
        archive_url: &str,
        save_path: &Path,
        logs: &mut FailureLog,
    ) -> FetchResult<FetchOutcome> {
        let url = Url::parse(archive_url).map_err(|source| FetchError::InvalidUrl {
            url: archive_url.to_string(),
            source,
        })?;

        info!("Downloading {}", archive_url);

        let mut connection_failures = 0;
        for attempt in 1..=self.config.max_attempts {
            match self.try_fetch(&url, save_path).await {
                Ok(Attempt::Fetched) => {
                    debug!("Fetched {} on attempt {}", archive_url, attempt);
                    return Ok(FetchOutcome::Downloaded);
                }
                Ok(Attempt::ServerError(status)) => {
                    warn!(
                        "Got status code {} for {} - skipping and logging",
                        status, archive_url
                    );
                    logs.server_error(status, archive_url)
                        .map_err(FetchError::LogAppend)?;
                    return Ok(FetchOutcome::ServerError { status });
                }
                Err(AttemptError::Io(e)) => return Err(e),
                Err(AttemptError::Transient(e)) => {
                    let delay = backoff_delay(self.config.initial_backoff, connection_failures);
                    connection_failures += 1;
                    warn!(
                        "Error fetching {} (attempt {}/{}): {} - retrying in {:?}",
                        archive_url, attempt, self.config.max_attempts, e, delay
                    );
                    if attempt < self.config.max_attempts {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        warn!(
            "Maximum retries reached for {} - skipping and logging",
            archive_url
        );
        logs.retries_exhausted(archive_url)
            .map_err(FetchError::LogAppend)?;
        Ok(FetchOutcome::RetriesExhausted)
    }

    /// One request/stream cycle
    async fn try_fetch(&self, url: &Url, save_path: &Path) -> Result<Attempt, AttemptError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(AttemptError::Transient)?;

        let status = response.status().as_u16();
        if limits::SERVER_ERROR_STATUSES.contains(&status) {
            return Ok(Attempt::ServerError(status));
        }

        // Every other status streams the body to disk, matching the
        // archive's habit of serving content under unusual codes
        self.write_body(response, save_path).await?;
        Ok(Attempt::Fetched)
    }

    /// Stream a response body to disk, overwriting any existing file
    async fn write_body(&self, response: Response, save_path: &Path) -> Result<(), AttemptError> {
        let write_err = |source: std::io::Error| {
            AttemptError::Io(FetchError::Write {
                path: save_path.to_path_buf(),
                source,
            })
        };

        let mut file = File::create(save_path).await.map_err(write_err)?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            // A mid-stream drop is a connection failure, retried like any other
            let chunk = chunk.map_err(AttemptError::Transient)?;
            file.write_all(&chunk).await.map_err(write_err)?;
        }
        file.flush().await.map_err(write_err)?;
        Ok(())
    }
}

/// Backoff delay after a given number of prior connection failures
///
/// Doubles per failure: 15, 30, 60, ... seconds with the default
/// configuration.
pub fn backoff_delay(initial: Duration, failures: u32) -> Duration {
    initial * 2u32.saturating_pow(failures)
}
