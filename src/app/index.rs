//! CDX index client
//!
//! Queries the Wayback Machine CDX API for every capture under a URL
//! prefix. The query is issued exactly once per run and is never retried:
//! any failure here is fatal and aborts the run before downloading starts,
//! unlike the per-file retry scheme in the fetch path.

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::app::models::CdxRow;
use crate::constants::wayback;
use crate::errors::{IndexError, IndexResult};

/// Fetch all index rows for a URL prefix
///
/// Issues one GET to `<base>/cdx/search/cdx?url=<prefix>*&output=json`
/// and parses the body as a JSON array of arrays. The first row is the
/// CDX column header and is discarded before returning.
///
/// # Errors
///
/// Returns `IndexError` on a malformed endpoint URL, any network-level
/// failure, a non-2xx response, or a body that is not the expected JSON
/// shape. All of these abort the run.
pub async fn fetch_index(client: &Client, base_url: &str, prefix: &str) -> IndexResult<Vec<CdxRow>> {
    let endpoint = index_url(base_url, prefix)?;
    debug!("Querying CDX index: {}", endpoint);

    let response = client.get(endpoint).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(IndexError::BadStatus {
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    let mut rows: Vec<CdxRow> = serde_json::from_str(&body)?;

    // Row 0 is the CDX column header, not a capture
    if !rows.is_empty() {
        rows.remove(0);
    }

    info!("Index query returned {} capture(s)", rows.len());
    Ok(rows)
}

/// Build the CDX query URL for a prefix
///
/// The prefix is wildcard-suffixed so the index returns every capture
/// under it, not just exact matches.
fn index_url(base_url: &str, prefix: &str) -> IndexResult<Url> {
    let raw = format!(
        "{}{}?url={}*&output=json",
        base_url.trim_end_matches('/'),
        wayback::CDX_SEARCH_PATH,
        prefix
    );
    Url::parse(&raw).map_err(|source| IndexError::InvalidUrl {
        prefix: prefix.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_index_url_construction() {
        let url = index_url("http://web.archive.org", "https://example.com").unwrap();
        assert_eq!(url.path(), "/cdx/search/cdx");
        assert!(url.as_str().contains("output=json"));
        assert!(url.as_str().contains("https://example.com*"));
    }

    #[test]
    fn test_index_url_trailing_slash_base() {
        let url = index_url("http://web.archive.org/", "example.com").unwrap();
        assert!(url.as_str().starts_with("http://web.archive.org/cdx/"));
    }

    #[tokio::test]
    async fn test_fetch_index_discards_header_row() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            ["urlkey", "timestamp", "original", "mimetype", "statuscode", "digest", "length"],
            ["com,example)/a.txt", "20200101000000", "http://example.com/a.txt", "text/plain", "200", "X", "10"],
        ]);
        Mock::given(method("GET"))
            .and(path("/cdx/search/cdx"))
            .and(query_param("output", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let client = Client::new();
        let rows = fetch_index(&client, &server.uri(), "example.com")
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "20200101000000");
    }

    #[tokio::test]
    async fn test_fetch_index_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = Client::new();
        let rows = fetch_index(&client, &server.uri(), "example.com")
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_index_non_success_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = Client::new();
        let err = fetch_index(&client, &server.uri(), "example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::BadStatus { status: 503 }));
    }

    #[tokio::test]
    async fn test_fetch_index_malformed_body_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = Client::new();
        let err = fetch_index(&client, &server.uri(), "example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::MalformedBody(_)));
    }
}
