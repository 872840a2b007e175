//! Feed retrieval: a single GET over HTTP, or a local file read.

mod basic;
mod client;

pub use basic::{BasicClient, DEFAULT_TIMEOUT};
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Performs one GET request and returns the raw body.
///
/// The status code is not inspected: whatever the server sends is handed to
/// the parser, which rejects anything that is not a feed document.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("Failed to fetch feed from {url}"))?;
    debug!(status = %resp.status(), "Feed response received");

    Ok(resp.bytes().await?.to_vec())
}

/// Loads feed data from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(client), fields(source = %source))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        fetch_bytes(client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read feed file {source}"))?
    };
    debug!(bytes = bytes.len(), "Feed loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<markers/>").unwrap();

        let client = BasicClient::with_timeout(DEFAULT_TIMEOUT).unwrap();
        let bytes = load_source(&client, file.path().to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(bytes, b"<markers/>");
    }

    #[tokio::test]
    async fn test_load_source_missing_file_is_error() {
        let client = BasicClient::with_timeout(DEFAULT_TIMEOUT).unwrap();
        let result = load_source(&client, "/nonexistent/nextbike-feed.xml").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_invalid_url() {
        let client = BasicClient::with_timeout(DEFAULT_TIMEOUT).unwrap();
        let result = fetch_bytes(&client, "http://[not a url").await;
        assert!(result.is_err());
    }
}
