//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeout
//! - One GET per page, reading the full body
//! - Error classification for logging
//!
//! There is no retry. Non-2xx responses are not errors: their body is handed to
//! the parser like any other page.

use crate::config::CrawlerConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed ({kind}): {source}")]
    Request {
        url: String,
        kind: &'static str,
        source: reqwest::Error,
    },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Raw response of one page fetch
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL as requested (the dedup key), not the post-redirect URL
    pub url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Full response body
    pub body: Vec<u8>,
}

/// Builds an HTTP client with the crawler configuration
///
/// # Example
///
/// ```no_run
/// use wiki_harvest::config::CrawlerConfig;
/// use wiki_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a URL and reads its whole body
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(RawPage)` - The body was read, whatever the status code
/// * `Err(FetchError)` - Transport failure or body read failure
pub async fn fetch_page(client: &Client, url: &str) -> Result<RawPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            kind: classify_request_error(&source),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{} returned HTTP {}", url, status.as_u16());
    }

    let body = response.bytes().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;

    Ok(RawPage {
        url: url.to_string(),
        status_code: status.as_u16(),
        body: body.to_vec(),
    })
}

fn classify_request_error(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connection refused"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_builder() {
        "invalid request"
    } else {
        "transport"
    }
}
