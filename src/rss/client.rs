//! HTTP client creation and request handling for the news feed.

use reqwest::header;
use tokio::time::timeout;
use tracing::{debug, info};

use super::error::FeedError;
use super::types::{ACCEPT, USER_AGENT};
use super::util::{decode_body, is_valid_url};
use crate::environment::FeedConfig;
use crate::TARGET_WEB_REQUEST;

/// Create the client used for the single feed request
pub fn create_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .gzip(true)
        .redirect(reqwest::redirect::Policy::default())
        .build()
}

/// Downloads the feed document and returns it as text.
///
/// Exactly one request is made. Connection failures, the timeout, non-success
/// statuses and unreadable bodies are all reported to the caller without retrying.
pub async fn fetch_feed_document(config: &FeedConfig) -> Result<String, FeedError> {
    let url = config.rss_url.as_str();
    if !is_valid_url(url) {
        return Err(FeedError::InvalidUrl(url.to_string()));
    }

    let client = create_http_client().map_err(|source| FeedError::Request {
        url: url.to_string(),
        source,
    })?;
    info!(target: TARGET_WEB_REQUEST, "Loading RSS feed from {}", url);

    let request = client
        .get(url)
        .header(header::USER_AGENT, USER_AGENT)
        .header(header::ACCEPT, ACCEPT);

    let exchange = async {
        let response = request.send().await.map_err(|source| FeedError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        debug!(target: TARGET_WEB_REQUEST, "Request to {} returned status {}", url, status);
        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|s| s.to_lowercase());

        let bytes = response.bytes().await.map_err(|source| FeedError::Body {
            url: url.to_string(),
            source,
        })?;
        debug!(target: TARGET_WEB_REQUEST, "Received {} bytes ({:?}) from {}", bytes.len(), content_type, url);

        Ok::<_, FeedError>(decode_body(&bytes, content_type.as_deref()))
    };

    match timeout(config.timeout, exchange).await {
        Ok(result) => result,
        Err(_) => Err(FeedError::Timeout {
            url: url.to_string(),
            secs: config.timeout.as_secs(),
        }),
    }
}
