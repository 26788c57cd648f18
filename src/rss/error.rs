use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced while loading the feed.
///
/// Everything except [`FeedError::Parse`] is a fetch failure.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid feed URL: {0}")]
    InvalidUrl(String),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out after {secs} seconds")]
    Timeout { url: String, secs: u64 },

    #[error("non-success status {status} from {url}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse feed: {0}")]
    Parse(String),
}

impl FeedError {
    pub fn is_parse(&self) -> bool {
        matches!(self, FeedError::Parse(_))
    }

    /// Stable identifier used in JSON failure reports.
    pub fn kind(&self) -> &'static str {
        if self.is_parse() {
            "parse_failed"
        } else {
            "fetch_failed"
        }
    }
}

impl From<feed_rs::parser::ParseFeedError> for FeedError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        FeedError::Parse(err.to_string())
    }
}
