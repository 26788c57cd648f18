//! Fetching, parsing and date-indexing of the AI news feed.

pub mod client;
pub mod error;
pub mod index;
pub mod parser;
pub mod query;
pub mod types;
pub mod util;

pub use client::fetch_feed_document;
pub use error::FeedError;
pub use index::FeedIndex;
pub use parser::parse_feed;
pub use query::{DateQuery, RelativeDay};
pub use types::{
    DateSource, FeedEntry, ParsedFeed, DEFAULT_RSS_URL, REQUEST_TIMEOUT, USER_AGENT,
};

use tracing::info;

use crate::environment::FeedConfig;
use crate::TARGET_WEB_REQUEST;

/// Downloads the configured feed and indexes it by date.
pub async fn load_feed_index(config: &FeedConfig) -> Result<FeedIndex, FeedError> {
    let body = fetch_feed_document(config).await?;
    let parsed = parse_feed(&body)?;
    info!(target: TARGET_WEB_REQUEST, "Loaded {} dated entries from {}", parsed.entries.len(), config.rss_url);
    Ok(FeedIndex::from_parsed(parsed))
}
