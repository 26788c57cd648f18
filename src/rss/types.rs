//! Type definitions for the RSS module.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tokio::time::Duration;

/// Where an entry's calendar date was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// The `/issues/YY-MM-DD-...` segment of the entry link.
    Link,
    /// The publication timestamp, normalized to UTC.
    PubDate,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSource::Link => write!(f, "link"),
            DateSource::PubDate => write!(f, "pub_date"),
        }
    }
}

/// One digest issue from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    #[serde(rename = "date")]
    pub published_date: NaiveDate,
    pub title: String,
    pub link: String,
    pub guid: String,
    pub description: String,
    /// Raw body text as delivered by the feed.
    #[serde(rename = "content")]
    pub summary_text: String,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub date_source: DateSource,
}

/// Result of parsing one feed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFeed {
    /// Dated entries in feed order.
    pub entries: Vec<FeedEntry>,
    /// Entries dropped because no date could be derived for them.
    pub undated: usize,
}

// Constants
pub const DEFAULT_RSS_URL: &str = "https://news.smol.ai/rss.xml";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; AI-Daily/1.0)";
pub const ACCEPT: &str =
    "application/rss+xml, application/atom+xml, application/xml, text/xml, */*;q=0.9";
