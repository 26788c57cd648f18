//! Date index over one parsed feed.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use super::types::{FeedEntry, ParsedFeed};
use crate::TARGET_FEED_PARSE;

/// Entries of a single feed grouped by calendar date.
///
/// Built fresh for every invocation and never persisted. Within a date, entries
/// keep the order they had in the feed.
#[derive(Debug, Clone, Default)]
pub struct FeedIndex {
    entries: Vec<FeedEntry>,
    by_date: BTreeMap<NaiveDate, Vec<FeedEntry>>,
    undated: usize,
}

impl FeedIndex {
    pub fn from_parsed(parsed: ParsedFeed) -> Self {
        let mut index = Self::from_entries(parsed.entries);
        index.undated = parsed.undated;
        index
    }

    pub fn from_entries(entries: Vec<FeedEntry>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<FeedEntry>> = BTreeMap::new();
        for entry in &entries {
            by_date
                .entry(entry.published_date)
                .or_default()
                .push(entry.clone());
        }
        debug!(target: TARGET_FEED_PARSE, "Indexed {} entries across {} dates", entries.len(), by_date.len());

        Self {
            entries,
            by_date,
            undated: 0,
        }
    }

    /// All entries published on `date`, empty when there are none.
    pub fn lookup_by_date(&self, date: NaiveDate) -> &[FeedEntry] {
        self.by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Earliest and latest dates present, or `None` for an empty feed.
    pub fn available_date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = *self.by_date.keys().next()?;
        let max = *self.by_date.keys().next_back()?;
        Some((min, max))
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.by_date.keys().next_back().copied()
    }

    /// Distinct dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }

    /// Every dated entry in feed order.
    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of feed entries left out because they had no usable date.
    pub fn undated(&self) -> usize {
        self.undated
    }
}
