//! JSON payloads printed for the calling agent.

use chrono::NaiveDate;
use serde::Serialize;

use crate::rss::{DateQuery, FeedEntry, FeedError, FeedIndex};

#[derive(Debug, Serialize)]
pub struct AllEntriesReport<'a> {
    pub total_entries: usize,
    pub undated_entries: usize,
    pub entries: &'a [FeedEntry],
}

#[derive(Debug, Serialize)]
pub struct DateRangeReport {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub total_entries: usize,
    pub undated_entries: usize,
}

#[derive(Debug, Serialize)]
pub struct DateEntriesReport<'a> {
    pub target_date: NaiveDate,
    pub count: usize,
    pub entries: &'a [FeedEntry],
}

#[derive(Debug, Serialize)]
pub struct AvailableRange {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

/// Not an error condition: the agent shows the available range instead.
#[derive(Debug, Serialize)]
pub struct NotFoundReport {
    pub error: &'static str,
    pub message: String,
    pub target_date: NaiveDate,
    pub available_range: AvailableRange,
}

#[derive(Debug, Serialize)]
pub struct FailureReport {
    pub error: &'static str,
    pub message: String,
}

impl From<&FeedError> for FailureReport {
    fn from(err: &FeedError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Renders the answer to `query` as JSON.
pub fn render_query(
    index: &FeedIndex,
    query: DateQuery,
    pretty: bool,
) -> serde_json::Result<String> {
    match query {
        DateQuery::All => to_json(
            &AllEntriesReport {
                total_entries: index.len(),
                undated_entries: index.undated(),
                entries: index.entries(),
            },
            pretty,
        ),
        DateQuery::Range => {
            let range = index.available_date_range();
            to_json(
                &DateRangeReport {
                    min_date: range.map(|(min, _)| min),
                    max_date: range.map(|(_, max)| max),
                    total_entries: index.len(),
                    undated_entries: index.undated(),
                },
                pretty,
            )
        }
        DateQuery::On(target_date) => {
            let entries = index.lookup_by_date(target_date);
            if entries.is_empty() {
                let range = index.available_date_range();
                to_json(
                    &NotFoundReport {
                        error: "not_found",
                        message: format!("No content found for {}", target_date),
                        target_date,
                        available_range: AvailableRange {
                            min: range.map(|(min, _)| min),
                            max: range.map(|(_, max)| max),
                        },
                    },
                    pretty,
                )
            } else {
                to_json(
                    &DateEntriesReport {
                        target_date,
                        count: entries.len(),
                        entries,
                    },
                    pretty,
                )
            }
        }
    }
}

pub fn render_failure(err: &FeedError, pretty: bool) -> serde_json::Result<String> {
    to_json(&FailureReport::from(err), pretty)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rss::{parse_feed, DateSource};
    use serde_json::{json, Value};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>AI News</title>
    <item>
      <title>Issue 13 part 2</title>
      <link>https://news.smol.ai/issues/26-01-13-part-two/</link>
      <guid>i13b</guid>
      <description>second</description>
    </item>
    <item>
      <title>Issue 13</title>
      <link>https://news.smol.ai/issues/26-01-13-part-one/</link>
      <guid>i13a</guid>
      <description>first</description>
    </item>
    <item>
      <title>Issue 10</title>
      <link>https://news.smol.ai/issues/26-01-10-ten/</link>
      <guid>i10</guid>
      <description>ten</description>
    </item>
  </channel>
</rss>"#;

    fn index() -> FeedIndex {
        FeedIndex::from_parsed(parse_feed(FEED).unwrap())
    }

    fn render(query: DateQuery) -> Value {
        serde_json::from_str(&render_query(&index(), query, false).unwrap()).unwrap()
    }

    #[test]
    fn test_range_report() {
        assert_eq!(
            render(DateQuery::Range),
            json!({
                "min_date": "2026-01-10",
                "max_date": "2026-01-13",
                "total_entries": 3,
                "undated_entries": 0,
            })
        );
    }

    #[test]
    fn test_date_report_lists_all_matches() {
        let value = render(DateQuery::On("2026-01-13".parse().unwrap()));
        assert_eq!(value["target_date"], "2026-01-13");
        assert_eq!(value["count"], 2);
        assert_eq!(value["entries"][0]["title"], "Issue 13 part 2");
        assert_eq!(value["entries"][1]["content"], "first");
        assert_eq!(value["entries"][1]["date"], "2026-01-13");
        assert_eq!(value["entries"][1]["date_source"], "link");
        assert_eq!(value["entries"][1]["pubDate"], Value::Null);
    }

    #[test]
    fn test_missing_date_reports_available_range() {
        assert_eq!(
            render(DateQuery::On("2026-01-14".parse().unwrap())),
            json!({
                "error": "not_found",
                "message": "No content found for 2026-01-14",
                "target_date": "2026-01-14",
                "available_range": { "min": "2026-01-10", "max": "2026-01-13" },
            })
        );
    }

    #[test]
    fn test_all_entries_report() {
        let value = render(DateQuery::All);
        assert_eq!(value["total_entries"], 3);
        assert_eq!(value["entries"].as_array().unwrap().len(), 3);
        assert_eq!(value["entries"][2]["guid"], "i10");
    }

    #[test]
    fn test_empty_feed_range_is_null() {
        let value: Value = serde_json::from_str(
            &render_query(&FeedIndex::default(), DateQuery::Range, true).unwrap(),
        )
        .unwrap();
        assert_eq!(value["min_date"], Value::Null);
        assert_eq!(value["max_date"], Value::Null);
    }

    #[test]
    fn test_failure_report() {
        let err = FeedError::Parse("unexpected end of input".into());
        let value: Value = serde_json::from_str(&render_failure(&err, false).unwrap()).unwrap();
        assert_eq!(value["error"], "parse_failed");
        assert_eq!(
            value["message"],
            "failed to parse feed: unexpected end of input"
        );
    }

    #[test]
    fn test_date_source_serializes_like_display() {
        for source in [DateSource::Link, DateSource::PubDate] {
            assert_eq!(serde_json::to_value(source).unwrap(), source.to_string());
        }
    }
}
