//! Feed parsing logic: raw RSS/Atom text into dated entries.

use chrono::NaiveDate;
use feed_rs::model::{Entry, Link, Text};
use feed_rs::parser::{self, Parser};
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::Cursor;
use tracing::{debug, warn};

use super::error::FeedError;
use super::types::{DateSource, FeedEntry, ParsedFeed};
use super::util::extract_date_from_link;
use crate::TARGET_FEED_PARSE;

/// Parses a feed document into entries, keeping feed order.
///
/// The whole document must parse; a malformed feed yields [`FeedError::Parse`] and
/// no entries. Entries for which no date can be derived are dropped and counted in
/// [`ParsedFeed::undated`].
pub fn parse_feed(body: &str) -> Result<ParsedFeed, FeedError> {
    let body = body.trim_start_matches('\u{FEFF}').trim_start();
    check_well_formed(body)?;
    let reader = Cursor::new(body.as_bytes());
    let feed = feed_parser().parse(reader)?;
    debug!(target: TARGET_FEED_PARSE, "Parsed feed with {} entries", feed.entries.len());

    let mut parsed = ParsedFeed::default();
    for entry in feed.entries {
        match convert_entry(entry) {
            Some(converted) => parsed.entries.push(converted),
            None => parsed.undated += 1,
        }
    }

    if parsed.undated > 0 {
        warn!(target: TARGET_FEED_PARSE, "Skipped {} feed entries without a usable date", parsed.undated);
    }

    Ok(parsed)
}

/// feed-rs parser whose generated ids (for items without a guid) are the entry link.
fn feed_parser() -> Parser {
    parser::Builder::new()
        .id_generator(|links: &[Link], _title: &Option<Text>, _uri: Option<&str>| {
            links
                .first()
                .map(|link| link.href.clone())
                .unwrap_or_default()
        })
        .build()
}

/// Rejects documents that are not well-formed XML.
///
/// feed-rs stops reading once it has what it needs, so a missing root close tag,
/// content after the root element or an undefined entity would otherwise go
/// unnoticed.
pub fn check_well_formed(body: &str) -> Result<(), FeedError> {
    let mut reader = Reader::from_str(body);
    let mut depth: usize = 0;
    let mut root_seen = false;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                return Err(FeedError::Parse(format!(
                    "malformed XML at byte {}: {}",
                    reader.error_position(),
                    err
                )))
            }
        };

        match event {
            Event::Start(_) | Event::Empty(_) if depth == 0 && root_seen => {
                return Err(FeedError::Parse(format!(
                    "unexpected element after the root element at byte {}",
                    reader.buffer_position()
                )));
            }
            Event::Start(_) => {
                root_seen = true;
                depth += 1;
            }
            Event::Empty(_) => root_seen = true,
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    FeedError::Parse(format!(
                        "unmatched closing tag at byte {}",
                        reader.buffer_position()
                    ))
                })?;
            }
            Event::Text(text) if depth == 0 => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(FeedError::Parse(format!(
                        "text outside the root element at byte {}",
                        reader.buffer_position()
                    )));
                }
            }
            Event::GeneralRef(reference) => {
                if reference.is_char_ref() {
                    reference
                        .resolve_char_ref()
                        .map_err(|err| FeedError::Parse(format!("invalid character reference: {}", err)))?;
                } else {
                    let name = reference
                        .decode()
                        .map_err(|err| FeedError::Parse(err.to_string()))?;
                    if resolve_xml_entity(&name).is_none() {
                        return Err(FeedError::Parse(format!("undefined entity &{};", name)));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(FeedError::Parse(format!(
            "document ended with {} unclosed element(s)",
            depth
        )));
    }
    if !root_seen {
        return Err(FeedError::Parse("document has no root element".to_string()));
    }
    Ok(())
}

/// Derives the calendar date for an entry.
///
/// The issue date in the link wins because it names the digest's day regardless of
/// when it was published; otherwise the publication (or update) time in UTC is used.
pub fn derive_date(link: &str, entry: &Entry) -> Option<(NaiveDate, DateSource)> {
    if let Some(date) = extract_date_from_link(link) {
        return Some((date, DateSource::Link));
    }
    entry
        .published
        .or(entry.updated)
        .map(|dt| (dt.date_naive(), DateSource::PubDate))
}

fn convert_entry(entry: Entry) -> Option<FeedEntry> {
    let link = entry
        .links
        .first()
        .map(|link| link.href.clone())
        .unwrap_or_default();
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_default();

    let Some((published_date, date_source)) = derive_date(&link, &entry) else {
        debug!(target: TARGET_FEED_PARSE, "No date for entry {:?} ({})", title, link);
        return None;
    };

    let description = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .unwrap_or_default();

    let summary_text = entry
        .content
        .as_ref()
        .and_then(|c| c.body.clone())
        .filter(|body| !body.is_empty())
        .or_else(|| Some(description.clone()).filter(|d| !d.is_empty()))
        .unwrap_or_else(|| title.clone());

    Some(FeedEntry {
        published_date,
        title,
        link,
        guid: entry.id.clone(),
        description,
        summary_text,
        pub_date: entry.published.or(entry.updated).map(|dt| dt.to_rfc2822()),
        date_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rss::util::decode_body;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>AI News</title>
    <link>https://news.smol.ai/</link>
    <description>AI news digests</description>
    <item>
      <title>not much happened today</title>
      <link>https://news.smol.ai/issues/26-01-13-not-much/</link>
      <guid>https://news.smol.ai/issues/26-01-13-not-much</guid>
      <pubDate>Tue, 13 Jan 2026 23:30:00 -0800</pubDate>
      <description>Short summary &amp; more</description>
      <content:encoded><![CDATA[<p>Full body</p>]]></content:encoded>
    </item>
    <item>
      <title>Model launch day</title>
      <link>https://news.smol.ai/posts/model-launch/</link>
      <guid>launch-2026-01-12</guid>
      <pubDate>Mon, 12 Jan 2026 22:00:00 -0800</pubDate>
      <description>Launch recap</description>
    </item>
    <item>
      <title>Undated note</title>
      <link>https://news.smol.ai/notes/undated/</link>
      <guid>undated-note</guid>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_keeps_feed_order_and_fields() {
        let parsed = parse_feed(SAMPLE_FEED).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.undated, 1);

        let first = &parsed.entries[0];
        assert_eq!(first.title, "not much happened today");
        assert_eq!(first.link, "https://news.smol.ai/issues/26-01-13-not-much/");
        assert_eq!(first.guid, "https://news.smol.ai/issues/26-01-13-not-much");
        assert_eq!(first.description, "Short summary & more");
        assert_eq!(first.summary_text, "<p>Full body</p>");
        assert_eq!(first.published_date, date(2026, 1, 13));
        assert_eq!(first.date_source, DateSource::Link);
        assert!(first.pub_date.is_some());

        let second = &parsed.entries[1];
        assert_eq!(second.title, "Model launch day");
        assert_eq!(second.summary_text, "Launch recap");
    }

    #[test]
    fn test_pub_date_is_normalized_to_utc() {
        let parsed = parse_feed(SAMPLE_FEED).unwrap();
        // 22:00 -08:00 on the 12th is 06:00 UTC on the 13th.
        let second = &parsed.entries[1];
        assert_eq!(second.published_date, date(2026, 1, 13));
        assert_eq!(second.date_source, DateSource::PubDate);
    }

    #[test]
    fn test_link_date_wins_over_pub_date() {
        let parsed = parse_feed(SAMPLE_FEED).unwrap();
        // pubDate is 07:30 UTC on the 14th, the link says the 13th.
        assert_eq!(parsed.entries[0].published_date, date(2026, 1, 13));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_feed(SAMPLE_FEED).unwrap();
        let second = parse_feed(SAMPLE_FEED).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let broken = r#"<rss version="2.0"><channel><item><title>oops</item></channel></rss>"#;
        let err = parse_feed(broken).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_missing_root_close_is_parse_error() {
        let truncated = r#"<rss version="2.0"><channel><title>t</title>
            <item>
              <title>a</title>
              <link>https://news.smol.ai/issues/26-01-10-a/</link>
            </item>
        </channel>"#;
        let err = parse_feed(truncated).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("unclosed"), "{}", err);
    }

    #[test]
    fn test_content_after_root_is_parse_error() {
        let trailing = r#"<rss version="2.0"><channel><title>t</title>
            <item>
              <title>a</title>
              <link>https://news.smol.ai/issues/26-01-10-a/</link>
            </item>
        </channel></rss><garbage"#;
        assert!(parse_feed(trailing).unwrap_err().is_parse());

        let second_root = r#"<rss version="2.0"><channel><title>t</title></channel></rss><rss/>"#;
        assert!(parse_feed(second_root).unwrap_err().is_parse());
    }

    #[test]
    fn test_undefined_entity_is_parse_error() {
        let feed = r#"<rss version="2.0"><channel><title>t</title>
            <item>
              <title>a &bogus; x</title>
              <link>https://news.smol.ai/issues/26-01-10-a/</link>
            </item>
        </channel></rss>"#;
        let err = parse_feed(feed).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("&bogus;"), "{}", err);
    }

    #[test]
    fn test_predefined_and_numeric_entities_are_accepted() {
        let feed = r#"<rss version="2.0"><channel><title>t</title>
            <item>
              <title>Q&amp;A &lt;live&gt; &#8212; &#x41;</title>
              <link>https://news.smol.ai/issues/26-01-10-a/</link>
              <guid>qa</guid>
            </item>
        </channel></rss>"#;
        let parsed = parse_feed(feed).unwrap();
        assert!(parsed.entries[0].title.starts_with("Q&A <live>"));
    }

    #[test]
    fn test_missing_guid_falls_back_to_link() {
        let feed = r#"<rss version="2.0"><channel><title>t</title>
            <item>
              <title>No guid</title>
              <link>https://news.smol.ai/issues/26-01-13-a/</link>
            </item>
        </channel></rss>"#;
        let parsed = parse_feed(feed).unwrap();
        assert_eq!(parsed.entries[0].guid, "https://news.smol.ai/issues/26-01-13-a/");
    }

    #[test]
    fn test_latin1_declared_feed_decodes() {
        let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?>
<rss version="2.0"><channel><title>t</title>
  <item>
    <title>Caf"#
            .to_vec();
        bytes.push(0xe9);
        bytes.extend_from_slice(
            br#" news</title>
    <link>https://news.smol.ai/issues/26-01-10-cafe/</link>
    <guid>cafe</guid>
  </item>
</channel></rss>"#,
        );

        let body = decode_body(&bytes, Some("application/rss+xml"));
        let parsed = parse_feed(&body).unwrap();
        assert_eq!(parsed.entries[0].title, "Café news");
    }

    #[test]
    fn test_non_feed_document_is_parse_error() {
        let err = parse_feed("this is not a feed").unwrap_err();
        assert!(err.is_parse());

        let err = parse_feed("").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_content_falls_back_to_title() {
        let feed = r#"<rss version="2.0"><channel><title>t</title>
            <item>
              <title>Title only</title>
              <link>https://news.smol.ai/issues/26-01-10-title-only/</link>
              <guid>t1</guid>
            </item>
        </channel></rss>"#;
        let parsed = parse_feed(feed).unwrap();
        assert_eq!(parsed.entries[0].summary_text, "Title only");
        assert_eq!(parsed.entries[0].description, "");
        assert_eq!(parsed.entries[0].pub_date, None);
    }

    #[test]
    fn test_leading_bom_is_tolerated() {
        let with_bom = format!("\u{FEFF}\n{}", SAMPLE_FEED);
        assert_eq!(parse_feed(&with_bom).unwrap().entries.len(), 2);
    }
}
