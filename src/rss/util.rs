//! Utility functions for RSS feed processing.

use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};
use flate2::read::GzDecoder;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::io::Read;
use tracing::{debug, warn};

use crate::TARGET_WEB_REQUEST;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

lazy_static! {
    // Issue links look like https://news.smol.ai/issues/26-01-13-not-much/
    static ref ISSUE_DATE: Regex =
        Regex::new(r"/issues/(\d{4}|\d{2})-(\d{2})-(\d{2})-").expect("valid issue date pattern");
    static ref XML_DECL_ENCODING: Regex =
        Regex::new(r#"^(\s*<\?xml\s[^>]*?\bencoding\s*=\s*)["']([A-Za-z0-9._:-]+)["']"#)
            .expect("valid xml declaration pattern");
}

/// Helper function to validate a URL
pub fn is_valid_url(url: &str) -> bool {
    if let Ok(parsed) = url::Url::parse(url) {
        parsed.scheme() == "http" || parsed.scheme() == "https"
    } else {
        false
    }
}

/// Extracts the issue date from a digest link, expanding two-digit years to 20YY.
///
/// Returns `None` when the link has no issue segment or the digits are not a real
/// calendar date.
pub fn extract_date_from_link(link: &str) -> Option<NaiveDate> {
    let caps = ISSUE_DATE.captures(link)?;
    let year = &caps[1];
    let year: i32 = if year.len() == 2 {
        2000 + year.parse::<i32>().ok()?
    } else {
        year.parse().ok()?
    };
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Pulls the `charset=` parameter out of a Content-Type header value.
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .map(str::trim)
        .find(|part| part.to_ascii_lowercase().starts_with("charset="))
        .and_then(|part| part.split('=').nth(1))
        .map(|charset| charset.trim().trim_matches('"'))
        .filter(|charset| !charset.is_empty())
}

/// Reads the `encoding` pseudo-attribute of a leading `<?xml ...?>` declaration.
pub fn encoding_from_xml_declaration(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    XML_DECL_ENCODING
        .captures(&head)
        .map(|caps| caps[2].to_string())
}

/// Turns a response body into text.
///
/// Gzip payloads the server forgot to label are inflated first. The charset named
/// in the Content-Type header wins, then the encoding in the XML declaration, then
/// UTF-8; a byte order mark takes precedence over all of them. The returned text is
/// UTF-8, so its XML declaration is rewritten to say so.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let bytes: Cow<'_, [u8]> = if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        match GzDecoder::new(bytes).read_to_end(&mut decoded) {
            Ok(_) if !decoded.is_empty() => {
                debug!(target: TARGET_WEB_REQUEST, "Inflated unlabeled gzip body ({} -> {} bytes)", bytes.len(), decoded.len());
                Cow::Owned(decoded)
            }
            _ => Cow::Borrowed(bytes),
        }
    } else {
        Cow::Borrowed(bytes)
    };

    let encoding = content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| {
            encoding_from_xml_declaration(&bytes)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        warn!(target: TARGET_WEB_REQUEST, "Feed body contained bytes invalid for {}, replaced", used.name());
    }
    XML_DECL_ENCODING
        .replace(&text, "${1}\"UTF-8\"")
        .into_owned()
}
