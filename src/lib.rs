pub mod environment;
pub mod logging;
pub mod report;
pub mod rss;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_FEED_PARSE: &str = "feed_parse";
