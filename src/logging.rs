use std::io;
use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_STDERR_FILTER: &str = "warn,web_request=warn,feed_parse=warn";
const DEFAULT_FILE_FILTER: &str = "info,web_request=debug,feed_parse=debug";

/// Installs the global subscriber.
///
/// Stdout carries the JSON payload for the calling agent, so console logs go to
/// stderr. `RUST_LOG` replaces the default console filter. When `log_dir` is set
/// a daily rolling `ai-daily.log` is written there as well.
pub fn configure_logging(log_dir: Option<&Path>) {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_STDERR_FILTER));

    let stderr_log = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(stderr_filter);

    let file_log = log_dir.map(|dir| {
        let file_appender = rolling::daily(dir, "ai-daily.log");
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_filter(EnvFilter::new(DEFAULT_FILE_FILTER))
    });

    tracing_subscriber::Registry::default()
        .with(stderr_log)
        .with(file_log)
        .init();
}
