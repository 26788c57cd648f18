use std::env;
use std::path::PathBuf;
use tokio::time::Duration;
use tracing::warn;

use crate::rss::{DEFAULT_RSS_URL, REQUEST_TIMEOUT};

pub const RSS_URL_ENV: &str = "AI_DAILY_RSS_URL";
pub const TIMEOUT_ENV: &str = "AI_DAILY_TIMEOUT_SECS";
pub const LOG_DIR_ENV: &str = "AI_DAILY_LOG_DIR";

/// Settings for a single fetch of the news feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub rss_url: String,
    pub timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            rss_url: DEFAULT_RSS_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl FeedConfig {
    /// Builds the configuration from `AI_DAILY_RSS_URL` and `AI_DAILY_TIMEOUT_SECS`,
    /// falling back to the defaults for anything unset or unusable.
    pub fn from_env() -> Self {
        Self::from_values(
            get_env_var(RSS_URL_ENV).as_deref(),
            get_env_var(TIMEOUT_ENV).as_deref(),
        )
    }

    fn from_values(rss_url: Option<&str>, timeout_secs: Option<&str>) -> Self {
        let mut config = Self::default();

        if let Some(url) = rss_url {
            config.rss_url = url.to_string();
        }

        if let Some(raw) = timeout_secs {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(
                    "Ignoring invalid {} value {:?}, using {} seconds",
                    TIMEOUT_ENV,
                    raw,
                    config.timeout.as_secs()
                ),
            }
        }

        config
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.rss_url = url;
        }
        self
    }
}

/// Directory for the rolling file log, if one was requested.
pub fn log_dir() -> Option<PathBuf> {
    get_env_var(LOG_DIR_ENV).map(PathBuf::from)
}

/// Retrieves an environment variable, treating empty or whitespace-only values as unset.
pub fn get_env_var(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
