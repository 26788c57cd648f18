use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::process;
use tracing::{debug, error};

use ai_daily::environment::{self, FeedConfig};
use ai_daily::logging;
use ai_daily::report;
use ai_daily::rss::{self, DateQuery, RelativeDay};

/// Fetch the AI news feed and print it, or one day of it, as JSON.
#[derive(Parser, Debug)]
#[command(name = "ai-daily", author, version, about, long_about = None)]
struct Cli {
    /// Show the earliest and latest dates available in the feed
    #[arg(long, conflicts_with_all = ["date", "relative"])]
    date_range: bool,

    /// Get the entries for a specific date (YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "relative")]
    date: Option<NaiveDate>,

    /// Get the entries for a date relative to today (UTC)
    #[arg(long, value_enum)]
    relative: Option<RelativeDay>,

    /// Feed URL, overriding AI_DAILY_RSS_URL
    #[arg(long)]
    url: Option<String>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::configure_logging(environment::log_dir().as_deref());

    let config = FeedConfig::from_env().with_url(cli.url);
    let query = DateQuery::from_selection(
        cli.date_range,
        cli.date,
        cli.relative,
        Utc::now().date_naive(),
    );
    debug!("Running {:?} against {}", query, config.rss_url);

    let pretty = !cli.compact;
    match rss::load_feed_index(&config).await {
        Ok(index) => {
            println!("{}", report::render_query(&index, query, pretty)?);
            Ok(())
        }
        Err(err) => {
            error!("Failed to load feed from {}: {}", config.rss_url, err);
            println!("{}", report::render_failure(&err, pretty)?);
            process::exit(1);
        }
    }
}
