use ai_daily::environment::{self, FeedConfig};
use ai_daily::logging;
use ai_daily::rss;
use anyhow::Result;
use colored::Colorize;
use std::env;
use std::process;

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging(environment::log_dir().as_deref());

    let args: Vec<String> = env::args().collect();
    if args.iter().skip(1).any(|arg| arg == "--help" || arg == "-h") {
        print_usage(&args[0]);
        return Ok(());
    }

    let config = FeedConfig::from_env().with_url(args.get(1).cloned());
    println!("Testing RSS feed: {}", config.rss_url);

    let body = match rss::fetch_feed_document(&config).await {
        Ok(body) => body,
        Err(err) => {
            eprintln!("{}: {}", "Fetch failed".bright_red(), err);
            process::exit(1);
        }
    };

    let parsed = match rss::parse_feed(&body) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{}: {}", "Parse failed".bright_red(), err);
            let preview: String = body.chars().take(200).collect();
            println!("\n{}", "Decoded Content Preview".bright_blue());
            println!("{}", "─".repeat(80).dimmed());
            println!("{}", preview);
            process::exit(1);
        }
    };
    let index = rss::FeedIndex::from_parsed(parsed);

    println!("\n{}", "═".repeat(100).bright_blue());
    println!(
        "{}  {}",
        "FEED DIAGNOSTICS".bright_blue(),
        config.rss_url.bright_yellow()
    );
    println!("{}", "═".repeat(100).bright_blue());

    println!("{}: {}", "Dated Entries".bright_blue(), index.len());
    let undated = index.undated().to_string();
    if index.undated() > 0 {
        println!("{}: {}", "Undated Entries".bright_blue(), undated.bright_yellow());
    } else {
        println!("{}: {}", "Undated Entries".bright_blue(), undated.dimmed());
    }

    match index.available_date_range() {
        Some((min, max)) => println!(
            "{}: {} .. {}",
            "Date Range".bright_blue(),
            min.to_string().bright_green(),
            max.to_string().bright_green()
        ),
        None => println!("{}: {}", "Date Range".bright_blue(), "None".dimmed()),
    }

    if let Some(latest) = index.latest_date() {
        let latest_count = index.lookup_by_date(latest).len();
        println!(
            "{}: {} ({} entries)",
            "Latest Issue".bright_blue(),
            latest.to_string().bright_green(),
            latest_count
        );
    }

    if !index.is_empty() {
        println!("\n{}", "Entries by Date".bright_green());
        println!("{}", "─".repeat(80).dimmed());
        for date in index.dates().collect::<Vec<_>>().into_iter().rev() {
            for entry in index.lookup_by_date(date) {
                println!(
                    "{} {} ({})\n   {}",
                    date.to_string().bright_white(),
                    entry.title.bright_white(),
                    entry.date_source.to_string().dimmed(),
                    entry.link.bright_cyan()
                );
            }
        }
    }

    println!("\n{}", "═".repeat(100).bright_blue());
    println!(
        "Feed test completed successfully with {} entries found",
        index.len()
    );
    Ok(())
}

fn print_usage(program_name: &str) {
    println!("Usage: {} [rss_url]", program_name);
    println!("\nWithout a URL the feed from AI_DAILY_RSS_URL (or the default) is tested.");
    println!("\nExamples:");
    println!("  {}", program_name);
    println!("  {} https://news.smol.ai/rss.xml", program_name);
}
