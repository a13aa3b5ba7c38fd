use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::logging::LogDestination;

/// Scrape keyword-matching live stream URLs from a web page into a text file.
#[derive(Parser, Debug, Default)]
#[command(name = "cctv_scraper", version)]
pub struct Cli {
    /// RON config file; flags given here override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Page to scrape; repeat to add fallbacks in priority order
    #[arg(short, long = "endpoint")]
    pub endpoints: Vec<String>,

    /// Channel keyword, matched case-insensitively
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Accepted stream URL pattern: `.ext` suffix or scheme prefix such as `rtmp`; repeatable
    #[arg(short, long = "pattern")]
    pub patterns: Vec<String>,

    /// Attempts per endpoint before moving on
    #[arg(long)]
    pub retries: Option<u32>,

    /// Seconds to wait after a failed attempt
    #[arg(long)]
    pub retry_delay_secs: Option<u64>,

    /// Whole-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the raw response as debug_<timestamp>.html in this directory
    #[arg(long)]
    pub debug_dir: Option<PathBuf>,

    /// Add `date=` to each endpoint; before this hour the previous day is requested
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    pub date_cutoff_hour: Option<u32>,

    /// Commit and push the output even outside CI
    #[arg(long)]
    pub publish: bool,

    /// Also write logs to ./scraper.log
    #[arg(long)]
    pub log_file: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a JSON run summary on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_file {
            LogDestination::Both
        } else {
            LogDestination::Terminal
        }
    }
}
