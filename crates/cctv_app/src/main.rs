mod cli;
mod config;
mod logging;

use std::sync::Arc;

use anyhow::Result;
use cctv_engine::{
    format_timestamp, Clock, GitPublisher, ReqwestFetcher, RunReport, Scraper, SystemClock,
};
use clap::Parser;
use scrape_logging::scrape_info;
use serde_json::json;

use crate::cli::Cli;
use crate::config::{load_file_config, resolve, FileConfig, CI_ENV_VAR};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_destination(), cli.log_level());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::shanghai());
    scrape_info!("Current time (Asia/Shanghai): {}", format_timestamp(&clock.now()));

    let file = match &cli.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };
    let ci_env = std::env::var(CI_ENV_VAR).ok();
    let settings = resolve(&cli, file, ci_env.as_deref())?;

    let extractor = settings.extractor()?;
    let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch.clone())?);
    let publisher = GitPublisher::new(settings.filter.keyword(), clock.clone());

    let scraper = Scraper::new(settings.scraper, fetcher, extractor, clock)
        .with_publisher(Box::new(publisher));
    let report = scraper.run().await;

    if cli.json {
        println!("{}", report_json(&report));
    }
    Ok(())
}

fn report_json(report: &RunReport) -> serde_json::Value {
    json!({
        "started_at": format_timestamp(&report.started_at),
        "source_url": report.source_url,
        "found_any": report.outcome.found_any,
        "count": report.outcome.len(),
        "output": report.output.as_ref().map(|o| o.path.display().to_string()),
        "placeholder": report.output.as_ref().map(|o| o.placeholder),
        "debug_artifact": report.debug_artifact.as_ref().map(|p| p.display().to_string()),
        "published": report.published,
    })
}
