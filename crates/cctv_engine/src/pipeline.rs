use std::path::PathBuf;
use std::sync::Arc;

use cctv_core::{dedupe_entries, RunOutcome};
use chrono::{DateTime, FixedOffset};
use scrape_logging::{scrape_error, scrape_info, scrape_warn};

use crate::clock::{format_timestamp, Clock};
use crate::debug_dump::dump_debug_body;
use crate::endpoints::{build_endpoints, DateQuery, DEFAULT_ENDPOINTS};
use crate::extract::Extractor;
use crate::output::{write_stream_file, WriteSummary, DEFAULT_OUTPUT_FILE};
use crate::publish::Publisher;
use crate::retry::{fetch_first_available, RetryPolicy};
use crate::Fetcher;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Tried in this order; the first one that answers wins.
    pub endpoints: Vec<String>,
    pub retry: RetryPolicy,
    pub date_query: Option<DateQuery>,
    pub output_path: PathBuf,
    /// Where raw bodies are saved; `None` disables the debug artifact.
    pub debug_dir: Option<PathBuf>,
    /// Hand the written file to the publisher (CI runs).
    pub publish: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            retry: RetryPolicy::default(),
            date_query: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            debug_dir: None,
            publish: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub started_at: DateTime<FixedOffset>,
    pub outcome: RunOutcome,
    /// Final URL of the response the entries came from.
    pub source_url: Option<String>,
    pub output: Option<WriteSummary>,
    pub debug_artifact: Option<PathBuf>,
    /// `None` when publishing was not attempted.
    pub published: Option<bool>,
}

/// One fetch -> extract -> dedupe -> write -> publish pass.
pub struct Scraper {
    config: ScraperConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Extractor,
    clock: Arc<dyn Clock>,
    publisher: Option<Box<dyn Publisher>>,
}

impl Scraper {
    pub fn new(
        config: ScraperConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Extractor,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            fetcher,
            extractor,
            clock,
            publisher: None,
        }
    }

    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Never fails: every problem is logged and degrades to an empty result.
    pub async fn run(&self) -> RunReport {
        let started_at = self.clock.now();
        let keyword = self.extractor.filter().keyword().to_string();
        scrape_info!("{} - starting {} stream scrape", format_timestamp(&started_at), keyword);

        let endpoints = match build_endpoints(&self.config.endpoints, self.config.date_query, &started_at) {
            Ok(endpoints) => endpoints,
            Err(err) => {
                scrape_error!("Endpoint configuration rejected: {}", err);
                Vec::new()
            }
        };
        scrape_info!(
            "{} endpoint(s), up to {} attempt(s) each",
            endpoints.len(),
            self.config.retry.attempts()
        );

        let fetched = fetch_first_available(self.fetcher.as_ref(), &endpoints, &self.config.retry).await;

        let mut debug_artifact = None;
        let mut source_url = None;
        let entries = match fetched {
            Some(result) => {
                if let Some(dir) = &self.config.debug_dir {
                    debug_artifact = dump_debug_body(dir, &started_at, &result.body);
                }
                let candidates = self
                    .extractor
                    .extract(&result.body, Some(&result.metadata.final_url));
                source_url = Some(result.metadata.final_url);
                candidates
            }
            None => Vec::new(),
        };

        let raw_count = entries.len();
        let outcome = RunOutcome::new(dedupe_entries(entries));
        scrape_info!(
            "Found {} {} stream(s) ({} before dedupe)",
            outcome.len(),
            keyword,
            raw_count
        );

        let output = match write_stream_file(&self.config.output_path, &outcome.entries, &started_at, &keyword) {
            Ok(summary) => Some(summary),
            Err(err) => {
                scrape_error!("{}", err);
                None
            }
        };

        let published = match (&output, &self.publisher) {
            (Some(summary), Some(publisher)) if self.config.publish => {
                match publisher.publish(&summary.path) {
                    Ok(()) => Some(true),
                    Err(err) => {
                        scrape_warn!("Publishing {:?} failed: {}", summary.path, err);
                        Some(false)
                    }
                }
            }
            _ => None,
        };

        RunReport {
            started_at,
            outcome,
            source_url,
            output,
            debug_artifact,
            published,
        }
    }
}
