use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use cctv_core::{StreamFilter, UrlPattern, MAX_LABEL_CHARS};
use cctv_engine::{
    build_endpoints, Clock, DateQuery, Extractor, FetchSettings, FlatLinkScan, RetryPolicy,
    ScraperConfig, StructuredScan, SystemClock, DEFAULT_CONTAINER_SELECTOR, DEFAULT_LINK_SELECTOR,
    DEFAULT_TITLE_SELECTOR,
};
use scrape_logging::scrape_info;
use serde::Deserialize;

use crate::cli::Cli;

pub const CI_ENV_VAR: &str = "GITHUB_ACTIONS";

/// Optional settings read from a RON file. Missing fields keep their defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub endpoints: Option<Vec<String>>,
    pub keyword: Option<String>,
    pub patterns: Option<Vec<String>>,
    pub max_attempts: Option<u32>,
    pub retry_delay_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub output: Option<PathBuf>,
    pub debug_dir: Option<PathBuf>,
    pub date_cutoff_hour: Option<u32>,
    pub max_label_chars: Option<usize>,
    pub container_selector: Option<String>,
    pub title_selector: Option<String>,
    pub link_selector: Option<String>,
    pub user_agent: Option<String>,
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}

/// Everything the run needs, after defaults, file and flags are merged.
pub struct Settings {
    pub scraper: ScraperConfig,
    pub fetch: FetchSettings,
    pub filter: StreamFilter,
    pub max_label_chars: usize,
    pub container_selector: Option<String>,
    pub title_selector: Option<String>,
    pub link_selector: Option<String>,
}

impl Settings {
    pub fn extractor(&self) -> Result<Extractor> {
        let structured = match (&self.container_selector, &self.title_selector) {
            (None, None) => StructuredScan::default(),
            (containers, titles) => StructuredScan::new(
                containers.as_deref().unwrap_or(DEFAULT_CONTAINER_SELECTOR),
                titles.as_deref().unwrap_or(DEFAULT_TITLE_SELECTOR),
            )?,
        };
        let flat = FlatLinkScan::new(
            self.link_selector
                .as_deref()
                .unwrap_or(DEFAULT_LINK_SELECTOR),
        )?;
        Ok(Extractor::with_strategies(
            self.filter.clone(),
            vec![Box::new(structured), Box::new(flat)],
        )
        .with_max_label_chars(self.max_label_chars))
    }
}

pub fn is_ci(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Merge defaults, the optional config file and command-line flags (highest priority).
pub fn resolve(cli: &Cli, file: FileConfig, ci_env: Option<&str>) -> Result<Settings> {
    let defaults = ScraperConfig::default();
    let mut fetch = FetchSettings::default();

    let endpoints = if !cli.endpoints.is_empty() {
        cli.endpoints.clone()
    } else {
        file.endpoints.unwrap_or(defaults.endpoints)
    };

    let filter_defaults = StreamFilter::default();
    let keyword = cli
        .keyword
        .clone()
        .or(file.keyword)
        .unwrap_or_else(|| filter_defaults.keyword().to_string());
    let raw_patterns = if !cli.patterns.is_empty() {
        Some(cli.patterns.clone())
    } else {
        file.patterns
    };
    let patterns = match raw_patterns {
        Some(raw) => {
            let parsed: Vec<UrlPattern> = raw.iter().filter_map(|p| UrlPattern::parse(p)).collect();
            if parsed.is_empty() {
                bail!("no usable url patterns in {raw:?}");
            }
            parsed
        }
        None => filter_defaults.patterns().to_vec(),
    };

    let retry = RetryPolicy {
        max_attempts: cli
            .retries
            .or(file.max_attempts)
            .unwrap_or(defaults.retry.max_attempts),
        delay: cli
            .retry_delay_secs
            .or(file.retry_delay_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.retry.delay),
    };

    if let Some(secs) = cli.timeout_secs.or(file.timeout_secs) {
        fetch.request_timeout = Duration::from_secs(secs);
    }
    if let Some(agent) = file.user_agent {
        fetch.user_agent = agent;
    }

    let date_cutoff_hour = cli.date_cutoff_hour.or(file.date_cutoff_hour);
    if let Some(hour) = date_cutoff_hour {
        if hour > 23 {
            bail!("date cutoff hour must be 0-23, got {hour}");
        }
    }
    let date_query = date_cutoff_hour.map(|cutoff_hour| DateQuery { cutoff_hour });

    // Fail at startup rather than mid-run on a malformed endpoint list.
    let now = SystemClock::shanghai().now();
    build_endpoints(&endpoints, date_query, &now).context("invalid endpoint configuration")?;

    let publish = cli.publish || is_ci(ci_env);
    if publish {
        scrape_info!("Publishing enabled");
    }

    let scraper = ScraperConfig {
        endpoints,
        retry,
        date_query,
        output_path: cli.output.clone().or(file.output).unwrap_or(defaults.output_path),
        debug_dir: cli.debug_dir.clone().or(file.debug_dir),
        publish,
    };

    Ok(Settings {
        scraper,
        fetch,
        filter: StreamFilter::new(keyword, patterns),
        max_label_chars: file.max_label_chars.unwrap_or(MAX_LABEL_CHARS),
        container_selector: file.container_selector,
        title_selector: file.title_selector,
        link_selector: file.link_selector,
    })
}
