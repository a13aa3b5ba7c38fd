use std::time::Duration;

use scrape_logging::{scrape_info, scrape_warn};

use crate::{FetchResult, Fetcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per endpoint, including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause after each failed attempt when another attempt follows.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Upper bound on time spent sleeping across all endpoints.
    pub fn worst_case_delay(&self, endpoint_count: usize) -> Duration {
        self.delay * self.attempts() * endpoint_count as u32
    }
}

/// Try each endpoint in order, retrying failures with a fixed delay.
///
/// Returns the first successful body and stops there. Exhausting every
/// endpoint is reported as `None`; errors are logged, not returned.
pub async fn fetch_first_available<S: AsRef<str>>(
    fetcher: &dyn Fetcher,
    endpoints: &[S],
    policy: &RetryPolicy,
) -> Option<FetchResult> {
    let attempts = policy.attempts();
    for (index, endpoint) in endpoints.iter().enumerate() {
        let endpoint = endpoint.as_ref();
        let is_last_endpoint = index + 1 == endpoints.len();
        for attempt in 1..=attempts {
            scrape_info!("Fetching {} (attempt {}/{})", endpoint, attempt, attempts);
            match fetcher.fetch(endpoint).await {
                Ok(result) => {
                    scrape_info!(
                        "Fetched {} bytes from {} ({})",
                        result.metadata.byte_len,
                        result.metadata.final_url,
                        result.metadata.encoding_label
                    );
                    return Some(result);
                }
                Err(err) => {
                    scrape_warn!(
                        "Fetch of {} failed on attempt {}/{}: {}",
                        endpoint,
                        attempt,
                        attempts,
                        err
                    );
                    let more_to_come = attempt < attempts || !is_last_endpoint;
                    if more_to_come && !policy.delay.is_zero() {
                        tokio::time::sleep(policy.delay).await;
                    }
                }
            }
        }
        if !is_last_endpoint {
            scrape_warn!("Giving up on {}; trying next endpoint", endpoint);
        }
    }
    scrape_warn!("All {} endpoint(s) exhausted without a response", endpoints.len());
    None
}
