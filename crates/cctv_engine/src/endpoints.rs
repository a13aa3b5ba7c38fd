use chrono::{DateTime, Duration, FixedOffset, Timelike};
use url::Url;

pub const DEFAULT_ENDPOINTS: &[&str] = &["https://tonkiang.us/?s=CCTV", "https://tonkiang.us/"];

pub const DATE_QUERY_PARAM: &str = "date";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("no endpoints configured")]
    Empty,
    #[error("invalid endpoint {url}: {message}")]
    Invalid { url: String, message: String },
}

/// Optional `date=YYYY-MM-DD` query added to every endpoint.
///
/// Before `cutoff_hour` (local civil time) the previous day is requested,
/// otherwise the current day. Whether the target site honours the parameter
/// is unconfirmed, so this is off unless configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateQuery {
    pub cutoff_hour: u32,
}

impl DateQuery {
    pub fn date_for(&self, now: &DateTime<FixedOffset>) -> String {
        let day = if now.hour() < self.cutoff_hour {
            *now - Duration::days(1)
        } else {
            *now
        };
        day.format("%Y-%m-%d").to_string()
    }
}

/// Validate endpoints and apply the optional date query, keeping priority order.
pub fn build_endpoints(
    raw: &[String],
    date_query: Option<DateQuery>,
    now: &DateTime<FixedOffset>,
) -> Result<Vec<Url>, EndpointError> {
    if raw.is_empty() {
        return Err(EndpointError::Empty);
    }
    let date = date_query.map(|query| query.date_for(now));
    raw.iter()
        .map(|candidate| {
            let mut url = Url::parse(candidate.trim()).map_err(|err| EndpointError::Invalid {
                url: candidate.clone(),
                message: err.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(EndpointError::Invalid {
                    url: candidate.clone(),
                    message: format!("unsupported scheme {}", url.scheme()),
                });
            }
            if let Some(date) = date.as_deref() {
                url.query_pairs_mut().append_pair(DATE_QUERY_PARAM, date);
            }
            Ok(url)
        })
        .collect()
}
