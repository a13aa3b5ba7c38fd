mod common;

use std::time::Duration;

use cctv_engine::{fetch_first_available, RetryPolicy};
use common::ScriptedFetcher;
use pretty_assertions::assert_eq;

fn no_delay(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn falls_back_to_next_endpoint_after_retries() {
    scrape_logging::initialize_for_tests();
    let fetcher = ScriptedFetcher::new().with_page("http://second/", "<html>ok</html>");
    let endpoints = ["http://first/", "http://second/"];

    let result = fetch_first_available(&fetcher, &endpoints, &no_delay(3)).await;

    let result = result.expect("second endpoint answers");
    assert_eq!(result.body, "<html>ok</html>");
    assert_eq!(result.metadata.final_url, "http://second/");
    assert_eq!(
        fetcher.calls(),
        vec!["http://first/", "http://first/", "http://first/", "http://second/"]
    );
}

#[tokio::test]
async fn stops_at_first_success() {
    let fetcher = ScriptedFetcher::new()
        .with_page("http://first/", "one")
        .with_page("http://second/", "two");
    let endpoints = ["http://first/", "http://second/"];

    let result = fetch_first_available(&fetcher, &endpoints, &no_delay(3)).await;
    assert_eq!(result.unwrap().body, "one");
    assert_eq!(fetcher.calls(), vec!["http://first/"]);
}

#[tokio::test]
async fn exhausting_all_endpoints_yields_none() {
    let fetcher = ScriptedFetcher::new();
    let endpoints = ["http://a/", "http://b/"];

    let result = fetch_first_available(&fetcher, &endpoints, &no_delay(2)).await;
    assert!(result.is_none());
    assert_eq!(fetcher.calls().len(), 4);
}

#[tokio::test]
async fn zero_attempts_still_tries_once() {
    let fetcher = ScriptedFetcher::new();
    let result = fetch_first_available(&fetcher, &["http://a/"], &no_delay(0)).await;
    assert!(result.is_none());
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test]
async fn delay_is_applied_between_attempts() {
    let fetcher = ScriptedFetcher::new().with_page("http://b/", "ok");
    let policy = RetryPolicy {
        max_attempts: 2,
        delay: Duration::from_millis(20),
    };
    let started = std::time::Instant::now();
    let result = fetch_first_available(&fetcher, &["http://a/", "http://b/"], &policy).await;
    assert!(result.is_some());
    // two failures on the first endpoint, each followed by a pause
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[test]
fn worst_case_delay_is_bounded() {
    let policy = RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_secs(5),
    };
    assert_eq!(policy.worst_case_delay(2), Duration::from_secs(30));
}
