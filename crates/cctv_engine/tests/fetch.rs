use std::time::Duration;

use cctv_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_ACCEPT_LANGUAGE};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetcher_returns_body_and_sends_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>CCTV-1</html>", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("client");
    let url = format!("{}/list", server.uri());

    let result = fetcher.fetch(&url).await.expect("fetch ok");
    assert_eq!(result.body, "<html>CCTV-1</html>");
    assert_eq!(result.metadata.original_url, url);
    assert_eq!(result.metadata.final_url, url);
    assert_eq!(result.metadata.status, 200);
    assert_eq!(result.metadata.encoding_label, "UTF-8");

    let requests = server.received_requests().await.unwrap();
    let headers = &requests[0].headers;
    let ua = headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(ua.starts_with("Mozilla/5.0"));
    let lang = headers.get("accept-language").unwrap().to_str().unwrap();
    assert_eq!(lang, DEFAULT_ACCEPT_LANGUAGE);
}

#[tokio::test]
async fn fetcher_decodes_declared_charset() {
    let server = MockServer::start().await;
    // "央视" in GBK
    let body: Vec<u8> = vec![0xD1, 0xEB, 0xCA, 0xD3];
    Mock::given(method("GET"))
        .and(path("/gbk"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=gbk"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let result = fetcher.fetch(&format!("{}/gbk", server.uri())).await.unwrap();
    assert_eq!(result.body, "央视");
    assert_eq!(result.metadata.encoding_label, "GBK");
}

#[tokio::test]
async fn non_success_status_is_a_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher
        .fetch(&format!("{}/blocked", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let err = fetcher
        .fetch(&format!("{}/large", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn malformed_url_is_rejected_without_network() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher.fetch("not a url").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
