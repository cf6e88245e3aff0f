//! Integration tests for the trade client against a wiremock server.

use poe_trade_fetch::rate_limit::{RULES_HEADER, STATE_HEADER};
use poe_trade_fetch::{ClientError, Config, TradeClient};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/api/trade2/search/poe2/Standard";

fn search_body(ids: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "id": "query-1",
        "result": ids,
        "total": ids.len(),
    })
}

fn client_for(mock_server: &MockServer) -> TradeClient {
    let config = Config::for_testing(&mock_server.uri());
    TradeClient::new(config).unwrap()
}

#[tokio::test]
async fn test_end_to_end_fetch_in_search_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["a", "b"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/trade2/fetch/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "a"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/trade2/fetch/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "b"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let details = client.fetch_all().await.unwrap();

    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["id"], "a");
    assert_eq!(details[1]["id"], "b");

    // Each document must survive pretty-printing for the stdout emit.
    for detail in &details {
        assert!(serde_json::to_string_pretty(detail).unwrap().contains("\"id\""));
    }
}

#[tokio::test]
async fn test_search_posts_query_document() {
    let mock_server = MockServer::start().await;

    let expected = poe_trade_fetch::config::default_query();
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let (ids, _) = client.search().await.unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_session_cookie_sent_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(header("cookie", "POESESSID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.session = Some("abc123".to_string());

    let mut client = TradeClient::new(config).unwrap();
    client.search().await.unwrap();
}

#[tokio::test]
async fn test_session_cookie_adopted_from_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "POESESSID=served; Path=/")
                .set_body_json(search_body(&["a"])),
        )
        .mount(&mock_server)
        .await;

    // The fetch that follows must carry the cookie the server handed out.
    Mock::given(method("GET"))
        .and(path("/api/trade2/fetch/a"))
        .and(header("cookie", "POESESSID=served"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "a"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    assert!(client.session().is_none());

    let details = client.fetch_all().await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(client.session(), Some("served"));
}

#[tokio::test]
async fn test_non_success_status_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let err = client.fetch_all().await.unwrap_err();

    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_failure_aborts_mid_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["a", "b"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/trade2/fetch/a"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&mock_server)
        .await;

    // "b" is never requested once "a" fails.
    Mock::given(method("GET"))
        .and(path("/api/trade2/fetch/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "b"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let err = client.fetch_all().await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_rate_limit_headers_captured_from_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(RULES_HEADER, "5:10:60,2:5:30")
                .insert_header(STATE_HEADER, "1:2:0,0:0:0")
                .set_body_json(search_body(&[])),
        )
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let (_, snapshot) = client.search().await.unwrap();

    assert_eq!(snapshot.rules.len(), 2);
    assert_eq!(snapshot.state.len(), 2);
    assert_eq!(snapshot.rules[0].max_requests, 5);
    assert_eq!(snapshot.state[0].requests_used, 1);
    // Nothing exhausted, so no pause is owed.
    assert!(snapshot.pause_schedule().is_empty());
}

#[tokio::test]
async fn test_missing_rate_limit_headers_mean_no_constraint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[])))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let (_, snapshot) = client.search().await.unwrap();

    assert!(snapshot.rules.is_empty());
    assert!(snapshot.state.is_empty());
    assert!(snapshot.pause_schedule().is_empty());
}

#[tokio::test]
async fn test_malformed_rate_limit_headers_degrade_silently() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(RULES_HEADER, "not a rate limit")
                .insert_header(STATE_HEADER, "1:2")
                .set_body_json(search_body(&[])),
        )
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let (_, snapshot) = client.search().await.unwrap();

    assert!(snapshot.rules.is_empty());
    assert!(snapshot.state.is_empty());
    assert!(snapshot.pause_schedule().is_empty());
}
