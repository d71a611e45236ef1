//! Batched status fetcher tests

use std::time::Duration;

use pretty_assertions::assert_eq;
use teamwatch_notifier::{FetchError, StatusFetcher, StatusSource};
use tests::fixtures::{session, status_entry};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(server: &MockServer) -> StatusFetcher {
    StatusFetcher::new(
        format!("{}/api/users/status", server.uri()),
        Duration::from_secs(2),
    )
    .expect("client")
}

#[tokio::test]
async fn test_returns_only_members_in_a_game() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/status"))
        .and(query_param("ids", "alice,bob,carol"))
        .and(query_param("withGameIds", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            status_entry("alice", Some("g1")),
            status_entry("bob", None),
            { "id": "carol", "playingId": "" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let sessions = fetcher(&server)
        .fetch_active(&["alice", "bob", "carol"])
        .await
        .unwrap();

    assert_eq!(sessions, vec![session("alice", "g1")]);
}

#[tokio::test]
async fn test_empty_batch_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let sessions = fetcher(&server).fetch_active(&[]).await.unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/status"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = fetcher(&server).fetch_active(&["alice"]).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(s) if s.as_u16() == 429));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>down</html>"))
        .mount(&server)
        .await;

    let err = fetcher(&server).fetch_active(&["alice"]).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let fetcher = StatusFetcher::new(
        format!("{}/api/users/status", server.uri()),
        Duration::from_millis(200),
    )
    .unwrap();

    let err = fetcher.fetch_active(&["alice"]).await.unwrap_err();
    assert!(err.is_timeout());
}
