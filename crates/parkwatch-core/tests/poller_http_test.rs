#![allow(clippy::unwrap_used)]
// End-to-end poller tests against a wiremock status server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parkwatch_core::{
    BoardState, CoreError, DisplayBoard, FailureKind, PollOutcome, PollerConfig, StatusPoller,
    fetch_once,
};

use common::CapturedLogs;

// ── Helpers ─────────────────────────────────────────────────────────

fn placeholder() -> BoardState {
    BoardState {
        occupied: "5".into(),
        available: "10".into(),
        last_updated: "2023-12-31 23:59:00".into(),
    }
}

async fn setup() -> (MockServer, Arc<DisplayBoard>, StatusPoller) {
    let server = MockServer::start().await;
    let board = Arc::new(DisplayBoard::with_state(placeholder()));
    let config = PollerConfig::new(Url::parse(&server.uri()).unwrap());
    let poller = StatusPoller::new(config, board.clone()).unwrap();
    (server, board, poller)
}

async fn respond_with(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(template)
        .mount(server)
        .await;
}

// ── Rendering ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_renders_well_formed_snapshot() {
    let (server, board, poller) = setup().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "occupied": 3,
            "available": 17,
            "last_updated": "2024-01-01T12:00:00Z"
        })),
    )
    .await;

    let outcome = poller.fetch_and_render().await;

    assert_eq!(outcome, PollOutcome::Rendered);
    assert_eq!(
        board.state(),
        BoardState {
            occupied: "3".into(),
            available: "17".into(),
            last_updated: "2024-01-01T12:00:00Z".into(),
        }
    );
}

#[tokio::test]
async fn test_repeated_poll_is_idempotent() {
    let (server, board, poller) = setup().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "occupied": 8,
            "available": 2,
            "last_updated": "2024-03-10 14:22:05"
        })),
    )
    .await;

    poller.fetch_and_render().await;
    let after_one = board.state();
    poller.fetch_and_render().await;

    assert_eq!(board.state(), after_one);
    assert_eq!(poller.stats().rendered, 2);
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_leaves_display_and_logs_once() {
    let (server, board, poller) = setup().await;
    respond_with(&server, ResponseTemplate::new(500)).await;

    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(logs.layer()));

    let outcome = poller.fetch_and_render().await;

    assert_eq!(outcome, PollOutcome::Failed(FailureKind::Status));
    assert_eq!(board.state(), placeholder());

    let messages = logs.messages();
    assert_eq!(messages.len(), 1, "expected one log entry, got {messages:?}");
    assert!(messages[0].contains("error fetching parking status"));
}

#[tokio::test]
async fn test_malformed_json_leaves_display_and_logs_once() {
    let (server, board, poller) = setup().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_string("{\"occupied\": 3, \"avail"),
    )
    .await;

    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(logs.layer()));

    let outcome = poller.fetch_and_render().await;

    assert_eq!(outcome, PollOutcome::Failed(FailureKind::Body));
    assert_eq!(board.state(), placeholder());
    assert_eq!(logs.messages().len(), 1);
}

#[tokio::test]
async fn test_missing_field_is_a_body_failure() {
    let (server, board, poller) = setup().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "available": 17,
            "last_updated": "2024-01-01T12:00:00Z"
        })),
    )
    .await;

    let outcome = poller.fetch_and_render().await;

    assert_eq!(outcome, PollOutcome::Failed(FailureKind::Body));
    assert_eq!(board.state(), placeholder());
}

#[tokio::test]
async fn test_failure_after_success_keeps_last_good_snapshot() {
    let (server, board, poller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "occupied": 1,
            "available": 19,
            "last_updated": "2024-01-01T12:00:01Z"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    respond_with(&server, ResponseTemplate::new(502)).await;

    assert_eq!(poller.fetch_and_render().await, PollOutcome::Rendered);
    assert_eq!(
        poller.fetch_and_render().await,
        PollOutcome::Failed(FailureKind::Status)
    );

    assert_eq!(board.state().available, "19");
    assert_eq!(poller.stats().failed, 1);
}

// ── Loop & oneshot ──────────────────────────────────────────────────

#[tokio::test]
async fn test_started_loop_renders_immediately() {
    let (server, board, poller) = setup().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "occupied": 12,
            "available": 0,
            "last_updated": "2024-06-01 09:00:00"
        })),
    )
    .await;

    let mut updates = board.subscribe();
    let handle = poller.start();

    let state = tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.occupied, "12");
    assert!(handle.is_running());

    handle.stop().await;
    assert!(poller.stats().attempts >= 1);
}

#[tokio::test]
async fn test_fetch_once_returns_snapshot() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "occupied": 3,
            "available": 17,
            "last_updated": "2024-01-01T12:00:00Z"
        })),
    )
    .await;

    let config = PollerConfig::new(Url::parse(&server.uri()).unwrap());
    let snap = fetch_once(&config).await.unwrap();
    assert_eq!(snap.available, 17);
}

#[tokio::test]
async fn test_fetch_once_surfaces_failure() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(503)).await;

    let config = PollerConfig::new(Url::parse(&server.uri()).unwrap());
    let err = fetch_once(&config).await.unwrap_err();

    match err {
        CoreError::Fetch(failure) => assert_eq!(failure.status_code(), Some(503)),
        other @ CoreError::Config { .. } => panic!("expected fetch failure, got {other:?}"),
    }
}
