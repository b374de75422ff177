#![allow(clippy::unwrap_used)]
// Cadence and completion-order tests, driven by paused tokio time.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use url::Url;

use parkwatch_core::{
    DisplayBoard, DisplayTarget, PollerConfig, StalePolicy, StatusPoller, StatusSource,
};

use common::{Reply, ScriptedSource, snapshot};

fn config() -> PollerConfig {
    PollerConfig::new(Url::parse("http://parking.test").unwrap())
        .with_poll_interval(Duration::from_millis(1000))
}

fn poller<S: StatusSource>(source: S, config: PollerConfig) -> (StatusPoller<S>, Arc<DisplayBoard>) {
    let board = Arc::new(DisplayBoard::new());
    let poller = StatusPoller::with_source(source, config, board.clone()).unwrap();
    (poller, board)
}

// ── Cadence ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_first_fetch_is_immediate() {
    let source = ScriptedSource::repeating(Duration::from_millis(10), snapshot(1, 1, "t"));
    let (poller, _board) = poller(source, config());

    let handle = poller.start();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(poller.stats().attempts, 1);
    assert_eq!(poller.stats().rendered, 1);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_attempt_count_follows_elapsed_intervals() {
    for (elapsed_ms, expected) in [(1500_u64, 2_u64), (4200, 5), (9900, 10)] {
        let source = ScriptedSource::repeating(Duration::from_millis(20), snapshot(1, 1, "t"));
        let (poller, _board) = poller(source, config());

        let handle = poller.start();
        tokio::time::sleep(Duration::from_millis(elapsed_ms)).await;
        handle.stop().await;

        assert_eq!(
            poller.stats().attempts,
            expected,
            "after {elapsed_ms}ms expected {expected} attempts"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_requests_do_not_delay_the_cadence() {
    // Every response takes 2.5 intervals.
    let source = ScriptedSource::repeating(Duration::from_millis(2500), snapshot(2, 8, "t"));
    let calls = source.calls();
    let (poller, board) = poller(source, config());

    let handle = poller.start();
    tokio::time::sleep(Duration::from_millis(3500)).await;

    let stats = poller.stats();
    assert_eq!(stats.attempts, 4);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert!(stats.in_flight() >= 2, "overlapping requests expected: {stats:?}");
    assert_eq!(board.text(DisplayTarget::Available), "8");

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_hung_request_does_not_block_later_ticks() {
    // First request never answers; the second one does.
    let source = ScriptedSource::new()
        .then(u64::MAX / 4, Reply::Snapshot(snapshot(99, 99, "never")))
        .then(50, Reply::Snapshot(snapshot(6, 14, "2024-01-01T12:00:01Z")));
    let (poller, board) = poller(source, config());

    let handle = poller.start();
    tokio::time::sleep(Duration::from_millis(1200)).await;

    assert_eq!(board.text(DisplayTarget::Occupied), "6");
    assert_eq!(poller.stats().in_flight(), 1);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failures_do_not_stop_the_loop() {
    let source = ScriptedSource::new()
        .then(10, Reply::Status(500))
        .then(10, Reply::Snapshot(snapshot(3, 17, "2024-01-01T12:00:00Z")));
    let (poller, board) = poller(source, config());

    let handle = poller.start();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let stats = poller.stats();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.rendered, 1);
    assert_eq!(board.text(DisplayTarget::Occupied), "3");
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_ends_ticking() {
    let source = ScriptedSource::repeating(Duration::from_millis(10), snapshot(1, 1, "t"));
    let (poller, _board) = poller(source, config());

    let handle = poller.start();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    handle.stop().await;

    let before = poller.stats().attempts;
    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(poller.stats().attempts, before);
}

// ── Completion order ────────────────────────────────────────────────

/// Tick 0 is slow (1500ms), tick 1 is fast (100ms): tick 1 lands at
/// t=1100, tick 0 at t=1500.
fn out_of_order_source() -> ScriptedSource {
    ScriptedSource::new()
        .then(1500, Reply::Snapshot(snapshot(1, 19, "t0")))
        .then(100, Reply::Snapshot(snapshot(2, 18, "t1")))
}

#[tokio::test(start_paused = true)]
async fn test_late_response_overwrites_newer_by_default() {
    let (poller, board) = poller(out_of_order_source(), config());

    let handle = poller.start();

    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert_eq!(board.text(DisplayTarget::LastUpdated), "t1");

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(board.text(DisplayTarget::LastUpdated), "t0");
    assert_eq!(board.text(DisplayTarget::Occupied), "1");
    assert_eq!(poller.stats().discarded, 0);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_discard_stale_keeps_newest_response() {
    let cfg = config().with_stale_policy(StalePolicy::DiscardStale);
    let (poller, board) = poller(out_of_order_source(), cfg);

    let handle = poller.start();

    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert_eq!(board.text(DisplayTarget::LastUpdated), "t1");

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(board.text(DisplayTarget::LastUpdated), "t1");
    assert_eq!(poller.stats().discarded, 1);

    handle.stop().await;
}
