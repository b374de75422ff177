// Shared test doubles for the poller integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use parkwatch_core::{StatusSnapshot, StatusSource};

pub fn snapshot(occupied: i64, available: i64, last_updated: &str) -> StatusSnapshot {
    StatusSnapshot {
        occupied,
        available,
        last_updated: last_updated.into(),
    }
}

// ── Scripted source ─────────────────────────────────────────────────

pub enum Reply {
    Snapshot(StatusSnapshot),
    Status(u16),
}

struct Step {
    delay: Duration,
    reply: Reply,
}

/// A status source that plays back replies with per-call latency.
///
/// Once the script runs out, calls either repeat the fallback or hang
/// forever (like a request the server never answers).
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Step>>,
    fallback: Option<(Duration, StatusSnapshot)>,
    calls: Arc<AtomicU64>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call answers `snap` after `delay`.
    pub fn repeating(delay: Duration, snap: StatusSnapshot) -> Self {
        Self {
            fallback: Some((delay, snap)),
            ..Self::default()
        }
    }

    pub fn then(self, delay_ms: u64, reply: Reply) -> Self {
        self.script.lock().unwrap().push_back(Step {
            delay: Duration::from_millis(delay_ms),
            reply,
        });
        self
    }

    pub fn calls(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.calls)
    }
}

impl StatusSource for ScriptedSource {
    async fn fetch_status(&self) -> Result<StatusSnapshot, parkwatch_api::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().unwrap().pop_front();

        let (delay, reply) = match (step, &self.fallback) {
            (Some(step), _) => (step.delay, step.reply),
            (None, Some((delay, snap))) => (*delay, Reply::Snapshot(snap.clone())),
            (None, None) => return std::future::pending().await,
        };

        tokio::time::sleep(delay).await;
        match reply {
            Reply::Snapshot(snap) => Ok(snap),
            Reply::Status(status) => Err(parkwatch_api::Error::Status {
                status,
                body: String::new(),
            }),
        }
    }

    fn endpoint(&self) -> &str {
        "scripted://status"
    }
}

// ── Log capture ─────────────────────────────────────────────────────

/// Collects WARN and ERROR messages emitted by `parkwatch_core`.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<String>>>);

impl CapturedLogs {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn layer(&self) -> CaptureLayer {
        CaptureLayer(self.clone())
    }
}

pub struct CaptureLayer(CapturedLogs);

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > Level::WARN || !meta.target().starts_with("parkwatch_core") {
            return;
        }
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        (self.0).0.lock().unwrap().push(visitor.0);
    }
}
