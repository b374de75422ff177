// ── Status poller ──
//
// Fetches a snapshot on a fixed cadence and renders it into a display
// surface. Every tick spawns an independent fetch: a slow request never
// delays, queues behind, or cancels the next one. Failures are logged
// and swallowed; the display keeps its last rendered values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use parkwatch_api::{StatusClient, StatusSnapshot, TransportConfig};

use crate::config::{PollerConfig, StalePolicy};
use crate::display::DisplaySurface;
use crate::error::{CoreError, FailureKind, FetchOrParseFailure};
use crate::source::StatusSource;

// ── Outcomes & counters ──────────────────────────────────────────

/// What a single `fetch_and_render` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The snapshot was written to the display.
    Rendered,
    /// Fetching or parsing failed; the display is untouched.
    Failed(FailureKind),
    /// A newer response was already rendered (only under
    /// [`StalePolicy::DiscardStale`]).
    Discarded,
}

/// Point-in-time poll counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Fetches initiated.
    pub attempts: u64,
    pub rendered: u64,
    pub failed: u64,
    pub discarded: u64,
}

impl PollStats {
    /// Fetches that have not completed yet (or never will).
    pub fn in_flight(&self) -> u64 {
        self.attempts
            .saturating_sub(self.rendered + self.failed + self.discarded)
    }
}

#[derive(Default)]
struct Counters {
    attempts: AtomicU64,
    rendered: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> PollStats {
        PollStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            rendered: self.rendered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

// ── StatusPoller ─────────────────────────────────────────────────

/// Polls a status source and mirrors each snapshot into a display.
///
/// Cheaply cloneable via `Arc<PollerInner>`; clones share counters,
/// sequence numbers and the display.
pub struct StatusPoller<S = StatusClient> {
    inner: Arc<PollerInner<S>>,
}

impl<S> Clone for StatusPoller<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct PollerInner<S> {
    source: S,
    surface: Arc<dyn DisplaySurface>,
    config: PollerConfig,
    counters: Counters,
    /// Sequence number of the most recently initiated fetch.
    last_seq: AtomicU64,
    /// Sequence number of the newest rendered snapshot. Held for the
    /// duration of a render so the three writes are never interleaved.
    newest_rendered: Mutex<u64>,
}

impl StatusPoller<StatusClient> {
    /// Build a poller that talks HTTP to `config.base_url`.
    pub fn new(config: PollerConfig, surface: Arc<dyn DisplaySurface>) -> Result<Self, CoreError> {
        config.validate()?;
        let client = build_client(&config)?;
        Self::with_source(client, config, surface)
    }
}

impl<S: StatusSource> StatusPoller<S> {
    /// Build a poller around any [`StatusSource`].
    pub fn with_source(
        source: S,
        config: PollerConfig,
        surface: Arc<dyn DisplaySurface>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(PollerInner {
                source,
                surface,
                config,
                counters: Counters::default(),
                last_seq: AtomicU64::new(0),
                newest_rendered: Mutex::new(0),
            }),
        })
    }

    pub fn config(&self) -> &PollerConfig {
        &self.inner.config
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn stats(&self) -> PollStats {
        self.inner.counters.snapshot()
    }

    /// Fetch one snapshot without touching the display.
    pub async fn fetch_snapshot(&self) -> Result<StatusSnapshot, FetchOrParseFailure> {
        self.inner
            .source
            .fetch_status()
            .await
            .map_err(FetchOrParseFailure::from)
    }

    /// Fetch one snapshot and render it.
    ///
    /// Never fails: a fetch or parse failure is logged once at error
    /// level and reported through the returned outcome only.
    pub async fn fetch_and_render(&self) -> PollOutcome {
        let seq = self.inner.last_seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.counters.attempts.fetch_add(1, Ordering::Relaxed);

        match self.fetch_snapshot().await {
            Ok(snapshot) => self.render(seq, &snapshot),
            Err(failure) => {
                self.inner.counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    seq,
                    kind = %failure.kind(),
                    error = %failure,
                    "error fetching parking status"
                );
                PollOutcome::Failed(failure.kind())
            }
        }
    }

    fn render(&self, seq: u64, snapshot: &StatusSnapshot) -> PollOutcome {
        let mut newest = self
            .inner
            .newest_rendered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.inner.config.stale_policy == StalePolicy::DiscardStale && seq < *newest {
            self.inner.counters.discarded.fetch_add(1, Ordering::Relaxed);
            debug!(seq, newest = *newest, "discarding stale status response");
            return PollOutcome::Discarded;
        }

        self.inner.surface.render(snapshot);
        *newest = (*newest).max(seq);
        self.inner.counters.rendered.fetch_add(1, Ordering::Relaxed);
        debug!(
            seq,
            occupied = snapshot.occupied,
            available = snapshot.available,
            last_updated = %snapshot.last_updated,
            "rendered parking status"
        );
        PollOutcome::Rendered
    }

    /// Spawn the poll loop: one fetch immediately, then one per interval.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> PollerHandle {
        self.start_with_cancel(CancellationToken::new())
    }

    /// Like [`start`](Self::start), stopping when `cancel` fires.
    pub fn start_with_cancel(&self, cancel: CancellationToken) -> PollerHandle {
        let task = tokio::spawn(poll_loop(self.clone(), cancel.clone()));
        PollerHandle { cancel, task }
    }
}

/// Tick loop. Spawns a detached fetch per tick; stopping the loop does
/// not cancel fetches that are already in flight.
async fn poll_loop<S: StatusSource>(poller: StatusPoller<S>, cancel: CancellationToken) {
    let period = poller.inner.config.poll_interval;
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        endpoint = poller.inner.source.endpoint(),
        interval = ?period,
        stale_policy = %poller.inner.config.stale_policy,
        "status poller started"
    );

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                trace!("status poll tick");
                let poller = poller.clone();
                tokio::spawn(async move {
                    poller.fetch_and_render().await;
                });
            }
        }
    }

    info!(stats = ?poller.stats(), "status poller stopped");
}

// ── PollerHandle ─────────────────────────────────────────────────

/// Handle to a running poll loop.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop ticking and wait for the loop to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "status poller task ended abnormally");
        }
    }
}

// ── Oneshot ──────────────────────────────────────────────────────

/// Fetch a single snapshot without a display or a loop.
///
/// For one-off CLI invocations. Unlike the poll loop this returns the
/// failure to the caller.
pub async fn fetch_once(config: &PollerConfig) -> Result<StatusSnapshot, CoreError> {
    config.validate()?;
    let client = build_client(config)?;
    let snapshot = client
        .fetch_status()
        .await
        .map_err(FetchOrParseFailure::from)?;
    Ok(snapshot)
}

fn build_client(config: &PollerConfig) -> Result<StatusClient, CoreError> {
    let mut transport = TransportConfig::default();
    if let Some(timeout) = config.request_timeout {
        transport = transport.with_timeout(timeout);
    }
    Ok(StatusClient::new(config.base_url.clone(), &transport)?)
}
