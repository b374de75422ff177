// ── Runtime poller configuration ──
//
// Describes *where* to poll and *how often*. Never touches disk: the
// CLI/TUI build a `PollerConfig` (usually via `parkwatch-config`) and
// hand it in.

use std::time::Duration;

use strum::{AsRefStr, Display, EnumString};
use url::Url;

use crate::error::CoreError;

/// Tick spacing used when nothing else is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// What to do when a response completes after a newer one was rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum StalePolicy {
    /// Every completion overwrites the display, in completion order.
    /// A slow early response can roll the display back to older data.
    #[default]
    Overwrite,
    /// Completions older than the newest rendered request are dropped.
    DiscardStale,
}

/// Configuration for polling a single status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Server root (e.g. `http://127.0.0.1:5000`). `/status` is resolved
    /// against it.
    pub base_url: Url,
    /// Tick spacing. Must be non-zero.
    pub poll_interval: Duration,
    /// Per-request timeout. `None` means a hung request never resolves.
    pub request_timeout: Option<Duration>,
    pub stale_policy: StalePolicy,
}

impl PollerConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
            stale_policy: StalePolicy::default(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Reject settings the poll loop cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.poll_interval.is_zero() {
            return Err(CoreError::Config {
                message: "poll interval must be greater than zero".into(),
            });
        }
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(CoreError::Config {
                message: "request timeout must be greater than zero".into(),
            });
        }
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!("unsupported URL scheme: {}", self.base_url.scheme()),
            });
        }
        Ok(())
    }
}
