//! Status polling and display layer between `parkwatch-api` and the
//! CLI / TUI front-ends.
//!
//! - **[`StatusPoller`]**: fetches `GET /status` once immediately and then
//!   on every tick of a fixed interval, spawning each fetch independently.
//!   Failures are logged and swallowed; the display keeps its last values.
//!   [`fetch_once()`] covers single CLI invocations.
//!
//! - **[`DisplaySurface`]**: the three text targets (`occupied`,
//!   `available`, `last_updated`) the poller writes into.
//!   [`DisplayBoard`] is the in-memory implementation, observable through
//!   [`BoardStream`].
//!
//! - **[`PollerConfig`]**: endpoint, cadence, optional request timeout and
//!   the [`StalePolicy`] applied to out-of-order completions.

pub mod config;
pub mod display;
pub mod error;
pub mod poller;
pub mod source;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_POLL_INTERVAL, PollerConfig, StalePolicy};
pub use display::{BoardState, DisplayBoard, DisplaySurface, DisplayTarget};
pub use error::{CoreError, FailureKind, FetchOrParseFailure};
pub use poller::{PollOutcome, PollStats, PollerHandle, StatusPoller, fetch_once};
pub use source::StatusSource;
pub use stream::{BoardStream, BoardWatchStream};

pub use parkwatch_api::{STATUS_PATH, StatusSnapshot};
