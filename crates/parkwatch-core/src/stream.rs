// ── Reactive board subscription ──
//
// Subscription type for consuming `DisplayBoard` changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::display::BoardState;

/// A subscription to a `DisplayBoard`.
///
/// Provides both point-in-time access and change notification via
/// `changed()` or by converting to a `Stream`.
pub struct BoardStream {
    current: BoardState,
    receiver: watch::Receiver<BoardState>,
}

impl BoardStream {
    pub(crate) fn new(mut receiver: watch::Receiver<BoardState>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The state seen at creation or at the last `changed()`.
    pub fn current(&self) -> &BoardState {
        &self.current
    }

    /// The latest state (may have changed since `current`).
    pub fn latest(&self) -> BoardState {
        self.receiver.borrow().clone()
    }

    /// Whether the board changed since it was last observed.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next change, returning the new state.
    /// Returns `None` if the board has been dropped.
    pub async fn changed(&mut self) -> Option<BoardState> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    /// Convert into a `Stream` that yields the current state first, then
    /// every subsequent change.
    pub fn into_stream(self) -> BoardWatchStream {
        BoardWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct BoardWatchStream {
    inner: WatchStream<BoardState>,
}

impl Stream for BoardWatchStream {
    type Item = BoardState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
