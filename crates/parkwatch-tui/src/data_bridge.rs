//! Data bridge: connects the `DisplayBoard` to TUI actions.
//!
//! Runs as a background task, forwarding the current board and then
//! every change as an [`Action`] through the TUI's action channel.

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use parkwatch_core::BoardStream;

use crate::action::Action;

/// Forward board changes until cancelled or the board is dropped.
pub async fn spawn_data_bridge(
    updates: BoardStream,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    // The stream yields the current board first.
    let mut stream = updates.into_stream();

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            next = stream.next() => {
                let Some(state) = next else { break };
                debug!(
                    occupied = %state.occupied,
                    available = %state.available,
                    "dispatching BoardUpdated"
                );
                if action_tx.send(Action::BoardUpdated(state)).is_err() {
                    break;
                }
            }
        }
    }

    debug!("data bridge stopped");
}
