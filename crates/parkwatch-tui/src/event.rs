//! Terminal input merged with the dashboard clock.
//!
//! A background task forwards key presses and resizes from crossterm and
//! emits [`Event::Clock`] at a fixed rate. There is no free-running
//! render loop: the app redraws when an event changed something on
//! screen, and the clock is what ages relative times like
//! "changed 5s ago".

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// Wall-clock tick. Relative times on screen may have moved.
    Clock,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn spawn(clock_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(read_events(tx, clock_rate, cancel.clone()));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader task has exited.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Keep presses and resizes; drop releases, repeats, mouse and focus.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

async fn read_events(
    tx: mpsc::UnboundedSender<Event>,
    clock_rate: Duration,
    cancel: CancellationToken,
) {
    let mut input = EventStream::new();
    let mut clock = tokio::time::interval(clock_rate);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,

            _ = clock.tick() => Event::Clock,

            next = input.next() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    warn!(error = %e, "failed to read terminal input");
                    continue;
                }
                None => break,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }

    debug!("event reader stopped");
}
