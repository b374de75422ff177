// ── Display surfaces ──
//
// The poller writes plain strings into three named targets. Anything
// that can accept those writes (an in-memory board, a terminal, a
// test double) implements `DisplaySurface`.

use std::sync::Arc;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tokio::sync::watch;

use parkwatch_api::StatusSnapshot;

use crate::stream::BoardStream;

/// One addressable text slot on the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum DisplayTarget {
    Occupied,
    Available,
    LastUpdated,
}

impl DisplayTarget {
    /// The text this target shows for a snapshot.
    pub fn text_of(self, snapshot: &StatusSnapshot) -> String {
        match self {
            Self::Occupied => snapshot.occupied.to_string(),
            Self::Available => snapshot.available.to_string(),
            Self::LastUpdated => snapshot.last_updated.clone(),
        }
    }
}

/// Something the poller can write status text into.
pub trait DisplaySurface: Send + Sync {
    /// Replace the text of a single target.
    fn write_text(&self, target: DisplayTarget, text: &str);

    /// Write all three targets from one snapshot.
    ///
    /// The default writes them one by one in declaration order. Surfaces
    /// that can publish all three at once should override this.
    fn render(&self, snapshot: &StatusSnapshot) {
        for target in DisplayTarget::iter() {
            self.write_text(target, &target.text_of(snapshot));
        }
    }
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Arc<S> {
    fn write_text(&self, target: DisplayTarget, text: &str) {
        (**self).write_text(target, text);
    }

    fn render(&self, snapshot: &StatusSnapshot) {
        (**self).render(snapshot);
    }
}

// ── BoardState ───────────────────────────────────────────────────

/// Current text of the three targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardState {
    pub occupied: String,
    pub available: String,
    pub last_updated: String,
}

impl BoardState {
    /// Every target showing the same placeholder text.
    pub fn placeholder(text: &str) -> Self {
        Self {
            occupied: text.to_owned(),
            available: text.to_owned(),
            last_updated: text.to_owned(),
        }
    }

    pub fn get(&self, target: DisplayTarget) -> &str {
        match target {
            DisplayTarget::Occupied => &self.occupied,
            DisplayTarget::Available => &self.available,
            DisplayTarget::LastUpdated => &self.last_updated,
        }
    }

    /// Set one target. Returns `true` if the text changed.
    pub fn set(&mut self, target: DisplayTarget, text: &str) -> bool {
        let slot = match target {
            DisplayTarget::Occupied => &mut self.occupied,
            DisplayTarget::Available => &mut self.available,
            DisplayTarget::LastUpdated => &mut self.last_updated,
        };
        if *slot == text {
            return false;
        }
        text.clone_into(slot);
        true
    }

    /// Set all targets from a snapshot. Returns `true` if anything changed.
    pub fn apply(&mut self, snapshot: &StatusSnapshot) -> bool {
        let mut changed = false;
        for target in DisplayTarget::iter() {
            changed |= self.set(target, &target.text_of(snapshot));
        }
        changed
    }
}

// ── DisplayBoard ─────────────────────────────────────────────────

/// In-memory display surface backed by a `watch` channel.
///
/// A snapshot render publishes all three targets in one update, so a
/// subscriber never observes a half-written board. Subscribers are only
/// woken when some text actually changed.
#[derive(Debug)]
pub struct DisplayBoard {
    state: watch::Sender<BoardState>,
}

impl DisplayBoard {
    pub fn new() -> Self {
        Self::with_state(BoardState::default())
    }

    pub fn with_state(initial: BoardState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state }
    }

    /// Current board contents (cloned).
    pub fn state(&self) -> BoardState {
        self.state.borrow().clone()
    }

    /// Current text of one target.
    pub fn text(&self, target: DisplayTarget) -> String {
        self.state.borrow().get(target).to_owned()
    }

    /// Subscribe to board changes.
    pub fn subscribe(&self) -> BoardStream {
        BoardStream::new(self.state.subscribe())
    }
}

impl Default for DisplayBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for DisplayBoard {
    fn write_text(&self, target: DisplayTarget, text: &str) {
        self.state.send_if_modified(|s| s.set(target, text));
    }

    fn render(&self, snapshot: &StatusSnapshot) {
        self.state.send_if_modified(|s| s.apply(snapshot));
    }
}
