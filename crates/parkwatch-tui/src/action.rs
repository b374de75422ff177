//! All possible UI actions. Actions are the sole mechanism for state mutation.

use parkwatch_core::BoardState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Clock tick; only relative times changed.
    Clock,
    Resize(u16, u16),
    ToggleHelp,
    /// The display board changed.
    BoardUpdated(BoardState),
}
