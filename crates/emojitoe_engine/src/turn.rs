//! Turn tracking.

use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Whose turn it is and how many moves have been made.
///
/// Only the engine advances the tracker, and only after a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTracker {
    active: Side,
    moves: usize,
}

impl TurnTracker {
    /// Creates a tracker with `first` to move.
    pub fn new(first: Side) -> Self {
        Self {
            active: first,
            moves: 0,
        }
    }

    /// Side whose turn it is.
    pub fn active(&self) -> Side {
        self.active
    }

    /// Number of moves applied so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Counts an applied move without passing the turn. Used for the final move.
    pub(crate) fn record_move(&mut self) {
        self.moves += 1;
    }

    /// Counts an applied move and hands the turn to the other side.
    pub(crate) fn advance(&mut self) -> Side {
        self.record_move();
        self.active = self.active.other();
        self.active
    }
}
