//! Moves and move dispositions.
//!
//! Moves are domain events: a side claiming a cell. They can be logged,
//! replayed and validated independently of execution.

use crate::types::{BoardError, Side};
use serde::{Deserialize, Serialize};

/// A side placing its mark on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Cell index (0-8).
    pub index: usize,
    /// The side making the move.
    pub side: Side,
}

impl Move {
    /// Creates a new move.
    pub fn new(index: usize, side: Side) -> Self {
        Self { index, side }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.side, self.index)
    }
}

/// Why a move was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RejectReason {
    /// The match has not started or is already over.
    #[display("Match is not in progress")]
    NotInProgress,

    /// The acting side does not hold the turn.
    #[display("It's not {}'s turn (waiting for {})", actual, expected)]
    WrongTurn {
        /// Side holding the turn.
        expected: Side,
        /// Side that tried to move.
        actual: Side,
    },

    /// The board refused the placement.
    #[display("{}", _0)]
    Board(BoardError),
}

/// What the engine did with a submitted move.
///
/// Rejections are silent for observers; the value exists for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDisposition {
    /// The move was applied.
    Accepted,
    /// The move was ignored and nothing changed.
    Rejected(RejectReason),
}

impl MoveDisposition {
    /// Returns true when the move was applied.
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveDisposition::Accepted)
    }
}
