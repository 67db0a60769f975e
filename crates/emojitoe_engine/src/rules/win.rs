//! Win detection.

use super::draw::is_full;
use crate::types::{Board, MatchOutcome, Verdict, WinLine};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// No line is complete and cells remain.
    InProgress,
    /// The match is over.
    Finished(MatchOutcome),
}

impl Evaluation {
    /// Returns true when the match is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Evaluation::Finished(_))
    }

    /// Returns the outcome for a finished match.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        match self {
            Evaluation::Finished(outcome) => Some(*outcome),
            Evaluation::InProgress => None,
        }
    }
}

/// Returns the first fully owned line.
///
/// Lines are checked Row0..Row2, Col0..Col2, Diagonal, AntiDiagonal; only the
/// first match is reported even if a board somehow completes two.
#[instrument(level = "trace")]
pub fn winning_line(board: &Board) -> Option<(WinLine, crate::types::Side)> {
    for line in WinLine::iter() {
        let [a, b, c] = line.cells();
        let first = board.get(a)?;
        if let Some(side) = first.side() {
            if board.get(b) == Some(first) && board.get(c) == Some(first) {
                return Some((line, side));
            }
        }
    }
    None
}

/// Evaluates a board snapshot.
#[instrument(level = "trace")]
pub fn evaluate(board: &Board) -> Evaluation {
    if let Some((line, winner)) = winning_line(board) {
        return Evaluation::Finished(MatchOutcome::new(Verdict::Win { winner, line }, *board));
    }

    if is_full(board) {
        return Evaluation::Finished(MatchOutcome::new(Verdict::Draw, *board));
    }

    Evaluation::InProgress
}
