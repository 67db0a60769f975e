//! Invariants of a running match.
//!
//! The engine checks these after every accepted move in debug builds. They are
//! also exposed so tests can assert them on arbitrary engines.

use crate::engine::{MatchEngine, MatchPhase};
use crate::types::{Cell, Side};
use tracing::warn;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together. Implemented for tuples.
pub trait InvariantSet<S> {
    /// Checks every invariant in the set, collecting all violations.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = match <(I1, I2)>::check_all(state) {
            Ok(()) => Vec::new(),
            Err(v) => v,
        };
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

/// Marks strictly alternate: the opener has made as many moves as the other
/// side or exactly one more.
pub struct AlternationInvariant;

impl Invariant<MatchEngine> for AlternationInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        let board = engine.board();
        let Some(first) = engine.first_side() else {
            return board.filled() == 0;
        };
        let opener = board.count(Cell::from(first));
        let second = board.count(Cell::from(first.other()));
        let valid = opener == second || opener == second + 1;
        if !valid {
            warn!(opener, second, "Alternation violated");
        }
        valid
    }

    fn description() -> &'static str {
        "Marks must alternate, opener leads by at most one"
    }
}

/// History, move counter and board agree.
pub struct HistoryConsistentInvariant;

impl Invariant<MatchEngine> for HistoryConsistentInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        let board = engine.board();
        let history = engine.history();
        let valid = history.len() == board.filled()
            && history.len() == engine.moves()
            && history
                .iter()
                .all(|m| board.get(m.index) == Some(Cell::from(m.side)));
        if !valid {
            warn!(
                history = history.len(),
                filled = board.filled(),
                moves = engine.moves(),
                "History consistency violated"
            );
        }
        valid
    }

    fn description() -> &'static str {
        "History must match the board and move counter"
    }
}

/// While in progress, the side to move follows from the opener and move parity.
pub struct TurnOrderInvariant;

impl Invariant<MatchEngine> for TurnOrderInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        if engine.phase() != MatchPhase::InProgress {
            return true;
        }
        let (Some(first), Some(active)) = (engine.first_side(), engine.current_turn()) else {
            return false;
        };
        let expected: Side = if engine.moves() % 2 == 0 {
            first
        } else {
            first.other()
        };
        expected == active
    }

    fn description() -> &'static str {
        "Side to move must follow the opener and move parity"
    }
}

/// Every engine invariant.
pub type EngineInvariants = (
    AlternationInvariant,
    HistoryConsistentInvariant,
    TurnOrderInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariants_hold_for_fresh_engine() {
        let engine = MatchEngine::new();
        assert!(EngineInvariants::check_all(&engine).is_ok());
    }

    #[test]
    fn test_invariants_hold_after_moves() {
        let engine = MatchEngine::replay(Side::Opponent, &[4, 0, 8, 2]);
        assert!(EngineInvariants::check_all(&engine).is_ok());
    }

    #[test]
    fn test_two_invariants_as_set() {
        let engine = MatchEngine::replay(Side::Player, &[0, 1]);
        type Pair = (AlternationInvariant, TurnOrderInvariant);
        assert!(Pair::check_all(&engine).is_ok());
    }
}
