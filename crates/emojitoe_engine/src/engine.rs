//! Match state machine.
//!
//! The engine is the single authority for applying moves. Human and AI moves
//! enter through the same [`MatchEngine::process_move`], so a faulty policy
//! can never corrupt the board.

use crate::action::{Move, MoveDisposition, RejectReason};
use crate::events::{EventReceiver, MatchEvent, Observers, SubscriptionId};
use crate::invariants::{EngineInvariants, InvariantSet};
use crate::rules::{Evaluation, evaluate};
use crate::turn::TurnTracker;
use crate::types::{Board, MatchOutcome, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Lifecycle phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Created or reset; no moves accepted yet.
    Idle,
    /// Moves are being accepted.
    InProgress,
    /// Terminal. Only [`MatchEngine::reset`] leaves this phase.
    GameOver,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    InProgress(TurnTracker),
    GameOver {
        turn: TurnTracker,
        outcome: MatchOutcome,
    },
}

/// Runs one match: board, turn order, outcome and notifications.
#[derive(Debug)]
pub struct MatchEngine {
    state: State,
    board: Board,
    first: Option<Side>,
    history: Vec<Move>,
    observers: Observers,
}

impl MatchEngine {
    /// Creates an idle engine with an empty board.
    #[instrument]
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            board: Board::new(),
            first: None,
            history: Vec::new(),
            observers: Observers::new(),
        }
    }

    /// Starts the match with `first` to move.
    ///
    /// Returns false and changes nothing unless the engine is idle.
    #[instrument(skip(self))]
    pub fn start(&mut self, first: Side) -> bool {
        if !matches!(self.state, State::Idle) {
            warn!(phase = ?self.phase(), "Start ignored, match already started");
            return false;
        }

        self.state = State::InProgress(TurnTracker::new(first));
        self.first = Some(first);
        info!(first = %first, "Match started");
        self.observers.notify(&MatchEvent::TurnChanged { active: first });
        true
    }

    /// Returns the engine to idle with a fresh board. Listeners stay registered.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.board = Board::new();
        self.first = None;
        self.history.clear();
        info!("Match reset");
    }

    /// Applies `index` for `side` if the move is legal.
    ///
    /// Illegal moves (wrong phase, wrong turn, taken or out-of-range cell)
    /// change nothing and notify nobody. On acceptance, `MoveApplied` is
    /// always delivered before the `TurnChanged` or `GameOver` it causes.
    #[instrument(skip(self), fields(phase = ?self.phase()))]
    pub fn process_move(&mut self, index: usize, side: Side) -> MoveDisposition {
        let State::InProgress(mut turn) = self.state else {
            debug!("Move ignored, match not in progress");
            return MoveDisposition::Rejected(RejectReason::NotInProgress);
        };

        if turn.active() != side {
            warn!(expected = %turn.active(), actual = %side, "Move out of turn ignored");
            return MoveDisposition::Rejected(RejectReason::WrongTurn {
                expected: turn.active(),
                actual: side,
            });
        }

        if let Err(e) = self.board.place(index, side) {
            warn!(error = %e, "Illegal placement ignored");
            return MoveDisposition::Rejected(RejectReason::Board(e));
        }

        self.history.push(Move::new(index, side));
        debug!(index, side = %side, "Move applied");
        self.observers.notify(&MatchEvent::MoveApplied { index, side });

        match evaluate(&self.board) {
            Evaluation::Finished(outcome) => {
                turn.record_move();
                self.state = State::GameOver { turn, outcome };
                info!(%outcome, moves = turn.moves(), "Match finished");
                self.observers.notify(&MatchEvent::GameOver(outcome));
            }
            Evaluation::InProgress => {
                let active = turn.advance();
                self.state = State::InProgress(turn);
                self.observers.notify(&MatchEvent::TurnChanged { active });
            }
        }

        debug_assert!(
            EngineInvariants::check_all(self).is_ok(),
            "engine invariants violated after move {index}"
        );

        MoveDisposition::Accepted
    }

    /// Replays alternating moves from `first`, stopping at the first rejection.
    #[instrument]
    pub fn replay(first: Side, indices: &[usize]) -> Self {
        let mut engine = Self::new();
        engine.start(first);
        for &index in indices {
            let Some(side) = engine.current_turn() else {
                break;
            };
            if !engine.process_move(index, side).is_accepted() {
                break;
            }
        }
        engine
    }

    /// Current phase.
    pub fn phase(&self) -> MatchPhase {
        match self.state {
            State::Idle => MatchPhase::Idle,
            State::InProgress(_) => MatchPhase::InProgress,
            State::GameOver { .. } => MatchPhase::GameOver,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move, or `None` outside of play.
    pub fn current_turn(&self) -> Option<Side> {
        match self.state {
            State::InProgress(turn) => Some(turn.active()),
            _ => None,
        }
    }

    /// Side that opened the match.
    pub fn first_side(&self) -> Option<Side> {
        self.first
    }

    /// Number of accepted moves.
    pub fn moves(&self) -> usize {
        match self.state {
            State::Idle => 0,
            State::InProgress(turn) | State::GameOver { turn, .. } => turn.moves(),
        }
    }

    /// Outcome once the match is over.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        match self.state {
            State::GameOver { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Accepted moves in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Registers a notification callback.
    pub fn subscribe(&mut self, listener: impl FnMut(&MatchEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    /// Registers a channel listener.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, EventReceiver) {
        self.observers.subscribe_channel()
    }

    /// Removes a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}
