//! Match engine for emojitoe.
//!
//! Pure game logic with no I/O: a fixed 3x3 board, win and draw rules, a turn
//! tracker, the match state machine that owns them, and the computer
//! opponent's decision policy.
//!
//! # Example
//!
//! ```
//! use emojitoe_engine::{MatchEngine, MatchEvent, Side, drain_events};
//!
//! let mut engine = MatchEngine::new();
//! let (_id, mut events) = engine.subscribe_channel();
//! engine.start(Side::Player);
//!
//! for (index, side) in [(0, Side::Player), (3, Side::Opponent), (1, Side::Player),
//!                       (4, Side::Opponent), (2, Side::Player)] {
//!     engine.process_move(index, side);
//! }
//!
//! let over = drain_events(&mut events).into_iter().find_map(|e| match e {
//!     MatchEvent::GameOver(outcome) => Some(outcome),
//!     _ => None,
//! });
//! assert_eq!(over.and_then(|o| o.winner()), Some(Side::Player));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod ai;
mod engine;
mod events;
pub mod invariants;
pub mod rules;
mod turn;
mod types;

pub use action::{Move, MoveDisposition, RejectReason};
pub use ai::{AiPolicy, Difficulty, minimax_value};
pub use engine::{MatchEngine, MatchPhase};
pub use events::{EventReceiver, MatchEvent, Observers, SubscriptionId, drain_events};
pub use rules::{Evaluation, evaluate};
pub use turn::TurnTracker;
pub use types::{
    Board, BoardError, CELL_COUNT, Cell, MatchOutcome, SIDE_LEN, Side, Verdict, WinLine,
};
