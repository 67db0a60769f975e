//! Outcome rules.
//!
//! Pure functions over a board snapshot. They carry no move history, so an
//! identical board always evaluates identically.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{Evaluation, evaluate, winning_line};
