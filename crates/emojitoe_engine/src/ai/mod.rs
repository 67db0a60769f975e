//! Computer opponent decision policy.
//!
//! The policy is a stateless function of a board snapshot, the side it plays
//! and a difficulty tier. Its answer is still validated by the engine like any
//! other move.

mod easy;
mod hard;
mod normal;

use crate::types::{Board, CELL_COUNT, Side};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, instrument};

pub use hard::minimax_value;

/// Strategy tier of the computer opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random empty cell.
    #[default]
    #[strum(to_string = "easy")]
    Easy,
    /// Win, block, then center/corner/edge preference.
    #[serde(alias = "norm")]
    #[strum(to_string = "normal", serialize = "norm")]
    Normal,
    /// Full minimax search; never loses.
    #[strum(to_string = "hard")]
    Hard,
}

/// Picks a move for one side at a fixed difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiPolicy {
    difficulty: Difficulty,
    side: Side,
}

impl AiPolicy {
    /// Creates a policy playing `side` at `difficulty`.
    pub fn new(difficulty: Difficulty, side: Side) -> Self {
        Self { difficulty, side }
    }

    /// Returns the difficulty tier.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the side this policy plays.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Chooses a move from the flat numeric board encoding.
    ///
    /// # Panics
    ///
    /// Panics if the encoding is invalid or the board has no empty cell.
    /// Callers must only ask during the policy's own turn of a live match.
    #[instrument(skip(self, rng), fields(difficulty = %self.difficulty, side = %self.side))]
    pub fn choose_move<R: Rng + ?Sized>(&self, cells: &[u8; CELL_COUNT], rng: &mut R) -> usize {
        let board = match Board::from_flat(cells) {
            Ok(board) => board,
            Err(e) => panic!("AI policy given an invalid board: {e}"),
        };
        self.choose_on(&board, rng)
    }

    /// Chooses a move on a board snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the board has no empty cell.
    #[instrument(skip(self, board, rng), fields(difficulty = %self.difficulty, side = %self.side))]
    pub fn choose_on<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> usize {
        let pick = match self.difficulty {
            Difficulty::Easy => easy::pick(board, rng),
            Difficulty::Normal => normal::pick(board, self.side),
            Difficulty::Hard => hard::pick(board, self.side),
        };

        let Some(index) = pick else {
            panic!("AI policy asked to move on a full board");
        };
        debug!(index, "AI chose cell");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::str::FromStr;

    #[test]
    fn test_difficulty_parses_aliases() {
        assert_eq!(Difficulty::from_str("HARD").unwrap(), Difficulty::Hard);
        assert_eq!(Difficulty::from_str("norm").unwrap(), Difficulty::Normal);
        assert_eq!(Difficulty::from_str("Normal").unwrap(), Difficulty::Normal);
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert!(Difficulty::from_str("impossible").is_err());
    }

    #[test]
    fn test_every_tier_picks_an_empty_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let cells = [1, 2, 1, 0, 2, 0, 0, 1, 0];
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            let policy = AiPolicy::new(difficulty, Side::Opponent);
            let index = policy.choose_move(&cells, &mut rng);
            assert_eq!(cells[index], 0, "{difficulty} picked occupied cell {index}");
        }
    }

    #[test]
    #[should_panic(expected = "full board")]
    fn test_full_board_panics() {
        let mut rng = StdRng::seed_from_u64(0);
        let policy = AiPolicy::new(Difficulty::Normal, Side::Opponent);
        policy.choose_move(&[1, 2, 1, 2, 1, 1, 2, 1, 2], &mut rng);
    }

    #[test]
    #[should_panic(expected = "invalid board")]
    fn test_bad_encoding_panics() {
        let mut rng = StdRng::seed_from_u64(0);
        let policy = AiPolicy::new(Difficulty::Easy, Side::Opponent);
        policy.choose_move(&[9, 0, 0, 0, 0, 0, 0, 0, 0], &mut rng);
    }
}
