//! Draw detection.

use crate::types::{Board, Cell};
use tracing::instrument;

/// Checks if every cell is occupied.
///
/// A full board with no winning line is a draw.
#[instrument(level = "trace")]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Cell::Empty)
}

#[cfg(test)]
mod tests {
    use super::super::win::{Evaluation, evaluate};
    use super::*;
    use crate::types::Side;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.place(4, Side::Player).unwrap();
        assert!(!is_full(&board));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / O X X / O X O
        let board = Board::from_flat(&[1, 2, 1, 2, 1, 1, 2, 1, 2]).unwrap();
        assert!(is_full(&board));
        match evaluate(&board) {
            Evaluation::Finished(outcome) => {
                assert!(outcome.is_draw());
                assert_eq!(outcome.winner(), None);
                assert_eq!(outcome.line(), None);
            }
            Evaluation::InProgress => panic!("full board must be terminal"),
        }
    }
}
