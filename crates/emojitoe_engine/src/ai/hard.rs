//! Hard tier: exhaustive minimax with alpha-beta pruning.
//!
//! Scores are depth-adjusted so faster wins and slower losses are preferred.
//! Root children are each searched with a full window, so their values are
//! exact and ties resolve to the lowest index.

use crate::rules::winning_line;
use crate::types::{Board, Cell, Side};

const WIN: i32 = 10;

pub(super) fn pick(board: &Board, side: Side) -> Option<usize> {
    let mut scratch = *board;
    let mut best: Option<(usize, i32)> = None;

    for index in board.empty_cells() {
        scratch.set_unchecked(index, side.into());
        let score = search(&mut scratch, side.other(), side, 1, i32::MIN, i32::MAX);
        scratch.set_unchecked(index, Cell::Empty);

        if best.is_none_or(|(_, b)| score > b) {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index)
}

/// Game-theoretic value of `board` for `me` with `to_move` on turn.
///
/// Positive means `me` wins with best play, negative means `me` loses,
/// zero is a draw.
pub fn minimax_value(board: &Board, to_move: Side, me: Side) -> i32 {
    let mut scratch = *board;
    search(&mut scratch, to_move, me, 0, i32::MIN, i32::MAX)
}

fn search(
    board: &mut Board,
    to_move: Side,
    me: Side,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    if let Some((_, winner)) = winning_line(board) {
        return if winner == me { WIN - depth } else { depth - WIN };
    }

    let empties = board.empty_cells();
    if empties.is_empty() {
        return 0;
    }

    let maximizing = to_move == me;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for index in empties {
        board.set_unchecked(index, to_move.into());
        let value = search(board, to_move.other(), me, depth + 1, alpha, beta);
        board.set_unchecked(index, Cell::Empty);

        if maximizing {
            best = best.max(value);
            alpha = alpha.max(best);
        } else {
            best = best.min(value);
            beta = beta.min(best);
        }
        if beta <= alpha {
            break;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(flat: [u8; 9]) -> Board {
        Board::from_flat(&flat).unwrap()
    }

    #[test]
    fn test_takes_immediate_win() {
        let b = board([2, 2, 0, 1, 1, 0, 1, 0, 0]);
        assert_eq!(pick(&b, Side::Opponent), Some(2));
    }

    #[test]
    fn test_blocks_immediate_loss() {
        let b = board([1, 1, 0, 0, 2, 0, 0, 0, 0]);
        assert_eq!(pick(&b, Side::Opponent), Some(2));
    }

    #[test]
    fn test_answers_corner_with_center() {
        // Any reply but the center loses against a corner opening.
        let b = board([1, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(pick(&b, Side::Opponent), Some(4));
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        assert_eq!(minimax_value(&Board::new(), Side::Player, Side::Player), 0);
    }

    #[test]
    fn test_empty_board_opening_is_deterministic() {
        let first = pick(&Board::new(), Side::Player);
        assert_eq!(first, Some(0));
        assert_eq!(pick(&Board::new(), Side::Player), first);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let b = board([1, 2, 1, 2, 1, 1, 2, 1, 2]);
        assert_eq!(pick(&b, Side::Opponent), None);
    }
}
