//! Normal tier: win if possible, else block, else positional preference.

use crate::rules::winning_line;
use crate::types::{Board, Side};

/// Center, then corners, then edges.
const PREFERENCE: [usize; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

pub(super) fn pick(board: &Board, side: Side) -> Option<usize> {
    completing_move(board, side)
        .or_else(|| completing_move(board, side.other()))
        .or_else(|| PREFERENCE.iter().copied().find(|&i| board.is_empty(i)))
}

/// Lowest empty index that would complete a line for `side`.
fn completing_move(board: &Board, side: Side) -> Option<usize> {
    board.empty_cells().into_iter().find(|&index| {
        let mut trial = *board;
        trial.set_unchecked(index, side.into());
        winning_line(&trial).is_some_and(|(_, winner)| winner == side)
    })
}
