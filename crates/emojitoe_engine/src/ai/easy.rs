//! Easy tier: a uniformly random empty cell.

use crate::types::Board;
use rand::Rng;
use rand::seq::SliceRandom;

pub(super) fn pick<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    board.empty_cells().choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_only_empty_cells() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = Board::from_flat(&[1, 2, 0, 0, 1, 2, 0, 0, 0]).unwrap();
        for _ in 0..200 {
            let index = pick(&board, &mut rng).unwrap();
            assert!(board.is_empty(index));
        }
    }

    #[test]
    fn test_covers_all_empty_cells() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = Board::new();
        let seen: HashSet<_> = (0..500).filter_map(|_| pick(&board, &mut rng)).collect();
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_fills_board_without_repeats() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut board = Board::new();
        let mut chosen = HashSet::new();
        while let Some(index) = pick(&board, &mut rng) {
            assert!(chosen.insert(index), "repeated {index}");
            board.set_unchecked(index, Side::Opponent.into());
        }
        assert_eq!(chosen.len(), 9);
    }
}
