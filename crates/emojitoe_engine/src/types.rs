//! Core domain types for the match engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Side length of the board.
pub const SIDE_LEN: usize = 3;

/// A participant in the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Side {
    /// The human player.
    Player,
    /// The computer opponent.
    Opponent,
}

impl Side {
    /// Returns the other side.
    pub fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Unoccupied.
    #[default]
    Empty,
    /// Marked by the human player.
    Player,
    /// Marked by the computer opponent.
    Opponent,
}

impl Cell {
    /// Numeric encoding used by the flat board view (0 = empty, 1 = player, 2 = opponent).
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Player => 1,
            Cell::Opponent => 2,
        }
    }

    /// Decodes the numeric encoding.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Player),
            2 => Some(Cell::Opponent),
            _ => None,
        }
    }

    /// Returns the side owning this cell, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Player => Some(Side::Player),
            Cell::Opponent => Some(Side::Opponent),
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Cell::Player,
            Side::Opponent => Cell::Opponent,
        }
    }
}

/// Error raised when the board refuses a placement or an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// Index outside `0..9`.
    #[display("Cell index {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),

    /// Target cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(usize),

    /// The board already shows a finished match.
    #[display("Match is already over")]
    MatchOver,

    /// Flat encoding contained a value other than 0, 1 or 2.
    #[display("Invalid cell code {} at index {}", code, index)]
    InvalidCode {
        /// Position of the bad value.
        index: usize,
        /// The offending value.
        code: u8,
    },
}

impl std::error::Error for BoardError {}

/// Fixed 3x3 board in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a row/column pair to a cell index.
    pub fn index_of(row: usize, col: usize) -> Option<usize> {
        if row < SIDE_LEN && col < SIDE_LEN {
            Some(row * SIDE_LEN + col)
        } else {
            None
        }
    }

    /// Maps a cell index to its row/column pair.
    pub fn row_col(index: usize) -> Option<(usize, usize)> {
        if index < CELL_COUNT {
            Some((index / SIDE_LEN, index % SIDE_LEN))
        } else {
            None
        }
    }

    /// Gets the cell at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks whether `index` is in range and unoccupied.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Indices of every empty cell in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.cells[i] == Cell::Empty).collect()
    }

    /// Counts cells holding `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Number of marks placed so far.
    pub fn filled(&self) -> usize {
        CELL_COUNT - self.count(Cell::Empty)
    }

    /// Places a mark for `side`.
    ///
    /// # Errors
    ///
    /// Fails without touching the board when the index is out of range,
    /// the cell is taken, or the board already shows a finished match.
    #[instrument(level = "trace", skip(self))]
    pub fn place(&mut self, index: usize, side: Side) -> Result<(), BoardError> {
        match self.get(index) {
            None => return Err(BoardError::OutOfRange(index)),
            Some(Cell::Empty) => {}
            Some(_) => return Err(BoardError::Occupied(index)),
        }

        if crate::rules::evaluate(self).is_terminal() {
            return Err(BoardError::MatchOver);
        }

        self.cells[index] = side.into();
        Ok(())
    }

    /// Returns an immutable copy of the board.
    pub fn snapshot(&self) -> Board {
        *self
    }

    /// Numeric encoding for policy consumption (0 = empty, 1 = player, 2 = opponent).
    pub fn as_flat_array(&self) -> [u8; CELL_COUNT] {
        self.cells.map(Cell::code)
    }

    /// Rebuilds a board from the numeric encoding.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidCode`] for any value other than 0, 1 or 2.
    pub fn from_flat(flat: &[u8; CELL_COUNT]) -> Result<Self, BoardError> {
        let mut cells = [Cell::Empty; CELL_COUNT];
        for (index, &code) in flat.iter().enumerate() {
            cells[index] = Cell::from_code(code).ok_or(BoardError::InvalidCode { index, code })?;
        }
        Ok(Self { cells })
    }

    /// Builds a board from raw cells without validation.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Writes a cell without any checks. Search code uses this to try and undo moves.
    pub(crate) fn set_unchecked(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..SIDE_LEN {
            for col in 0..SIDE_LEN {
                let pos = row * SIDE_LEN + col;
                match self.cells[pos] {
                    Cell::Empty => write!(f, "{}", pos + 1)?,
                    Cell::Player => write!(f, "X")?,
                    Cell::Opponent => write!(f, "O")?,
                }
                if col < SIDE_LEN - 1 {
                    write!(f, "|")?;
                }
            }
            if row < SIDE_LEN - 1 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// The eight three-cell lines, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum WinLine {
    /// Top row.
    Row0,
    /// Middle row.
    Row1,
    /// Bottom row.
    Row2,
    /// Left column.
    Col0,
    /// Middle column.
    Col1,
    /// Right column.
    Col2,
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl WinLine {
    /// Cell indices covered by this line.
    pub fn cells(self) -> [usize; 3] {
        match self {
            WinLine::Row0 => [0, 1, 2],
            WinLine::Row1 => [3, 4, 5],
            WinLine::Row2 => [6, 7, 8],
            WinLine::Col0 => [0, 3, 6],
            WinLine::Col1 => [1, 4, 7],
            WinLine::Col2 => [2, 5, 8],
            WinLine::Diagonal => [0, 4, 8],
            WinLine::AntiDiagonal => [2, 4, 6],
        }
    }
}

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// One side completed a line.
    Win {
        /// Winning side.
        winner: Side,
        /// The completed line.
        line: WinLine,
    },
    /// Full board, no line.
    Draw,
}

/// Terminal result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchOutcome {
    verdict: Verdict,
    board: Board,
}

impl MatchOutcome {
    /// Creates an outcome from its verdict and the final board.
    pub fn new(verdict: Verdict, board: Board) -> Self {
        Self { verdict, board }
    }

    /// Returns the verdict.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Winning side, or `None` on a draw.
    pub fn winner(&self) -> Option<Side> {
        match self.verdict {
            Verdict::Win { winner, .. } => Some(winner),
            Verdict::Draw => None,
        }
    }

    /// Winning line, or `None` on a draw.
    pub fn line(&self) -> Option<WinLine> {
        match self.verdict {
            Verdict::Win { line, .. } => Some(line),
            Verdict::Draw => None,
        }
    }

    /// Returns true for a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self.verdict, Verdict::Draw)
    }

    /// Final board snapshot.
    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.verdict {
            Verdict::Win { winner, line } => write!(f, "{} wins on {}", winner, line),
            Verdict::Draw => write!(f, "Draw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mapping_round_trips() {
        for index in 0..CELL_COUNT {
            let (row, col) = Board::row_col(index).unwrap();
            assert_eq!(Board::index_of(row, col), Some(index));
        }
        assert_eq!(Board::index_of(3, 0), None);
        assert_eq!(Board::row_col(9), None);
    }

    #[test]
    fn test_place_rejects_out_of_range() {
        let mut board = Board::new();
        assert_eq!(board.place(9, Side::Player), Err(BoardError::OutOfRange(9)));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_place_rejects_occupied() {
        let mut board = Board::new();
        board.place(4, Side::Player).unwrap();
        assert_eq!(board.place(4, Side::Opponent), Err(BoardError::Occupied(4)));
        assert_eq!(board.get(4), Some(Cell::Player));
    }

    #[test]
    fn test_place_rejects_after_win() {
        let mut board = Board::new();
        for i in [0, 1, 2] {
            board.set_unchecked(i, Cell::Player);
        }
        assert_eq!(board.place(5, Side::Opponent), Err(BoardError::MatchOver));
        assert!(board.is_empty(5));
    }

    #[test]
    fn test_flat_encoding() {
        let mut board = Board::new();
        board.place(0, Side::Player).unwrap();
        board.place(8, Side::Opponent).unwrap();
        let flat = board.as_flat_array();
        assert_eq!(flat, [1, 0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(Board::from_flat(&flat), Ok(board));
    }

    #[test]
    fn test_from_flat_rejects_bad_code() {
        let flat = [0, 0, 3, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            Board::from_flat(&flat),
            Err(BoardError::InvalidCode { index: 2, code: 3 })
        );
    }

    #[test]
    fn test_display() {
        let mut board = Board::new();
        board.place(4, Side::Player).unwrap();
        assert_eq!(board.to_string(), "1|2|3\n-+-+-\n4|X|6\n-+-+-\n7|8|9");
    }
}
