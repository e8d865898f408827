//! Board geometry and cells.
//!
//! Rows are numbered from the top. A letter `(dx, dy)` moves from
//! `(row, col)` to `(row - dy, col + dx)`, so positive `dy` goes up the
//! board.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PlayerId;
use crate::game::PieceId;

/// A board coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Destination of displacement `(dx, dy)`, if it stays on a
    /// `rows × cols` board.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, rows: usize, cols: usize) -> Option<Position> {
        let row = self.row as i64 - i64::from(dy);
        let col = self.col as i64 + i64::from(dx);
        if row < 0 || col < 0 || row >= rows as i64 || col >= cols as i64 {
            return None;
        }
        Some(Position::new(row as usize, col as usize))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Contents of one board square.
///
/// An empty cell has no piece and no owners. Owners are copied from the
/// piece type when a piece is placed, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub piece: Option<PieceId>,
    pub owners: SmallVec<[PlayerId; 2]>,
}

impl Cell {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_piece(piece: PieceId, owners: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            piece: Some(piece),
            owners: owners.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }

    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owners.contains(&player)
    }

    /// Occupied by a piece whose first owner is someone other than `player`.
    #[must_use]
    pub fn is_opponent_of(&self, player: PlayerId) -> bool {
        self.owners.first().is_some_and(|&owner| owner != player)
    }
}

/// Rectangular grid of cells stored row-major.
///
/// Cells live in a persistent vector so cloning a board for a snapshot is
/// O(1) and only modified chunks are copied afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vector<Cell>,
}

impl Board {
    /// An all-empty board.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: std::iter::repeat(Cell::empty()).take(rows * cols).collect(),
        }
    }

    /// Build from row-major cells. Panics if the count is not `rows × cols`.
    pub fn from_cells(rows: usize, cols: usize, cells: impl IntoIterator<Item = Cell>) -> Self {
        let cells: Vector<Cell> = cells.into_iter().collect();
        assert_eq!(cells.len(), rows * cols, "Board needs {} cells", rows * cols);
        Self { rows, cols, cells }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && row < self.rows as i64 && col < self.cols as i64
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn get_mut(&mut self, pos: Position) -> &mut Cell {
        let index = self.index(pos);
        &mut self.cells[index]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let index = self.index(pos);
        self.cells.set(index, cell);
    }

    /// Every position, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows * self.cols).map(move |i| Position::new(i / cols, i % cols))
    }

    /// Every `(position, cell)` pair, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.positions().zip(self.cells.iter())
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            pos.row < self.rows && pos.col < self.cols,
            "Position {} outside {}x{} board",
            pos,
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_uses_row_minus_dy() {
        let center = Position::new(1, 1);
        assert_eq!(center.offset(0, 1, 3, 3), Some(Position::new(0, 1)));
        assert_eq!(center.offset(1, 0, 3, 3), Some(Position::new(1, 2)));
        assert_eq!(center.offset(-1, -1, 3, 3), Some(Position::new(2, 0)));
        assert_eq!(center.offset(0, 2, 3, 3), None);
        assert_eq!(Position::new(0, 0).offset(-1, 0, 3, 3), None);
    }

    #[test]
    fn test_cell_ownership() {
        let cell = Cell::with_piece(PieceId::new(0), [PlayerId::new(1)]);
        assert!(!cell.is_empty());
        assert!(cell.is_owned_by(PlayerId::new(1)));
        assert!(cell.is_opponent_of(PlayerId::new(0)));
        assert!(!cell.is_opponent_of(PlayerId::new(1)));

        let empty = Cell::empty();
        assert!(empty.is_empty());
        assert!(!empty.is_opponent_of(PlayerId::new(0)));
    }

    #[test]
    fn test_board_set_and_snapshot() {
        let mut board = Board::new(2, 3);
        let snapshot = board.clone();

        let pos = Position::new(1, 2);
        board.set(pos, Cell::with_piece(PieceId::new(4), [PlayerId::new(0)]));

        assert_eq!(board.get(pos).piece, Some(PieceId::new(4)));
        assert!(snapshot.get(pos).is_empty());
        assert_ne!(board, snapshot);
    }

    #[test]
    fn test_positions_row_major() {
        let board = Board::new(2, 2);
        let positions: Vec<_> = board.positions().collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
        assert!(board.contains(1, 1));
        assert!(!board.contains(2, 0));
        assert!(!board.contains(0, -1));
    }
}
