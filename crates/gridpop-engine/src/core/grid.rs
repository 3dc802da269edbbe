use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{InvalidGridRows, InvalidGridSize};

use super::{
    cell::CellValue,
    piece::{Piece, Position},
};

/// Largest supported grid side.
pub const MAX_GRID_SIDE: usize = 5;

/// Side length of the square grid, fixed for the duration of a game.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridSize {
    #[default]
    #[display("4x4")]
    Four,
    #[display("5x5")]
    Five,
}

impl GridSize {
    pub const ALL: [Self; 2] = [Self::Four, Self::Five];

    #[must_use]
    pub const fn side(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Five => 5,
        }
    }
}

impl TryFrom<u8> for GridSize {
    type Error = InvalidGridSize;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            _ => Err(InvalidGridSize(value)),
        }
    }
}

impl From<GridSize> for u8 {
    #[expect(clippy::cast_possible_truncation)]
    fn from(size: GridSize) -> Self {
        size.side() as u8
    }
}

/// Rows and columns found complete after a placement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineClear {
    rows: ArrayVec<usize, MAX_GRID_SIDE>,
    cols: ArrayVec<usize, MAX_GRID_SIDE>,
    clear_value: CellValue,
}

impl LineClear {
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    #[must_use]
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Value used for scoring.
    ///
    /// When lines of different values complete together, the last line in
    /// scan order (rows top to bottom, then columns left to right) decides.
    #[must_use]
    pub fn clear_value(&self) -> CellValue {
        self.clear_value
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

/// Square matrix of cell values.
///
/// All operations that change cells return a new grid and leave `self`
/// untouched.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    size: GridSize,
    cells: [[CellValue; MAX_GRID_SIDE]; MAX_GRID_SIDE],
}

impl Grid {
    /// Creates an all-zero grid.
    #[must_use]
    pub const fn empty(size: GridSize) -> Self {
        Self {
            size,
            cells: [[CellValue::EMPTY; MAX_GRID_SIDE]; MAX_GRID_SIDE],
        }
    }

    /// Builds a grid from raw rows; mostly useful for tests and tooling.
    ///
    /// ```
    /// use gridpop_engine::Grid;
    ///
    /// let grid = Grid::from_rows(&[
    ///     [1, 1, 1, 1],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    /// ])
    /// .unwrap();
    /// assert_eq!(grid.lines_to_clear().rows(), &[0]);
    /// ```
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, InvalidGridRows>
    where
        R: AsRef<[u8]>,
    {
        let size = match rows.len() {
            4 => GridSize::Four,
            5 => GridSize::Five,
            n => return Err(InvalidGridRows::RowCount(n)),
        };
        let mut grid = Self::empty(size);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size.side() {
                return Err(InvalidGridRows::RowLength {
                    row: y,
                    len: row.len(),
                    expected: size.side(),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                grid.cells[y][x] = CellValue::try_from(value).map_err(InvalidGridRows::Cell)?;
            }
        }
        Ok(grid)
    }

    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    #[must_use]
    pub const fn side(&self) -> usize {
        self.size.side()
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<CellValue> {
        let (x, y) = self.index(x, y)?;
        Some(self.cells[y][x])
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        let side = self.side();
        self.cells[..side].iter().map(move |row| &row[..side])
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.side() && y < self.side()).then_some((x, y))
    }

    /// Checks whether `piece` could be placed where it currently sits.
    #[must_use]
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        self.is_valid_at(piece, piece.position())
    }

    /// Checks whether `piece` could be placed at `position`.
    ///
    /// Every occupied cell of the piece's current rotation must be inside the
    /// grid and below [`CellValue::MAX`].
    #[must_use]
    pub fn is_valid_at(&self, piece: &Piece, position: Position) -> bool {
        piece
            .with_position(position)
            .occupied_cells()
            .all(|(x, y)| self.get(x, y).is_some_and(|cell| cell < CellValue::MAX))
    }

    /// Returns a copy with every cell covered by `piece` incremented by one.
    ///
    /// Increments saturate at [`CellValue::MAX`]; cells outside the grid are ignored.
    #[must_use]
    pub fn with_piece_placed(&self, piece: &Piece) -> Self {
        let mut grid = *self;
        for (x, y) in piece.occupied_cells() {
            if let Some((x, y)) = self.index(x, y) {
                grid.cells[y][x] = grid.cells[y][x].incremented();
            }
        }
        grid
    }

    /// Finds rows and columns whose cells all share one nonzero value.
    #[must_use]
    pub fn lines_to_clear(&self) -> LineClear {
        let side = self.side();
        let mut clear = LineClear::default();

        for y in 0..side {
            let first = self.cells[y][0];
            if !first.is_empty() && self.cells[y][..side].iter().all(|&c| c == first) {
                clear.rows.push(y);
                clear.clear_value = first;
            }
        }

        for x in 0..side {
            let first = self.cells[0][x];
            if !first.is_empty() && (0..side).all(|y| self.cells[y][x] == first) {
                clear.cols.push(x);
                clear.clear_value = first;
            }
        }

        clear
    }

    /// Returns a copy with the given rows and columns reset to zero.
    #[must_use]
    pub fn with_lines_cleared(&self, rows: &[usize], cols: &[usize]) -> Self {
        let side = self.side();
        let mut grid = *self;
        for &y in rows.iter().filter(|&&y| y < side) {
            grid.cells[y][..side].fill(CellValue::EMPTY);
        }
        for &x in cols.iter().filter(|&&x| x < side) {
            for row in &mut grid.cells[..side] {
                row[x] = CellValue::EMPTY;
            }
        }
        grid
    }

    /// Returns `true` if every cell is zero.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.rows().flatten().all(|cell| cell.is_empty())
    }

    /// Returns `true` if any cell has reached [`CellValue::MAX`].
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.rows().flatten().any(|cell| cell.is_max())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid({}) [", self.size)?;
        for row in self.rows() {
            write!(f, "  ")?;
            for cell in row {
                write!(f, "{}", cell.get())?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rotation, ShapeKind};

    fn grid(rows: &[[u8; 4]]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    fn o_piece_at(x: i32, y: i32) -> Piece {
        Piece::new(ShapeKind::O, Rotation::default(), Position::new(x, y))
    }

    #[test]
    fn test_valid_position_bounds() {
        let grid = Grid::empty(GridSize::Four);
        assert!(grid.is_valid_position(&o_piece_at(0, 0)));
        assert!(grid.is_valid_position(&o_piece_at(2, 2)));
        assert!(!grid.is_valid_position(&o_piece_at(3, 0)));
        assert!(!grid.is_valid_position(&o_piece_at(-1, 0)));
        assert!(!grid.is_valid_position(&o_piece_at(0, 3)));
    }

    #[test]
    fn test_valid_position_ignores_empty_matrix_cells() {
        // The I piece's top row is empty, so its matrix may hang above the grid.
        let grid = Grid::empty(GridSize::Five);
        let piece = Piece::new(ShapeKind::I, Rotation::default(), Position::new(0, -1));
        assert!(grid.is_valid_position(&piece));
        let piece = piece.with_position(Position::new(0, 4));
        assert!(!grid.is_valid_position(&piece));
    }

    #[test]
    fn test_valid_position_rejects_max_cells() {
        let grid = grid(&[[7, 0, 0, 0], [0, 0, 0, 0], [0, 0, 6, 0], [0, 0, 0, 0]]);
        assert!(!grid.is_valid_position(&o_piece_at(0, 0)));
        assert!(grid.is_valid_position(&o_piece_at(1, 1)));
        assert!(grid.is_valid_at(&o_piece_at(0, 0), Position::new(2, 2)));
    }

    #[test]
    fn test_place_increments_and_caps() {
        let before = grid(&[[6, 0, 0, 0], [2, 7, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let after = before.with_piece_placed(&o_piece_at(0, 0));
        assert_eq!(
            after,
            grid(&[[7, 1, 0, 0], [3, 7, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])
        );
        // input untouched
        assert_eq!(before.get(0, 0), CellValue::new(6));
    }

    #[test]
    fn test_place_skips_out_of_bounds_cells() {
        let before = Grid::empty(GridSize::Four);
        let after = before.with_piece_placed(&o_piece_at(3, 3));
        assert_eq!(
            after,
            grid(&[[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 1]])
        );
    }

    #[test]
    fn test_lines_to_clear_rows_and_cols() {
        let g = grid(&[[3, 3, 3, 3], [2, 1, 0, 0], [2, 1, 0, 5], [2, 1, 0, 5]]);
        let clear = g.lines_to_clear();
        assert_eq!(clear.rows(), &[0]);
        assert!(clear.cols().is_empty());
        assert_eq!(clear.clear_value().get(), 3);

        let g = grid(&[[2, 3, 0, 0], [2, 3, 0, 0], [2, 3, 0, 0], [2, 3, 0, 0]]);
        let clear = g.lines_to_clear();
        assert!(clear.rows().is_empty());
        assert_eq!(clear.cols(), &[0, 1]);
        assert_eq!(clear.line_count(), 2);
    }

    #[test]
    fn test_lines_to_clear_last_scanned_value_wins() {
        let g = grid(&[[4, 4, 4, 4], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let clear = g.lines_to_clear();
        assert_eq!(clear.rows(), &[0, 1]);
        assert_eq!(clear.clear_value().get(), 1);

        let g = grid(&[[6, 0, 2, 0], [6, 0, 2, 0], [6, 0, 2, 0], [6, 0, 2, 0]]);
        let clear = g.lines_to_clear();
        assert_eq!(clear.cols(), &[0, 2]);
        assert_eq!(clear.clear_value().get(), 2);

        // A crossing row and column always share their intersection cell.
        let g = grid(&[[2, 2, 2, 2], [3, 3, 3, 2], [0, 0, 0, 2], [0, 0, 0, 2]]);
        let clear = g.lines_to_clear();
        assert_eq!(clear.rows(), &[0]);
        assert_eq!(clear.cols(), &[3]);
        assert_eq!(clear.clear_value().get(), 2);
    }

    #[test]
    fn test_lines_to_clear_ignores_zero_lines() {
        let clear = Grid::empty(GridSize::Five).lines_to_clear();
        assert!(clear.is_empty());
        assert!(clear.clear_value().is_empty());
    }

    #[test]
    fn test_clear_rows_and_cols() {
        let g = grid(&[[1, 2, 3, 4], [1, 2, 3, 4], [1, 2, 3, 4], [1, 2, 3, 4]]);
        let cleared = g.with_lines_cleared(&[1], &[1, 3]);
        assert_eq!(
            cleared,
            grid(&[[1, 0, 3, 0], [0, 0, 0, 0], [1, 0, 3, 0], [1, 0, 3, 0]])
        );
        assert_eq!(g.with_lines_cleared(&[], &[]), g);
    }

    #[test]
    fn test_cleared_and_game_over() {
        let g = Grid::empty(GridSize::Four);
        assert!(g.is_cleared());
        assert!(!g.is_game_over());

        let g = grid(&[[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 7]]);
        assert!(!g.is_cleared());
        assert!(g.is_game_over());
    }

    #[test]
    fn test_from_rows_errors() {
        assert_eq!(
            Grid::from_rows(&[[0u8; 3]; 3]),
            Err(InvalidGridRows::RowCount(3))
        );
        let rows: [&[u8]; 4] = [&[0, 0, 0, 0], &[0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]];
        assert!(matches!(
            Grid::from_rows(&rows),
            Err(InvalidGridRows::RowLength { row: 1, .. })
        ));
        assert!(matches!(
            Grid::from_rows(&[[8u8, 0, 0, 0], [0; 4], [0; 4], [0; 4]]),
            Err(InvalidGridRows::Cell(_))
        ));
    }

    #[test]
    fn test_grid_size_serde() {
        assert_eq!(serde_json::to_string(&GridSize::Five).unwrap(), "5");
        assert_eq!(
            serde_json::from_str::<GridSize>("4").unwrap(),
            GridSize::Four
        );
        assert!(serde_json::from_str::<GridSize>("6").is_err());
    }
}
