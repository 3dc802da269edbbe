use super::{grid::GridSize, piece::Rotation};

/// Kind of a piece shape.
///
/// Besides the seven tetrominoes, the catalog contains two trominoes:
/// `I3` (three in a row) and `LJ2` (a 2×2 corner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ShapeKind {
    I = 0,
    O = 1,
    T = 2,
    S = 3,
    Z = 4,
    L = 5,
    J = 6,
    I3 = 7,
    LJ2 = 8,
}

impl ShapeKind {
    /// Number of shape kinds (9).
    pub const LEN: usize = 9;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::L,
        Self::J,
        Self::I3,
        Self::LJ2,
    ];

    /// Kinds dealt on a grid of the given size.
    ///
    /// The four-long `I` piece is left out of 4×4 games.
    #[must_use]
    pub fn available_for(size: GridSize) -> &'static [Self] {
        match size {
            GridSize::Four => &Self::ALL[1..],
            GridSize::Five => &Self::ALL,
        }
    }

    /// Returns the occupancy matrix of this shape in the given rotation.
    #[must_use]
    pub const fn mask(self, rotation: Rotation) -> ShapeMask {
        SHAPE_MASKS[self as usize][rotation.as_usize()]
    }
}

/// Square occupancy matrix of one rotation state.
///
/// Row `y` is stored as a bitmask where bit `x` marks an occupied cell.
/// Sides range from 2 (`O`, `LJ2`) to 4 (`I`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMask {
    side: u8,
    rows: [u8; 4],
}

impl ShapeMask {
    #[expect(clippy::cast_possible_truncation)]
    const fn parse<const N: usize>(rows: [&str; N]) -> Self {
        assert!(N >= 2 && N <= 4);
        let mut bits = [0; 4];
        let mut y = 0;
        while y < N {
            let row = rows[y].as_bytes();
            assert!(row.len() == N);
            let mut x = 0;
            while x < N {
                if row[x] == b'#' {
                    bits[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        Self {
            side: N as u8,
            rows: bits,
        }
    }

    /// Width and height of the matrix.
    #[must_use]
    pub const fn side(self) -> usize {
        self.side as usize
    }

    #[must_use]
    pub const fn is_occupied(self, dx: usize, dy: usize) -> bool {
        dx < self.side as usize && dy < self.side as usize && self.rows[dy] & (1 << dx) != 0
    }

    /// Returns the `(dx, dy)` offsets of occupied cells in row-major order.
    pub fn occupied_cells(self) -> impl Iterator<Item = (usize, usize)> {
        let side = self.side();
        (0..side).flat_map(move |dy| {
            (0..side)
                .filter(move |&dx| self.is_occupied(dx, dy))
                .map(move |dx| (dx, dy))
        })
    }

    /// Inclusive bounding box of the occupied cells as `(min_dx, min_dy, max_dx, max_dy)`.
    #[must_use]
    pub fn occupied_bounds(self) -> (usize, usize, usize, usize) {
        self.occupied_cells().fold(
            (usize::MAX, usize::MAX, 0, 0),
            |(min_x, min_y, max_x, max_y), (dx, dy)| {
                (min_x.min(dx), min_y.min(dy), max_x.max(dx), max_y.max(dy))
            },
        )
    }
}

const SHAPE_MASKS: [[ShapeMask; 4]; ShapeKind::LEN] = {
    const fn m<const N: usize>(rows: [&str; N]) -> ShapeMask {
        ShapeMask::parse(rows)
    }

    [
        // I
        [
            m(["....", "####", "....", "...."]),
            m(["..#.", "..#.", "..#.", "..#."]),
            m(["....", "....", "####", "...."]),
            m([".#..", ".#..", ".#..", ".#.."]),
        ],
        // O
        [
            m(["##", "##"]),
            m(["##", "##"]),
            m(["##", "##"]),
            m(["##", "##"]),
        ],
        // T
        [
            m([".#.", "###", "..."]),
            m([".#.", ".##", ".#."]),
            m(["...", "###", ".#."]),
            m([".#.", "##.", ".#."]),
        ],
        // S
        [
            m([".##", "##.", "..."]),
            m([".#.", ".##", "..#"]),
            m(["...", ".##", "##."]),
            m(["#..", "##.", ".#."]),
        ],
        // Z
        [
            m(["##.", ".##", "..."]),
            m(["..#", ".##", ".#."]),
            m(["...", "##.", ".##"]),
            m([".#.", "##.", "#.."]),
        ],
        // L
        [
            m(["..#", "###", "..."]),
            m([".#.", ".#.", ".##"]),
            m(["...", "###", "#.."]),
            m(["##.", ".#.", ".#."]),
        ],
        // J
        [
            m(["#..", "###", "..."]),
            m([".##", ".#.", ".#."]),
            m(["...", "###", "..#"]),
            m([".#.", ".#.", "##."]),
        ],
        // I3
        [
            m(["...", "###", "..."]),
            m([".#.", ".#.", ".#."]),
            m(["...", "###", "..."]),
            m([".#.", ".#.", ".#."]),
        ],
        // LJ2
        [
            m(["##", "#."]),
            m(["##", ".#"]),
            m([".#", "##"]),
            m(["#.", "##"]),
        ],
    ]
};
