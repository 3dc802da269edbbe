use serde::{Deserialize, Serialize};

use crate::InvalidRotation;

use super::{
    grid::GridSize,
    shape::{ShapeKind, ShapeMask},
};

/// A shape instance with a rotation and a grid-relative position.
///
/// The position is the top-left corner of the rotation matrix. It may be
/// negative or extend past the grid as long as the occupied cells stay
/// inside; see [`Grid::is_valid_at`](super::grid::Grid::is_valid_at).
/// Pieces are values: moving or rotating returns a new `Piece`.
///
/// # Example
///
/// ```
/// use gridpop_engine::{GridSize, Piece, RotationDirection, ShapeKind};
///
/// let piece = Piece::spawn(ShapeKind::T, GridSize::Four);
/// assert_eq!((piece.position().x, piece.position().y), (0, 0));
///
/// let turned = piece.with_rotation(piece.rotation().rotated(RotationDirection::Clockwise));
/// assert_eq!(turned.rotation().get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: ShapeKind,
    rotation: Rotation,
    position: Position,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: ShapeKind, rotation: Rotation, position: Position) -> Self {
        Self {
            kind,
            rotation,
            position,
        }
    }

    /// Creates a piece at its spawn location: rotation 0, top row,
    /// horizontally centred (rounding left).
    #[must_use]
    pub fn spawn(kind: ShapeKind, size: GridSize) -> Self {
        let width = kind.mask(Rotation::default()).side();
        let x = size.side().saturating_sub(width) / 2;
        Self::new(
            kind,
            Rotation::default(),
            Position::new(i32::try_from(x).unwrap_or(0), 0),
        )
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn mask(&self) -> ShapeMask {
        self.kind.mask(self.rotation)
    }

    #[must_use]
    pub const fn with_position(self, position: Position) -> Self {
        Self { position, ..self }
    }

    #[must_use]
    pub const fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    /// Returns the grid coordinates covered by this piece.
    // matrix offsets are at most 3
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let Position { x, y } = self.position;
        self.mask()
            .occupied_cells()
            .map(move |(dx, dy)| (x + dx as i32, y + dy as i32))
    }
}

/// Grid-relative position of a piece's rotation matrix.
///
/// - `(0, 0)` is the top-left cell
/// - X increases rightward, Y increases downward
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub const fn left(self) -> Self {
        self.offset(-1, 0)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        self.offset(1, 0)
    }

    #[must_use]
    pub const fn up(self) -> Self {
        self.offset(0, -1)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        self.offset(0, 1)
    }
}

/// Direction of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationDirection {
    Clockwise,
    Counterclockwise,
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation(u8);

impl Rotation {
    /// Number of rotation states every shape defines.
    pub const COUNT: u8 = 4;

    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % Self::COUNT),
            RotationDirection::Counterclockwise => Self((self.0 + Self::COUNT - 1) % Self::COUNT),
        }
    }

    pub(crate) const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Rotation {
    type Error = InvalidRotation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < Self::COUNT {
            Ok(Self(value))
        } else {
            Err(InvalidRotation(value))
        }
    }
}
