use crate::core::{Grid, Piece, Position, Rotation};

/// Offsets tried, in order, when a rotated piece does not fit in place.
///
/// Near cardinal moves first, then far cardinal moves, then the four near
/// diagonals, then the eight knight-like diagonals.
pub const KICK_OFFSETS: [(i32, i32); 20] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-2, 0),
    (2, 0),
    (0, -2),
    (0, 2),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (-2, -1),
    (2, -1),
    (-1, -2),
    (1, -2),
    (-2, 1),
    (2, 1),
    (-1, 2),
    (1, 2),
];

/// Finds where `piece` can sit after turning to `rotation`.
///
/// The current position is tried first, then each of [`KICK_OFFSETS`]
/// added to it. Returns `None` when nothing fits; the caller then keeps the
/// piece as it was.
#[must_use]
pub fn resolve_rotation(grid: &Grid, piece: &Piece, rotation: Rotation) -> Option<Position> {
    let rotated = piece.with_rotation(rotation);
    let origin = piece.position();
    std::iter::once(origin)
        .chain(KICK_OFFSETS.iter().map(|&(dx, dy)| origin.offset(dx, dy)))
        .find(|&position| grid.is_valid_at(&rotated, position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridSize, RotationDirection, ShapeKind};

    #[test]
    fn test_rotation_in_place_when_valid() {
        let grid = Grid::empty(GridSize::Four);
        let piece = Piece::new(ShapeKind::T, Rotation::default(), Position::new(0, 0));
        let rotation = piece.rotation().rotated(RotationDirection::Clockwise);
        assert_eq!(
            resolve_rotation(&grid, &piece, rotation),
            Some(Position::new(0, 0))
        );
    }

    #[test]
    fn test_kick_off_the_wall() {
        // T in rotation 3 occupies matrix columns 0-1, so x = 2 fits.
        let grid = Grid::empty(GridSize::Four);
        let piece = Piece::new(
            ShapeKind::T,
            Rotation::try_from(3).unwrap(),
            Position::new(2, 0),
        );
        let rotation = Rotation::default();
        // rotation 0 spans columns 0-2 -> x = 2 overhangs, first kick (-1, 0) fits
        assert_eq!(
            resolve_rotation(&grid, &piece, rotation),
            Some(Position::new(1, 0))
        );
    }

    #[test]
    fn test_kick_follows_offset_order() {
        // The origin overlaps a 7 and (-1, 0) leaves the grid, so (1, 0) wins.
        let grid = Grid::from_rows(&[[0, 0, 0, 0], [0, 0, 0, 0], [7, 0, 0, 0], [0, 0, 0, 0]])
            .unwrap();
        let piece = Piece::new(
            ShapeKind::I3,
            Rotation::default(),
            Position::new(0, 1),
        );
        // I3 rotation 0 occupies row 1 of its matrix -> grid row 2, columns 0-2
        assert!(!grid.is_valid_position(&piece));
        assert_eq!(
            resolve_rotation(&grid, &piece, Rotation::default()),
            Some(Position::new(1, 1))
        );
    }

    #[test]
    fn test_no_kick_possible() {
        let grid = Grid::from_rows(&[[7, 7, 7, 7], [7, 7, 7, 7], [7, 7, 7, 7], [7, 7, 7, 0]])
            .unwrap();
        let piece = Piece::new(ShapeKind::O, Rotation::default(), Position::new(1, 1));
        assert_eq!(resolve_rotation(&grid, &piece, Rotation::ALL[1]), None);
    }
}
