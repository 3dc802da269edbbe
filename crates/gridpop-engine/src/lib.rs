//! Game-state engine for gridpop, a grid-placement puzzle.
//!
//! Tetromino-shaped pieces are dropped onto a 4×4 or 5×5 grid of numbers.
//! Every covered cell goes up by one; a row or column whose cells all share
//! the same nonzero value clears and scores; a cell reaching
//! [`CellValue::MAX`] ends the game.
//!
//! - [`core`] holds the data model: cell values, grids, shapes and pieces.
//! - [`engine`] holds the rules: wall kicks, scoring, progression, the
//!   [`GameState`] reducer, the high-score ledger and the [`Game`] shell
//!   boundary that drives timers.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell value out of range: {_0} (expected 0-7)")]
pub struct InvalidCellValue(#[error(not(source))] pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unsupported grid size: {_0} (expected 4 or 5)")]
pub struct InvalidGridSize(#[error(not(source))] pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("rotation must be 0-3, got {_0}")]
pub struct InvalidRotation(#[error(not(source))] pub u8);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidGridRows {
    #[display("grid must have 4 or 5 rows, got {_0}")]
    RowCount(#[error(not(source))] usize),
    #[display("row {row} has {len} cells, expected {expected}")]
    RowLength {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("{_0}")]
    Cell(InvalidCellValue),
}
