use std::iter;

use gridpop_engine::{Grid, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// The playing grid with the active piece drawn over it.
#[derive(Debug)]
pub struct GridDisplay<'a> {
    grid: &'a Grid,
    piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> GridDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: Piece) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        self.side() * CellDisplay::BOARD_WIDTH
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        self.side() * CellDisplay::BOARD_HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    fn side(&self) -> u16 {
        self.grid.side() as u16
    }

    fn cells(&self, area: Rect) -> Vec<Vec<Rect>> {
        let side = self.grid.side();
        let horizontal = Layout::horizontal(
            (0..side).map(|_| Constraint::Length(CellDisplay::BOARD_WIDTH)),
        )
        .flex(Flex::Center);
        let vertical =
            Layout::vertical((0..side).map(|_| Constraint::Length(CellDisplay::BOARD_HEIGHT)));
        area.layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal))
            .collect()
    }
}

impl Widget for GridDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GridDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let covered: Vec<(i32, i32)> = self
            .piece
            .map(|piece| piece.occupied_cells().collect())
            .unwrap_or_default();

        let rows = iter::zip(self.cells(area).into_iter().enumerate(), self.grid.rows());
        for ((y, grid_row), row) in rows {
            for ((x, grid_cell), value) in iter::zip(grid_row.into_iter().enumerate(), row) {
                let under_piece = i32::try_from(x)
                    .ok()
                    .zip(i32::try_from(y).ok())
                    .is_some_and(|pos| covered.contains(&pos));
                let cell = if under_piece {
                    CellDisplay::under_piece(*value)
                } else {
                    CellDisplay::from_value(*value)
                };
                cell.render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use gridpop_engine::{GridSize, Position, Rotation, ShapeKind};

    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn test_size_follows_grid_side() {
        let four = Grid::empty(GridSize::Four);
        let five = Grid::empty(GridSize::Five);
        assert_eq!(GridDisplay::new(&four).width(), 24);
        assert_eq!(GridDisplay::new(&five).height(), 15);
        assert_eq!(
            GridDisplay::new(&four).block(BlockWidget::bordered()).width(),
            26
        );
    }

    #[test]
    fn test_piece_overlay_shows_value_after_placement() {
        let grid = Grid::from_rows(&[[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let piece = Piece::new(ShapeKind::O, Rotation::default(), Position::new(0, 0));
        let display = GridDisplay::new(&grid).piece(piece);
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        // middle line of the first cell row
        let text = row_text(&buf, 1);
        assert_eq!(
            text.split_whitespace().collect::<Vec<_>>(),
            ["4", "1", "·", "·"]
        );
    }
}
