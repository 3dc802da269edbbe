use gridpop_engine::{Rotation, ShapeKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Spawn-orientation preview of a shape, cropped to its occupied cells.
#[derive(Debug, Default)]
pub struct PieceDisplay<'a> {
    kind: Option<ShapeKind>,
    dimmed: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(self, kind: ShapeKind) -> Self {
        Self {
            kind: Some(kind),
            ..self
        }
    }

    /// Draws the shape in gray, e.g. a held piece that cannot be swapped yet.
    pub fn dimmed(self, dimmed: bool) -> Self {
        Self { dimmed, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * CellDisplay::PREVIEW_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::PREVIEW_HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty = CellDisplay::preview_empty();
        let Some(kind) = self.kind else {
            empty.render(area, buf);
            return;
        };

        let mask = kind.mask(Rotation::default());
        let (min_x, min_y, max_x, max_y) = mask.occupied_bounds();
        let (w, h) = ((max_x - min_x + 1) as u16, (max_y - min_y + 1) as u16);
        let piece_area = area.centered(
            Constraint::Length(w * CellDisplay::PREVIEW_WIDTH),
            Constraint::Length(h * CellDisplay::PREVIEW_HEIGHT),
        );

        let horizontal = Layout::horizontal(
            (0..w).map(|_| Constraint::Length(CellDisplay::PREVIEW_WIDTH)),
        )
        .flex(Flex::Center);
        let vertical =
            Layout::vertical((0..h).map(|_| Constraint::Length(CellDisplay::PREVIEW_HEIGHT)));
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied = if self.dimmed {
            CellDisplay::dimmed()
        } else {
            CellDisplay::from_kind(kind)
        };
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                if mask.is_occupied(min_x + x, min_y + y) {
                    Widget::render(&occupied, grid_cell, buf);
                } else {
                    Widget::render(&empty, grid_cell, buf);
                }
            }
        }
    }
}
