use gridpop_engine::{CellValue, ShapeKind};
use ratatui::{
    layout::Constraint,
    prelude::{Buffer, Rect},
    style::Style,
    text::Line,
    widgets::{Block as BlockWidget, Widget},
};

use crate::ui::widgets::style;

const DIGITS: [&str; 8] = ["·", "1", "2", "3", "4", "5", "6", "7"];

/// One grid square: a filled background with an optional centered symbol.
#[derive(Debug, Clone, Copy)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    /// Size of a square on the playing grid.
    pub const BOARD_WIDTH: u16 = 6;
    pub const BOARD_HEIGHT: u16 = 3;
    /// Size of a square in the hold and next previews.
    pub const PREVIEW_WIDTH: u16 = 2;
    pub const PREVIEW_HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn from_value(value: CellValue) -> Self {
        Self::new(style::cell(value), DIGITS[usize::from(value.get())])
    }

    /// A grid cell under the active piece, showing the value it would take.
    pub fn under_piece(value: CellValue) -> Self {
        let after = value.incremented();
        let style = if after.is_max() {
            style::ACTIVE_DANGER
        } else {
            style::ACTIVE
        };
        Self::new(style, DIGITS[usize::from(after.get())])
    }

    pub fn from_kind(kind: ShapeKind) -> Self {
        Self::new(style::piece(kind), "")
    }

    pub const fn dimmed() -> Self {
        Self::new(style::PREVIEW_DIMMED, "")
    }

    pub const fn preview_empty() -> Self {
        Self::new(style::PREVIEW_EMPTY, "")
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        BlockWidget::new().style(self.style).render(area, buf);
        Line::styled(self.symbol, self.style)
            .centered()
            .render(area.centered_vertically(Constraint::Length(1)), buf);
    }
}
