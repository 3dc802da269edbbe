use std::iter;

use gridpop_engine::ShapeKind;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{CellDisplay, PieceDisplay};

/// Upcoming pieces, nearest first.
#[derive(Debug)]
pub struct PieceStackDisplay<'a> {
    kinds: Vec<ShapeKind>,
    slots: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceStackDisplay<'a> {
    /// Reserves room for `slots` pieces even when fewer are known yet.
    pub fn new<I>(kinds: I, slots: usize) -> Self
    where
        I: IntoIterator<Item = ShapeKind>,
    {
        Self {
            kinds: kinds.into_iter().take(slots).collect(),
            slots,
            block: None,
        }
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
        let slots = u16::try_from(self.slots).unwrap_or(u16::MAX);
        let padding = slots.saturating_sub(1);
        2 * CellDisplay::PREVIEW_HEIGHT * slots
            + padding
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceStackDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceStackDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let layout = Layout::vertical(
            (0..self.slots).map(|_| Constraint::Length(2 * CellDisplay::PREVIEW_HEIGHT)),
        )
        .flex(Flex::SpaceBetween);
        let cells = area.layout_vec(&layout);

        for (cell, kind) in iter::zip(cells, &self.kinds) {
            PieceDisplay::new().kind(*kind).render(cell, buf);
        }
    }
}
