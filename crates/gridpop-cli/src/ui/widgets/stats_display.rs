use std::iter;

use gridpop_engine::{Countdown, GameState};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct StatsDisplay<'a> {
    state: &'a GameState,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self { state, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&GameState) -> String),
    LabelValue(&'static str, &'static dyn Fn(&GameState) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|state| state.score().to_string()),
    Row::FullLabel("BEST:"),
    Row::FullValue(&|state| state.best_score().to_string()),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|state| state.level().to_string()),
    Row::LabelValue("LINES:", &|state| state.lines_cleared().to_string()),
    Row::LabelValue("TURN:", &|state| state.turns_played().to_string()),
    Row::Empty,
    Row::LabelValue("TIME:", &|state| format_countdown(state.countdown())),
    Row::LabelValue("MODE:", &|state| state.mode().to_string()),
];

fn format_countdown(countdown: Countdown) -> String {
    match countdown {
        Countdown::Unlimited => "--".to_owned(),
        Countdown::Remaining(left) => {
            format!("{}.{}", left.as_secs(), left.subsec_millis() / 100)
        }
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.state), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.state), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
