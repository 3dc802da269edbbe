use gridpop_engine::{GameState, NEXT_QUEUE_LEN, Piece, ScoreAnimation};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{
    CellDisplay, GridDisplay, PieceDisplay, PieceStackDisplay, StatsDisplay, color, style,
};

/// Full game screen: hold and stats on the left, the grid in the middle and
/// the next queue on the right, with pop-ups for score gains and the
/// start, options and game-over states.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    state: &'a GameState,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self {
            state,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn popup(&self) -> Option<(Text<'static>, Style)> {
        let state = self.state;
        if state.is_options_menu_open() {
            let size = state.grid_size().to_string();
            let on_off = if state.is_timed() { "ON" } else { "OFF" };
            let text = Text::from(vec![
                Line::styled("OPTIONS", Modifier::BOLD),
                Line::from(""),
                Line::from(format!("GRID  {size:>5}  [4]/[5]")),
                Line::from(format!("TIMED {on_off:>5}  [t]")),
                Line::from(""),
                Line::from("changes restart the game"),
                Line::from("[o] close"),
            ]);
            return Some((text, style::NOTICE));
        }
        if state.is_game_over() {
            let text = Text::from(vec![
                Line::styled("GAME OVER!!", Modifier::BOLD),
                Line::from(format!("SCORE {}", state.score())),
                Line::from("[Enter] play again"),
            ]);
            return Some((text, style::GAME_OVER));
        }
        if !state.has_started() {
            let text = Text::from(vec![
                Line::styled(state.mode().to_string(), Modifier::BOLD),
                Line::from("[Enter] start"),
            ]);
            return Some((text, style::NOTICE));
        }
        None
    }
}

/// Converts a fractional grid coordinate to a terminal offset.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn grid_offset(coord: f32, unit: u16) -> u16 {
    (coord.max(0.0) * f32::from(unit)).round() as u16
}

fn render_score_animations(animations: &[ScoreAnimation], grid_area: Rect, buf: &mut Buffer) {
    // Newest on top, older ones pushed upward.
    for (stack, animation) in animations.iter().rev().enumerate() {
        let text = format!("+{}", animation.value);
        let width = u16::try_from(text.len()).unwrap_or(u16::MAX) + 2;
        let center_x = grid_area.x + grid_offset(animation.x, CellDisplay::BOARD_WIDTH);
        let center_y = grid_area.y + grid_offset(animation.y, CellDisplay::BOARD_HEIGHT);
        let y = center_y.saturating_sub(u16::try_from(stack * 2).unwrap_or(u16::MAX));
        let area = Rect::new(center_x.saturating_sub(width / 2), y, width, 1)
            .intersection(grid_area);
        let style = Style::new()
            .fg(style::value_color(animation.clear_value))
            .bg(color::BLACK)
            .add_modifier(Modifier::BOLD);
        Clear.render(area, buf);
        Line::styled(text, style).centered().render(area, buf);
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = style::border(
            state.is_playing(),
            state.is_options_menu_open(),
            state.is_game_over(),
        );
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let grid = {
            let widget = GridDisplay::new(state.grid()).block(
                Block::bordered()
                    .title(Line::from(state.grid_size().to_string()).centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
            match state.current_piece() {
                Some(piece) if state.is_playing() => widget.piece(*piece),
                _ => widget,
            }
        };
        let hold_panel = {
            let panel = PieceDisplay::new()
                .dimmed(!state.can_hold())
                .block(panel("HOLD"));
            match state.held_piece() {
                Some(piece) => panel.kind(piece.kind()),
                None => panel,
            }
        };
        let piece_stack =
            PieceStackDisplay::new(state.next_queue().map(Piece::kind), NEXT_QUEUE_LEN)
                .block(panel("NEXT"));
        let stats = StatsDisplay::new(state).block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats.width())),
            Constraint::Length(grid.width()),
            Constraint::Length(piece_stack.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(stats.width())]).flex(Flex::End),
        )[0];

        let [grid_area] = Layout::vertical([Constraint::Length(grid.height())]).areas(center_column);
        let [piece_stack_area] =
            Layout::vertical([Constraint::Length(piece_stack.height())]).areas(right_column);

        let grid_width = grid.width();
        let grid_inner = Block::bordered().inner(grid_area);
        hold_panel.render(hold_area, buf);
        stats.render(stats_area, buf);
        grid.render(grid_area, buf);
        piece_stack.render(piece_stack_area, buf);

        render_score_animations(state.score_animations(), grid_inner, buf);

        if let Some((text, style)) = self.popup() {
            let height = u16::try_from(text.height()).unwrap_or(u16::MAX) + 2;
            let block = Block::new().style(style);
            let area = grid_area.centered(Constraint::Length(grid_width), Constraint::Length(height));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.style(style)
                .centered()
                .render(inner.centered_vertically(Constraint::Length(height - 2)), buf);
        }
    }
}
