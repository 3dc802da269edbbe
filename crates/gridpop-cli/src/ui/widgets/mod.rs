use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    cell_display::*, game_display::*, grid_display::*, key_binding_display::*, piece_display::*,
    piece_stack_display::*, stats_display::*,
};

mod cell_display;
mod game_display;
mod grid_display;
mod key_binding_display;
mod piece_display;
mod piece_stack_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(64, 96, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(48, 48, 48);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use gridpop_engine::{CellValue, ShapeKind};
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = fg_bg(color::GRAY, color::DARK_GRAY);
    pub const PREVIEW_EMPTY: Style = bg_only(color::BLACK);
    pub const PREVIEW_DIMMED: Style = bg_only(color::GRAY);
    pub const ACTIVE: Style = fg_bg(color::BLACK, color::WHITE).add_modifier(Modifier::BOLD);
    pub const ACTIVE_DANGER: Style = fg_bg(color::WHITE, color::RED).add_modifier(Modifier::BOLD);
    pub const NOTICE: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);
    pub const STATUS_ERROR: Style = Style::new().fg(color::RED);

    const VALUE_COLORS: [Color; 7] = [
        color::BLUE,
        color::CYAN,
        color::GREEN,
        color::YELLOW,
        color::ORANGE,
        color::MAGENTA,
        color::RED,
    ];

    /// Foreground color of a nonzero cell value, also used for score pop-ups.
    pub fn value_color(value: CellValue) -> Color {
        match value.get() {
            0 => color::GRAY,
            v => VALUE_COLORS[usize::from(v - 1)],
        }
    }

    pub fn cell(value: CellValue) -> Style {
        if value.is_empty() {
            EMPTY
        } else {
            fg_bg(color::BLACK, value_color(value)).add_modifier(Modifier::BOLD)
        }
    }

    pub fn piece(kind: ShapeKind) -> Style {
        let color = match kind {
            ShapeKind::I | ShapeKind::I3 => color::CYAN,
            ShapeKind::O => color::YELLOW,
            ShapeKind::S => color::GREEN,
            ShapeKind::Z => color::RED,
            ShapeKind::J => color::BLUE,
            ShapeKind::L | ShapeKind::LJ2 => color::ORANGE,
            ShapeKind::T => color::MAGENTA,
        };
        bg_only(color)
    }

    pub fn border(playing: bool, paused: bool, game_over: bool) -> Style {
        let color = if game_over {
            color::RED
        } else if paused {
            color::YELLOW
        } else if playing {
            color::WHITE
        } else {
            color::GRAY
        };
        fg_bg(color, color::BLACK)
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
