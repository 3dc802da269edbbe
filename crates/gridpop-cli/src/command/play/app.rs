use std::time::Duration;

use crossterm::event::{Event, KeyEventKind};
use gridpop_engine::Game;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Line,
};

use crate::{
    command::play::input::{self, Command},
    storage::FileStorage,
    tui::{App, Tui},
    ui::widgets::{GameDisplay, KeyBindingDisplay, style},
    util::key_label,
};

/// Redraw interval, finer than the 100 ms countdown tick.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct PlayApp {
    game: Game<FileStorage>,
    status: Option<String>,
    should_exit: bool,
}

impl PlayApp {
    pub fn new(game: Game<FileStorage>) -> Self {
        Self {
            game,
            status: None,
            should_exit: false,
        }
    }

    pub fn into_game(self) -> Game<FileStorage> {
        self.game
    }

    fn apply(&mut self, command: Command) {
        if command == Command::Quit {
            self.should_exit = true;
            return;
        }
        if let Some(action) = input::to_action(command, self.game.state()) {
            self.game.dispatch(action);
        }
        self.collect_storage_error();
    }

    fn collect_storage_error(&mut self) {
        if let Some(e) = self.game.storage_mut().take_error() {
            self.status = Some(format!("Could not save: {e:#}"));
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(Some(FRAME_INTERVAL));
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Event::Key(key) = event
            && key.kind == KeyEventKind::Press
            && let Some(command) = input::resolve(key, self.game.state())
        {
            self.apply(command);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [game_area, help_area, status_area] = frame.area().layout(&Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ]));

        frame.render_widget(GameDisplay::new(self.game.state()), game_area);

        let keys = self.game.state().key_config();
        let help = KeyBindingDisplay::new(vec![
            (
                vec![
                    key_label(&keys.move_left),
                    key_label(&keys.move_right),
                    key_label(&keys.move_up),
                    key_label(&keys.move_down),
                ],
                "move",
            ),
            (
                vec![key_label(&keys.rotate), key_label(&keys.rotate_counter)],
                "rotate",
            ),
            (vec![key_label(&keys.drop)], "place"),
            (vec![key_label(&keys.hold)], "hold"),
            (vec!["o"], "options"),
            (vec!["Esc", "q"], "quit"),
        ]);
        frame.render_widget(help, help_area);

        if let Some(status) = &self.status {
            frame.render_widget(
                Line::styled(status.as_str(), style::STATUS_ERROR).centered(),
                status_area,
            );
        }
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        self.game.advance(elapsed);
        self.collect_storage_error();
    }
}
