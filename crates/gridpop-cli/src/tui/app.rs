use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Application driven by [`Tui::run`].
pub trait App {
    /// Called once before the first event. Configure the tick interval here.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Handles terminal input (keys, resize, focus).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Draws the whole screen; called only after something changed.
    fn draw(&self, frame: &mut Frame);

    /// Advances the application by the wall time since the previous tick.
    fn update(&mut self, tui: &mut Tui, elapsed: Duration);
}
