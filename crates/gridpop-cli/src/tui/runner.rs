use std::time::Duration;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// Terminal runtime that owns the event loop and drives an [`App`].
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick interval; `None` disables ticks.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Runs `app` on the alternate screen until it asks to exit.
    ///
    /// - `Tick`: `app.update()` with the elapsed time
    /// - `Render`: `app.draw()`
    /// - `Crossterm`: `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick(elapsed) => app.update(&mut self, elapsed),
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
