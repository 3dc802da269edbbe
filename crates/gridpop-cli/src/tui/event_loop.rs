use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state.
///
/// Ticks fire at `tick_interval` if one is set. A render is requested after
/// every tick or terminal event, so the screen is redrawn only when the
/// application had a chance to change.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            dirty: true, // first frame
        }
    }

    /// Pass `None` to stop tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.last_tick = Instant::now();
    }

    /// Blocks until the next tick is due, a render is pending or a crossterm
    /// event arrives.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval {
                let elapsed = now.duration_since(self.last_tick);
                if elapsed >= tick_interval {
                    self.last_tick = now;
                    self.dirty = true;
                    return Ok(TuiEvent::Tick(elapsed));
                }
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(tick_interval) = self.tick_interval {
                let timeout = (self.last_tick + tick_interval).saturating_duration_since(now);
                if !event::poll(timeout)? {
                    continue;
                }
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }
}
