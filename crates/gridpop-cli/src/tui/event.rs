use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

/// Events produced by the [`EventLoop`](super::event_loop::EventLoop).
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Tick interval reached; carries the time since the previous tick.
    Tick(Duration),
    /// Something changed since the last draw.
    Render,
    #[from]
    Crossterm(CrosstermEvent),
}
