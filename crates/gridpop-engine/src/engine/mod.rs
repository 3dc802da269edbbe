//! Game rules and state management.
//!
//! This module builds the gameplay on top of the [`core`](crate::core) data model:
//!
//! - [`resolve_rotation`] - Wall-kick search for rotated pieces
//! - [`line_clear_score`] - Points for a clear event
//! - [`level_for_turns`] / [`timer_for_level`] - Level and countdown progression
//! - [`PieceGenerator`] - Seeded random piece selection
//! - [`HighScoreLedger`] - Top-5 scores per grid size and timed mode
//! - [`Storage`] / [`Preferences`] - Injected persistence of settings and scores
//! - [`GameState`] / [`Action`] - The reducer applying player and timer actions
//! - [`Game`] / [`TimerDriver`] - Shell boundary owning storage and timers
//!
//! # Game Flow
//!
//! 1. Create a [`Game`] over some [`Storage`]; preferences and scores load from it
//! 2. Dispatch [`Action::Start`]
//! 3. Move, rotate and hold the current piece, then [`Action::Place`] it
//! 4. In timed mode, call [`Game::advance`] regularly; it ticks the countdown
//!    and auto-places the piece when time runs out
//! 5. The game ends once any cell reaches 7; the score enters the ledger
//!
//! # Example
//!
//! ```
//! use gridpop_engine::{Action, Game, MemoryStorage, Position};
//!
//! let mut game = Game::new(MemoryStorage::default());
//! game.dispatch(Action::Start);
//!
//! let piece = *game.state().current_piece().unwrap();
//! game.dispatch(Action::Move(piece.position().down()));
//! game.dispatch(Action::Place);
//!
//! assert_eq!(game.state().turns_played(), 1);
//! ```

pub use self::{
    action::*, high_scores::*, kick::*, piece_generator::*, preferences::*, progression::*,
    scoring::*, session::*, state::*, storage::*, timers::*,
};

mod action;
mod high_scores;
mod kick;
mod piece_generator;
mod preferences;
mod progression;
mod scoring;
mod session;
mod state;
mod storage;
mod timers;
