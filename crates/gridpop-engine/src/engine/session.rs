use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{
    action::Action,
    piece_generator::{PieceGenerator, PieceSeed},
    state::GameState,
    storage::Storage,
    timers::TimerDriver,
};

/// A running game bound to its storage and timers.
///
/// `Game` is the boundary a host talks to: it dispatches player actions,
/// stamps them with the wall clock, and turns elapsed time into timer
/// actions. Every timer callback is checked against the state at the
/// moment it fires, so a reset or mode change never lets a stale tick or
/// auto-place through.
#[derive(Debug)]
pub struct Game<S> {
    state: GameState,
    storage: S,
    timers: TimerDriver,
}

impl<S> Game<S>
where
    S: Storage,
{
    /// Loads preferences and scores from `storage` with a random seed.
    pub fn new(storage: S) -> Self {
        Self::with_generator(storage, PieceGenerator::new())
    }

    /// Same as [`Game::new`], but with a fixed piece sequence.
    pub fn with_seed(storage: S, seed: PieceSeed) -> Self {
        Self::with_generator(storage, PieceGenerator::with_seed(seed))
    }

    fn with_generator(storage: S, generator: PieceGenerator) -> Self {
        let state = GameState::load(&storage, generator, Utc::now());
        let mut timers = TimerDriver::new();
        timers.sync(&state);
        Self {
            state,
            storage,
            timers,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[must_use]
    pub fn timers(&self) -> &TimerDriver {
        &self.timers
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn dispatch(&mut self, action: Action) {
        self.dispatch_at(action, Utc::now());
    }

    /// Applies `action` as if it happened at `now`.
    pub fn dispatch_at(&mut self, action: Action, now: DateTime<Utc>) {
        self.state.apply(action, &mut self.storage, now);
        self.timers.sync(&self.state);
        if let Some(action) = TimerDriver::expiry_action(&self.state) {
            self.state.apply(action, &mut self.storage, now);
            self.timers.sync(&self.state);
        }
    }

    /// Lets `elapsed` pass, firing every timer that comes due in order.
    pub fn advance(&mut self, elapsed: Duration) {
        let mut budget = elapsed;
        while let Some(wait) = self.timers.next_deadline() {
            if wait > budget {
                self.timers.elapse(budget);
                return;
            }
            self.timers.elapse(wait);
            budget -= wait;
            while let Some(action) = self.timers.pop_due() {
                self.dispatch(action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Countdown, Grid, GridSize, MemoryStorage, Piece, Position, Rotation, SCORE_ANIMATION_TTL,
        ShapeKind, TICK_INTERVAL, TIMED_KEY, timer_for_level,
    };

    fn game() -> Game<MemoryStorage> {
        Game::with_seed(MemoryStorage::new(), PieceSeed::from_u64(99))
    }

    #[test]
    fn test_advance_ticks_countdown() {
        let mut game = game();
        game.dispatch(Action::Start);
        game.advance(Duration::from_millis(350));
        assert_eq!(
            game.state().countdown(),
            Countdown::Remaining(Duration::from_millis(9200))
        );
        game.advance(Duration::from_millis(50));
        assert_eq!(
            game.state().countdown(),
            Countdown::Remaining(Duration::from_millis(9100))
        );
    }

    #[test]
    fn test_advance_does_nothing_before_start() {
        let mut game = game();
        game.advance(Duration::from_secs(30));
        assert!(!game.state().has_started());
        assert!(!game.timers().is_tick_armed());
    }

    #[test]
    fn test_timeout_auto_places() {
        let mut game = game();
        game.dispatch(Action::Start);
        game.advance(timer_for_level(1));
        assert_eq!(game.state().turns_played(), 1);
        assert_eq!(
            game.state().countdown(),
            Countdown::Remaining(timer_for_level(1))
        );
    }

    #[test]
    fn test_pause_stops_timers() {
        let mut game = game();
        game.dispatch(Action::Start);
        game.advance(Duration::from_millis(500));
        game.dispatch(Action::SetOptionsMenu(true));
        game.advance(Duration::from_secs(60));
        assert_eq!(game.state().turns_played(), 0);
        assert_eq!(
            game.state().countdown(),
            Countdown::Remaining(Duration::from_millis(9000))
        );

        game.dispatch(Action::SetOptionsMenu(false));
        game.advance(TICK_INTERVAL);
        assert_eq!(
            game.state().countdown(),
            Countdown::Remaining(Duration::from_millis(8900))
        );
    }

    #[test]
    fn test_reset_drops_pending_tick() {
        let mut game = game();
        game.dispatch(Action::Start);
        game.advance(Duration::from_millis(9450));
        game.dispatch(Action::Reset);
        game.advance(Duration::from_secs(20));
        assert_eq!(game.state().turns_played(), 0);
        assert!(!game.state().has_started());
        assert!(!game.timers().is_tick_armed());
    }

    #[test]
    fn test_untimed_game_never_auto_places() {
        let mut game = game();
        game.dispatch(Action::ToggleTimed(false));
        game.dispatch(Action::Start);
        game.advance(Duration::from_secs(120));
        assert_eq!(game.state().turns_played(), 0);
        assert_eq!(game.storage().read(TIMED_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_score_animation_expires() {
        let mut game = game();
        game.dispatch(Action::Start);
        game.state.set_board(
            Grid::from_rows(&[[1, 1, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap(),
            Piece::new(ShapeKind::O, Rotation::default(), Position::new(2, 0)),
        );
        game.dispatch(Action::Place);
        assert_eq!(game.state().score(), 100);
        assert_eq!(game.state().score_animations().len(), 1);
        assert_eq!(game.timers().pending_animations(), 1);

        game.advance(SCORE_ANIMATION_TTL - Duration::from_millis(1));
        assert_eq!(game.state().score_animations().len(), 1);
        game.advance(Duration::from_millis(1));
        assert!(game.state().score_animations().is_empty());
        assert_eq!(game.timers().pending_animations(), 0);
    }

    #[test]
    fn test_grid_size_change_reaches_storage() {
        let mut game = game();
        game.dispatch(Action::ChangeGridSize(GridSize::Five));
        assert_eq!(game.state().grid(), &Grid::empty(GridSize::Five));
        let storage = game.into_storage();
        let reloaded = Game::new(storage);
        assert_eq!(reloaded.state().grid_size(), GridSize::Five);
    }
}
