use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::core::{CellValue, Grid, GridSize, Piece, Position};

use super::{
    action::{Action, AnimationId},
    high_scores::{GameMode, HighScoreEntry, HighScoreLedger},
    kick::resolve_rotation,
    piece_generator::PieceGenerator,
    preferences::{KeyConfig, KeyConfigUpdate, Preferences},
    progression::{Countdown, level_for_turns},
    scoring::{FULL_GRID_CLEAR_BONUS, line_clear_base_score, line_clear_score},
    storage::Storage,
};

/// Number of upcoming pieces shown to the player.
pub const NEXT_QUEUE_LEN: usize = 4;

/// Random positions tried by [`Action::AutoPlace`] before scanning the grid.
pub const AUTO_PLACE_RANDOM_ATTEMPTS: usize = 50;

/// Transient score pop-up created by a clear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreAnimation {
    pub id: AnimationId,
    pub value: u64,
    /// Grid-relative anchor; the centre of the grid, fractional on 5×5.
    pub x: f32,
    pub y: f32,
    /// Value of the cleared lines, or [`CellValue::MAX`] for the full-grid bonus.
    pub clear_value: CellValue,
}

/// The whole game aggregate.
///
/// A `GameState` only changes through [`GameState::reduce`]. The phases are
/// implied by three flags:
///
/// - not started: `has_started` is false
/// - playing: started and not over; gameplay actions apply unless the
///   options menu is open
/// - game over: only [`Action::Start`], [`Action::Reset`] and preference
///   changes have an effect
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    current: Option<Piece>,
    next_queue: VecDeque<Piece>,
    held: Option<Piece>,
    can_hold: bool,
    score: u64,
    level: u32,
    turns_played: u32,
    countdown: Countdown,
    game_over: bool,
    has_started: bool,
    show_options_menu: bool,
    lines_cleared: u32,
    preferences: Preferences,
    high_scores: HighScoreLedger,
    best_score: u64,
    score_animations: Vec<ScoreAnimation>,
    next_animation_id: u64,
    generator: PieceGenerator,
}

impl GameState {
    /// Creates a not-started state from explicit preferences and ledger.
    #[must_use]
    pub fn new(
        preferences: Preferences,
        high_scores: HighScoreLedger,
        generator: PieceGenerator,
    ) -> Self {
        let mode = GameMode::new(preferences.grid_size, preferences.timed);
        Self {
            grid: Grid::empty(preferences.grid_size),
            current: None,
            next_queue: VecDeque::with_capacity(NEXT_QUEUE_LEN),
            held: None,
            can_hold: true,
            score: 0,
            level: 1,
            turns_played: 0,
            countdown: Countdown::for_level(1, preferences.timed),
            game_over: false,
            has_started: false,
            show_options_menu: false,
            lines_cleared: 0,
            best_score: high_scores.best_score(mode),
            preferences,
            high_scores,
            score_animations: vec![],
            next_animation_id: 0,
            generator,
        }
    }

    /// Creates a not-started state from persisted preferences and ledger.
    #[must_use]
    pub fn load(storage: &dyn Storage, generator: PieceGenerator, now: DateTime<Utc>) -> Self {
        Self::new(
            Preferences::load(storage),
            HighScoreLedger::load(storage, now),
            generator,
        )
    }

    /// Applies `action` and returns the resulting state.
    ///
    /// `now` dates any high-score entry the action produces. Actions whose
    /// preconditions do not hold return an unchanged copy.
    #[must_use]
    pub fn reduce(&self, action: Action, storage: &mut dyn Storage, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.apply(action, storage, now);
        next
    }

    pub(crate) fn apply(&mut self, action: Action, storage: &mut dyn Storage, now: DateTime<Utc>) {
        match action {
            Action::Start => self.start(storage, now),
            Action::Place => self.place(storage, now),
            Action::Rotate(direction) => {
                if let Some(piece) = self.active_piece() {
                    let rotation = piece.rotation().rotated(direction);
                    if let Some(position) = resolve_rotation(&self.grid, &piece, rotation) {
                        self.current = Some(piece.with_rotation(rotation).with_position(position));
                    }
                }
            }
            Action::Move(position) => {
                if let Some(piece) = self.active_piece()
                    && self.grid.is_valid_at(&piece, position)
                {
                    self.current = Some(piece.with_position(position));
                }
            }
            Action::Hold => self.hold(),
            Action::TickTimer => {
                if self.accepts_gameplay() {
                    self.countdown = self.countdown.ticked();
                }
            }
            Action::AutoPlace => self.auto_place(storage, now),
            Action::ChangeGridSize(grid_size) => {
                if grid_size != self.preferences.grid_size {
                    self.preferences.grid_size = grid_size;
                    self.change_mode(storage, now);
                }
            }
            Action::ToggleTimed(timed) => {
                if timed != self.preferences.timed {
                    self.preferences.timed = timed;
                    self.change_mode(storage, now);
                }
            }
            Action::UpdateKeyConfig(update) => self.update_key_config(&update, storage),
            Action::SetOptionsMenu(open) => self.show_options_menu = open,
            Action::Reset => self.reset(),
            Action::RemoveScoreAnimation(id) => self.score_animations.retain(|a| a.id != id),
        }
    }

    fn start(&mut self, storage: &dyn Storage, now: DateTime<Utc>) {
        let size = self.preferences.grid_size;
        self.reset_session();
        self.current = Some(self.generator.next_piece(size));
        self.next_queue = (0..NEXT_QUEUE_LEN)
            .map(|_| self.generator.next_piece(size))
            .collect();
        self.has_started = true;
        self.reload_high_scores(storage, now);
    }

    fn place(&mut self, storage: &mut dyn Storage, now: DateTime<Utc>) {
        let Some(piece) = self.active_piece() else {
            return;
        };
        if self.grid.is_valid_position(&piece) {
            self.commit_placement(&piece, storage, now);
        }
    }

    fn auto_place(&mut self, storage: &mut dyn Storage, now: DateTime<Utc>) {
        let Some(piece) = self.active_piece() else {
            return;
        };
        let position = if self.grid.is_valid_position(&piece) {
            Some(piece.position())
        } else {
            self.find_valid_position(&piece)
        };
        match position {
            Some(position) => self.commit_placement(&piece.with_position(position), storage, now),
            None => {
                self.game_over = true;
                self.record_high_score(storage, now);
            }
        }
    }

    /// Searches for any position where `piece` fits: random samples first,
    /// then every candidate in row-major order.
    fn find_valid_position(&mut self, piece: &Piece) -> Option<Position> {
        let (min_dx, min_dy, max_dx, max_dy) = piece.mask().occupied_bounds();
        let side = i32::try_from(self.grid.side()).ok()?;
        let x_range = (-i32::try_from(min_dx).ok()?, side - 1 - i32::try_from(max_dx).ok()?);
        let y_range = (-i32::try_from(min_dy).ok()?, side - 1 - i32::try_from(max_dy).ok()?);
        if x_range.0 > x_range.1 || y_range.0 > y_range.1 {
            return None;
        }

        for _ in 0..AUTO_PLACE_RANDOM_ATTEMPTS {
            let position = Position::new(
                self.generator.between(x_range.0, x_range.1),
                self.generator.between(y_range.0, y_range.1),
            );
            if self.grid.is_valid_at(piece, position) {
                return Some(position);
            }
        }

        (y_range.0..=y_range.1)
            .flat_map(|y| (x_range.0..=x_range.1).map(move |x| Position::new(x, y)))
            .find(|&position| self.grid.is_valid_at(piece, position))
    }

    /// Places a piece already known to fit, then advances the game.
    fn commit_placement(&mut self, piece: &Piece, storage: &mut dyn Storage, now: DateTime<Utc>) {
        debug_assert!(self.grid.is_valid_position(piece));
        let size = self.preferences.grid_size;

        let placed = self.grid.with_piece_placed(piece);
        let clear = placed.lines_to_clear();
        let line_count = clear.line_count();
        self.grid = placed;

        if !clear.is_empty() {
            self.grid = placed.with_lines_cleared(clear.rows(), clear.cols());
            let full_grid_clear = self.grid.is_cleared();
            let clear_value = clear.clear_value();

            self.push_score_animation(line_clear_base_score(clear_value, line_count), clear_value);
            if full_grid_clear {
                self.push_score_animation(FULL_GRID_CLEAR_BONUS, CellValue::MAX);
            }
            self.score += line_clear_score(clear_value, line_count, full_grid_clear, self.level);
        }

        self.turns_played += 1;
        self.level = level_for_turns(self.turns_played);
        self.lines_cleared += u32::try_from(line_count).unwrap_or(u32::MAX);
        self.current = self.next_queue.pop_front();
        self.next_queue.push_back(self.generator.next_piece(size));
        self.can_hold = true;
        self.countdown = Countdown::for_level(self.level, self.preferences.timed);

        if self.grid.is_game_over() {
            self.game_over = true;
            self.record_high_score(storage, now);
        }
    }

    fn hold(&mut self) {
        if !self.can_hold {
            return;
        }
        let Some(piece) = self.active_piece() else {
            return;
        };
        match self.held.replace(piece) {
            Some(previous) => self.current = Some(previous),
            None => {
                self.current = self.next_queue.pop_front();
                let size = self.preferences.grid_size;
                self.next_queue.push_back(self.generator.next_piece(size));
            }
        }
        self.can_hold = false;
    }

    fn change_mode(&mut self, storage: &mut dyn Storage, now: DateTime<Utc>) {
        self.reset_session();
        self.preferences.save(storage);
        self.reload_high_scores(storage, now);
    }

    fn update_key_config(&mut self, update: &KeyConfigUpdate, storage: &mut dyn Storage) {
        self.preferences.key_config = self.preferences.key_config.merged(update);
        self.preferences.save(storage);
    }

    fn reset(&mut self) {
        self.reset_session();
        self.show_options_menu = false;
    }

    /// Clears everything tied to one game, keeping preferences and the ledger.
    fn reset_session(&mut self) {
        self.grid = Grid::empty(self.preferences.grid_size);
        self.current = None;
        self.next_queue.clear();
        self.held = None;
        self.can_hold = true;
        self.score = 0;
        self.level = 1;
        self.turns_played = 0;
        self.countdown = Countdown::for_level(1, self.preferences.timed);
        self.game_over = false;
        self.has_started = false;
        self.lines_cleared = 0;
        self.score_animations.clear();
    }

    fn reload_high_scores(&mut self, storage: &dyn Storage, now: DateTime<Utc>) {
        self.high_scores = HighScoreLedger::load(storage, now);
        self.best_score = self.high_scores.best_score(self.mode());
    }

    fn record_high_score(&mut self, storage: &mut dyn Storage, now: DateTime<Utc>) {
        let entry = HighScoreEntry {
            score: self.score,
            date: now,
            grid_size: self.preferences.grid_size,
            is_timed: self.preferences.timed,
            lines_cleared: self.lines_cleared,
        };
        if self.high_scores.record(entry) {
            self.high_scores.save(storage);
        }
        self.best_score = self.high_scores.best_score(self.mode());
    }

    fn push_score_animation(&mut self, value: u64, clear_value: CellValue) {
        let centre = f32::from(u8::from(self.preferences.grid_size)) / 2.0;
        self.score_animations.push(ScoreAnimation {
            id: AnimationId(self.next_animation_id),
            value,
            x: centre,
            y: centre,
            clear_value,
        });
        self.next_animation_id += 1;
    }

    /// Current piece, if gameplay actions are accepted right now.
    fn active_piece(&self) -> Option<Piece> {
        self.accepts_gameplay().then_some(self.current).flatten()
    }

    fn accepts_gameplay(&self) -> bool {
        self.is_playing() && !self.show_options_menu
    }

    /// Returns `true` between [`Action::Start`] and game over.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.has_started && !self.game_over
    }

    /// Returns `true` while the countdown should be ticking.
    #[must_use]
    pub fn is_countdown_running(&self) -> bool {
        self.accepts_gameplay() && self.preferences.timed
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    /// Head of the next queue: the piece that follows the current one.
    #[must_use]
    pub fn next_piece(&self) -> Option<&Piece> {
        self.next_queue.front()
    }

    pub fn next_queue(&self) -> impl Iterator<Item = &Piece> {
        self.next_queue.iter()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    #[must_use]
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.has_started
    }

    #[must_use]
    pub fn is_options_menu_open(&self) -> bool {
        self.show_options_menu
    }

    #[must_use]
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    #[must_use]
    pub fn key_config(&self) -> &KeyConfig {
        &self.preferences.key_config
    }

    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        self.preferences.grid_size
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.preferences.timed
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        GameMode::new(self.preferences.grid_size, self.preferences.timed)
    }

    #[must_use]
    pub fn high_scores(&self) -> &HighScoreLedger {
        &self.high_scores
    }

    #[must_use]
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    #[must_use]
    pub fn score_animations(&self) -> &[ScoreAnimation] {
        &self.score_animations
    }
}

#[cfg(test)]
impl GameState {
    pub(crate) fn set_board(&mut self, grid: Grid, current: Piece) {
        self.grid = grid;
        self.current = Some(current);
    }
}
