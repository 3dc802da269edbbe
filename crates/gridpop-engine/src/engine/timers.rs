use std::{collections::BTreeMap, time::Duration};

use super::{
    action::{Action, AnimationId},
    state::GameState,
};

/// Interval between [`Action::TickTimer`] dispatches.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// How long a score pop-up stays before [`Action::RemoveScoreAnimation`].
pub const SCORE_ANIMATION_TTL: Duration = Duration::from_millis(1500);

/// Scheduled timer callbacks for a [`GameState`].
///
/// Holds the periodic countdown tick and one expiry per live score
/// animation. The driver never changes game state; it only reports which
/// action is due. Call [`TimerDriver::sync`] after every state change so
/// timers that no longer apply are dropped before they can fire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerDriver {
    /// Time until the next tick, or `None` while the countdown is stopped.
    tick: Option<Duration>,
    animations: BTreeMap<AnimationId, Duration>,
}

impl TimerDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms or disarms timers to match `state`.
    ///
    /// The tick runs only while the countdown is running (started, not over,
    /// timed, options closed); re-arming starts a full interval. Animations
    /// present in `state` get an expiry, and expiries of animations no
    /// longer present are dropped.
    pub fn sync(&mut self, state: &GameState) {
        if state.is_countdown_running() {
            self.tick.get_or_insert(TICK_INTERVAL);
        } else {
            self.tick = None;
        }

        let live: Vec<_> = state.score_animations().iter().map(|a| a.id).collect();
        self.animations.retain(|id, _| live.contains(id));
        for id in live {
            self.animations.entry(id).or_insert(SCORE_ANIMATION_TTL);
        }
    }

    /// Returns [`Action::AutoPlace`] if the countdown has run out in a state
    /// where it should be running.
    #[must_use]
    pub fn expiry_action(state: &GameState) -> Option<Action> {
        (state.is_countdown_running() && state.countdown().is_expired()).then_some(Action::AutoPlace)
    }

    /// Time until the earliest armed timer fires.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tick
            .into_iter()
            .chain(self.animations.values().copied())
            .min()
    }

    /// Moves every armed timer forward by `elapsed`.
    pub fn elapse(&mut self, elapsed: Duration) {
        if let Some(tick) = &mut self.tick {
            *tick = tick.saturating_sub(elapsed);
        }
        for remaining in self.animations.values_mut() {
            *remaining = remaining.saturating_sub(elapsed);
        }
    }

    /// Takes one due timer, tick first, and returns its action.
    ///
    /// A due tick is re-armed for the next interval.
    pub fn pop_due(&mut self) -> Option<Action> {
        if self.tick == Some(Duration::ZERO) {
            self.tick = Some(TICK_INTERVAL);
            return Some(Action::TickTimer);
        }
        let id = self
            .animations
            .iter()
            .find(|(_, remaining)| remaining.is_zero())
            .map(|(id, _)| *id)?;
        self.animations.remove(&id);
        Some(Action::RemoveScoreAnimation(id))
    }

    #[must_use]
    pub fn is_tick_armed(&self) -> bool {
        self.tick.is_some()
    }

    #[must_use]
    pub fn pending_animations(&self) -> usize {
        self.animations.len()
    }
}
