use std::time::Duration;

/// Placements needed to advance one level.
pub const TURNS_PER_LEVEL: u32 = 10;

/// Countdown before any level reduction.
pub const INITIAL_TIMER: Duration = Duration::from_secs(10);

/// Countdown reduction per level.
pub const TIMER_DECREASE_PER_LEVEL: Duration = Duration::from_millis(500);

/// Shortest countdown at any level.
pub const MIN_TIMER: Duration = Duration::from_millis(500);

/// Amount removed from the countdown by one timer tick.
pub const TIMER_TICK: Duration = Duration::from_millis(100);

/// Level reached after `turns_played` placements, starting at 1.
#[must_use]
pub const fn level_for_turns(turns_played: u32) -> u32 {
    turns_played / TURNS_PER_LEVEL + 1
}

/// Countdown length for a level: 10 s minus 0.5 s per level, at least 0.5 s.
#[must_use]
pub fn timer_for_level(level: u32) -> Duration {
    INITIAL_TIMER
        .saturating_sub(TIMER_DECREASE_PER_LEVEL.saturating_mul(level))
        .max(MIN_TIMER)
}

/// Time left to place the current piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Countdown {
    /// Untimed mode: never expires.
    Unlimited,
    Remaining(Duration),
}

impl Countdown {
    /// Full countdown for `level`, or [`Countdown::Unlimited`] when not timed.
    #[must_use]
    pub fn for_level(level: u32, timed: bool) -> Self {
        if timed {
            Self::Remaining(timer_for_level(level))
        } else {
            Self::Unlimited
        }
    }

    /// Returns the countdown after one [`TIMER_TICK`], floored at zero.
    #[must_use]
    pub fn ticked(self) -> Self {
        match self {
            Self::Unlimited => Self::Unlimited,
            Self::Remaining(remaining) => Self::Remaining(remaining.saturating_sub(TIMER_TICK)),
        }
    }

    #[must_use]
    pub fn is_expired(self) -> bool {
        self == Self::Remaining(Duration::ZERO)
    }

    #[must_use]
    pub fn remaining(self) -> Option<Duration> {
        match self {
            Self::Unlimited => None,
            Self::Remaining(remaining) => Some(remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_turns() {
        for turns in 0..10 {
            assert_eq!(level_for_turns(turns), 1);
        }
        for turns in 10..20 {
            assert_eq!(level_for_turns(turns), 2);
        }
        assert_eq!(level_for_turns(95), 10);
    }

    #[test]
    fn test_timer_for_level() {
        assert_eq!(timer_for_level(0), Duration::from_secs(10));
        assert_eq!(timer_for_level(1), Duration::from_millis(9500));
        assert_eq!(timer_for_level(10), Duration::from_secs(5));
        assert_eq!(timer_for_level(19), Duration::from_millis(500));
        assert_eq!(timer_for_level(20), MIN_TIMER);
        assert_eq!(timer_for_level(u32::MAX), MIN_TIMER);
    }

    #[test]
    fn test_timer_non_increasing() {
        let mut previous = timer_for_level(0);
        for level in 1..100 {
            let current = timer_for_level(level);
            assert!(current <= previous);
            assert!(current >= MIN_TIMER);
            previous = current;
        }
    }

    #[test]
    fn test_countdown_ticks_to_zero() {
        let mut countdown = Countdown::Remaining(Duration::from_millis(250));
        countdown = countdown.ticked();
        assert_eq!(countdown.remaining(), Some(Duration::from_millis(150)));
        countdown = countdown.ticked().ticked();
        assert!(countdown.is_expired());
        assert!(countdown.ticked().is_expired());

        assert_eq!(Countdown::Unlimited.ticked(), Countdown::Unlimited);
        assert!(!Countdown::Unlimited.is_expired());
        assert!(Countdown::for_level(3, false).is_unlimited());
    }
}
