use serde::{Deserialize, Serialize};

use crate::core::{GridSize, Position, RotationDirection};

use super::preferences::KeyConfigUpdate;

/// Identifier of a [`ScoreAnimation`](super::state::ScoreAnimation).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
pub struct AnimationId(pub u64);

/// Everything that can change a [`GameState`](super::state::GameState).
///
/// Actions whose preconditions do not hold leave the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    /// Begins a new game with a fresh grid, piece and queue.
    Start,
    /// Places the current piece where it is.
    Place,
    Rotate(RotationDirection),
    /// Moves the current piece to an absolute position if it fits there.
    Move(Position),
    Hold,
    /// Removes one timer step from the countdown.
    TickTimer,
    /// Places the current piece on time-out, searching for a spot if needed.
    AutoPlace,
    ChangeGridSize(GridSize),
    ToggleTimed(bool),
    UpdateKeyConfig(KeyConfigUpdate),
    /// Opens or closes the options menu; gameplay pauses while it is open.
    SetOptionsMenu(bool),
    /// Returns to the not-started state.
    Reset,
    RemoveScoreAnimation(AnimationId),
}
