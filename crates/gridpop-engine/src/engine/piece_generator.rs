use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::IndexedRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{GridSize, Piece, ShapeKind};

/// Seeded source of new pieces and other game randomness.
///
/// Kinds are drawn uniformly from [`ShapeKind::available_for`] the current
/// grid size. The generator lives inside the game state, so cloning a state
/// also clones its future piece sequence.
///
/// # Example
///
/// ```
/// use gridpop_engine::{GridSize, PieceGenerator, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceGenerator::with_seed(seed);
/// let mut b = PieceGenerator::with_seed(seed);
/// assert_eq!(a.next_piece(GridSize::Five), b.next_piece(GridSize::Five));
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit value serialized as a 32-character hex string. The same seed
/// and the same sequence of actions reproduce the same game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self((value as u128).to_be_bytes())
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Draws a random shape kind allowed on a grid of `size`.
    pub fn next_kind(&mut self, size: GridSize) -> ShapeKind {
        *ShapeKind::available_for(size)
            .choose(&mut self.rng)
            .unwrap_or(&ShapeKind::O)
    }

    /// Draws a new piece at its spawn location.
    pub fn next_piece(&mut self, size: GridSize) -> Piece {
        Piece::spawn(self.next_kind(size), size)
    }

    /// Uniform integer in `low..=high`.
    pub(crate) fn between(&mut self, low: i32, high: i32) -> i32 {
        self.rng.random_range(low..=high)
    }
}
