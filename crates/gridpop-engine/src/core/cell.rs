use serde::{Deserialize, Serialize};

use crate::InvalidCellValue;

/// Value stored in a single grid cell.
///
/// - `0`: empty
/// - `1`-`6`: active values
/// - `7`: overflow; a grid holding this value is game over
///
/// Values never exceed [`CellValue::MAX`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct CellValue(u8);

impl CellValue {
    pub const EMPTY: Self = Self(0);
    pub const MAX: Self = Self(7);

    /// Creates a cell value, returning `None` when `value` exceeds 7.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_max(self) -> bool {
        self.0 == Self::MAX.0
    }

    /// Returns the value after one more piece cell lands on it, capped at 7.
    #[must_use]
    pub const fn incremented(self) -> Self {
        if self.0 >= Self::MAX.0 {
            Self::MAX
        } else {
            Self(self.0 + 1)
        }
    }
}

impl TryFrom<u8> for CellValue {
    type Error = InvalidCellValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidCellValue(value))
    }
}

impl From<CellValue> for u8 {
    fn from(value: CellValue) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_caps_at_max() {
        let mut value = CellValue::EMPTY;
        for expected in 1..=7 {
            value = value.incremented();
            assert_eq!(value.get(), expected);
        }
        assert_eq!(value.incremented(), CellValue::MAX);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(CellValue::new(8), None);
        assert_eq!(CellValue::try_from(9), Err(InvalidCellValue(9)));
        assert!(serde_json::from_str::<CellValue>("8").is_err());
        assert_eq!(serde_json::from_str::<CellValue>("6").unwrap().get(), 6);
    }
}
