use crate::core::CellValue;

/// Flat bonus for leaving the whole grid empty after a clear.
pub const FULL_GRID_CLEAR_BONUS: u64 = 5000;

/// Points per cleared line for a given clear value: `value² × 100`.
#[must_use]
pub fn value_score(clear_value: CellValue) -> u64 {
    let value = u64::from(clear_value.get());
    value * value * 100
}

/// Extra multiple of [`value_score`] awarded for clearing several lines at once.
///
/// | Lines | Multiplier |
/// |-------|------------|
/// | 1     | 0          |
/// | 2     | 2          |
/// | 3     | 4          |
/// | 4     | 8          |
///
/// Any other count (including the five-plus clears a 5×5 grid allows) gets 0.
#[must_use]
pub const fn line_count_multiplier(line_count: usize) -> u64 {
    match line_count {
        2 => 2,
        3 => 4,
        4 => 8,
        _ => 0,
    }
}

/// Points for one clear event, excluding the full-grid bonus.
#[must_use]
pub fn line_clear_base_score(clear_value: CellValue, line_count: usize) -> u64 {
    let per_line = value_score(clear_value);
    per_line * line_count as u64 + per_line * line_count_multiplier(line_count)
}

/// Points for one clear event.
///
/// `level` does not affect the result; it is accepted so callers pass the
/// level in effect at the time of the clear.
///
/// # Example
///
/// ```
/// use gridpop_engine::{CellValue, line_clear_score};
///
/// let two = CellValue::new(2).unwrap();
/// // 2 lines: 400 × 2 base + 400 × 2 bonus
/// assert_eq!(line_clear_score(two, 2, false, 1), 1600);
/// assert_eq!(line_clear_score(two, 2, true, 1), 6600);
/// ```
#[must_use]
pub fn line_clear_score(
    clear_value: CellValue,
    line_count: usize,
    full_grid_clear: bool,
    _level: u32,
) -> u64 {
    let bonus = if full_grid_clear {
        FULL_GRID_CLEAR_BONUS
    } else {
        0
    };
    line_clear_base_score(clear_value, line_count) + bonus
}
