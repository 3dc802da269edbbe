use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::GridSize;

use super::storage::{HIGH_SCORES_KEY, Storage};

/// Entries kept per [`GameMode`].
pub const MAX_ENTRIES_PER_MODE: usize = 5;

/// Grid size and timed flag; the ledger keeps a separate top list for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{grid_size} {}", if *timed { "Timed" } else { "Untimed" })]
pub struct GameMode {
    pub grid_size: GridSize,
    pub timed: bool,
}

impl GameMode {
    /// All modes in ledger display order.
    pub const ALL: [Self; 4] = [
        Self::new(GridSize::Four, true),
        Self::new(GridSize::Four, false),
        Self::new(GridSize::Five, true),
        Self::new(GridSize::Five, false),
    ];

    #[must_use]
    pub const fn new(grid_size: GridSize, timed: bool) -> Self {
        Self { grid_size, timed }
    }
}

/// One finished game in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreEntry {
    pub score: u64,
    pub date: DateTime<Utc>,
    pub grid_size: GridSize,
    pub is_timed: bool,
    #[serde(default)]
    pub lines_cleared: u32,
}

impl HighScoreEntry {
    #[must_use]
    pub const fn mode(&self) -> GameMode {
        GameMode::new(self.grid_size, self.is_timed)
    }
}

/// Stored row as found in the ledger: old versions saved bare scores.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Entry(HighScoreEntry),
    Legacy(u64),
}

/// Bounded leaderboard partitioned by [`GameMode`].
///
/// Each mode keeps at most [`MAX_ENTRIES_PER_MODE`] entries, sorted by score
/// from highest to lowest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScoreLedger {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreLedger {
    /// Builds a ledger from arbitrary entries, enforcing per-mode order and limits.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = HighScoreEntry>) -> Self {
        let mut ledger = Self::default();
        for entry in entries {
            ledger.insert(entry);
        }
        ledger
    }

    /// Reads the ledger from storage. Missing data or a value that is not an
    /// array gives an empty ledger. Rows that fail to parse are skipped on
    /// their own; legacy rows are dated `now`.
    pub fn load(storage: &dyn Storage, now: DateTime<Utc>) -> Self {
        let Some(raw) = storage.read(HIGH_SCORES_KEY) else {
            return Self::default();
        };
        let Ok(rows) = serde_json::from_str::<Vec<serde_json::Value>>(&raw) else {
            return Self::default();
        };
        let rows = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value::<StoredEntry>(row).ok());
        Self::from_entries(rows.map(|row| match row {
            StoredEntry::Entry(entry) => entry,
            StoredEntry::Legacy(score) => HighScoreEntry {
                score,
                date: now,
                grid_size: GridSize::Four,
                is_timed: true,
                lines_cleared: 0,
            },
        }))
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        if let Ok(json) = serde_json::to_string(&self.entries) {
            storage.write(HIGH_SCORES_KEY, &json);
        }
    }

    /// Adds a finished game. Zero scores are not recorded.
    ///
    /// Returns `true` if the entry made it into its mode's top list.
    pub fn record(&mut self, entry: HighScoreEntry) -> bool {
        if entry.score == 0 {
            return false;
        }
        self.insert(entry)
    }

    fn insert(&mut self, entry: HighScoreEntry) -> bool {
        let mode = entry.mode();
        let (mut same_mode, others): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.mode() == mode);
        self.entries = others;
        same_mode.sort_by(|a, b| b.score.cmp(&a.score));
        // older entries stay ahead of equal newer ones
        let index = same_mode.partition_point(|e| e.score >= entry.score);
        let kept = index < MAX_ENTRIES_PER_MODE;
        if kept {
            same_mode.insert(index, entry);
            same_mode.truncate(MAX_ENTRIES_PER_MODE);
        }
        self.entries.extend(same_mode);
        kept
    }

    /// Highest score recorded for `mode`, or 0.
    #[must_use]
    pub fn best_score(&self, mode: GameMode) -> u64 {
        self.entries_for(mode).map(|e| e.score).max().unwrap_or(0)
    }

    /// Entries of one mode, highest first.
    pub fn entries_for(&self, mode: GameMode) -> impl Iterator<Item = &HighScoreEntry> {
        self.entries.iter().filter(move |e| e.mode() == mode)
    }

    /// Every mode with its entries, in [`GameMode::ALL`] order.
    pub fn categories(&self) -> impl Iterator<Item = (GameMode, Vec<&HighScoreEntry>)> {
        GameMode::ALL
            .into_iter()
            .map(|mode| (mode, self.entries_for(mode).collect()))
    }

    #[must_use]
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::MemoryStorage;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn entry(score: u64, grid_size: GridSize, is_timed: bool) -> HighScoreEntry {
        HighScoreEntry {
            score,
            date: date(),
            grid_size,
            is_timed,
            lines_cleared: 3,
        }
    }

    #[test]
    fn test_keeps_top_five_per_mode() {
        let mut ledger = HighScoreLedger::default();
        for score in [100, 700, 300, 500, 200, 600] {
            ledger.record(entry(score, GridSize::Four, true));
        }
        ledger.record(entry(50, GridSize::Five, false));

        let scores: Vec<_> = ledger
            .entries_for(GameMode::new(GridSize::Four, true))
            .map(|e| e.score)
            .collect();
        assert_eq!(scores, vec![700, 600, 500, 300, 200]);
        assert_eq!(ledger.best_score(GameMode::new(GridSize::Five, false)), 50);
        assert_eq!(ledger.best_score(GameMode::new(GridSize::Five, true)), 0);
    }

    #[test]
    fn test_record_reports_placement() {
        let mut ledger = HighScoreLedger::from_entries(
            (1..=5).map(|n| entry(n * 1000, GridSize::Four, false)),
        );
        assert!(!ledger.record(entry(10, GridSize::Four, false)));
        assert!(ledger.record(entry(2500, GridSize::Four, false)));
        assert!(!ledger.record(entry(0, GridSize::Five, true)));
        assert_eq!(ledger.entries().len(), 5);
    }

    #[test]
    fn test_categories_order() {
        let ledger = HighScoreLedger::from_entries([
            entry(1, GridSize::Five, false),
            entry(2, GridSize::Four, true),
        ]);
        let modes: Vec<_> = ledger.categories().map(|(mode, _)| mode.to_string()).collect();
        assert_eq!(
            modes,
            vec!["4x4 Timed", "4x4 Untimed", "5x5 Timed", "5x5 Untimed"]
        );
        let sizes: Vec<_> = ledger.categories().map(|(_, e)| e.len()).collect();
        assert_eq!(sizes, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::new();
        let ledger = HighScoreLedger::from_entries([
            entry(900, GridSize::Five, true),
            entry(400, GridSize::Four, false),
        ]);
        ledger.save(&mut storage);

        let raw = storage.read(HIGH_SCORES_KEY).unwrap();
        assert!(raw.contains("\"gridSize\":5"));
        assert!(raw.contains("\"isTimed\":true"));
        assert!(raw.contains("\"linesCleared\":3"));

        assert_eq!(HighScoreLedger::load(&storage, date()), ledger);
    }

    #[test]
    fn test_load_legacy_and_malformed() {
        let storage = MemoryStorage::new().with_value(
            HIGH_SCORES_KEY,
            r#"[300, {"score": 800, "date": "2024-01-02T03:04:05Z", "gridSize": 5, "isTimed": false}]"#,
        );
        let ledger = HighScoreLedger::load(&storage, date());
        let legacy: Vec<_> = ledger
            .entries_for(GameMode::new(GridSize::Four, true))
            .collect();
        assert_eq!(legacy.len(), 1);
        assert_eq!(legacy[0].score, 300);
        assert_eq!(legacy[0].date, date());
        assert_eq!(legacy[0].lines_cleared, 0);
        assert_eq!(ledger.best_score(GameMode::new(GridSize::Five, false)), 800);

        let storage = MemoryStorage::new().with_value(HIGH_SCORES_KEY, "oops");
        assert!(HighScoreLedger::load(&storage, date()).is_empty());
        assert!(HighScoreLedger::load(&MemoryStorage::new(), date()).is_empty());
    }

    #[test]
    fn test_bad_rows_do_not_drop_good_ones() {
        let mut storage = MemoryStorage::new().with_value(
            HIGH_SCORES_KEY,
            r#"[
                {"score": 9000, "date": "2024-01-02T03:04:05Z", "gridSize": 4, "isTimed": true, "linesCleared": 12},
                {"score": 800, "date": "not a date", "gridSize": 4, "isTimed": true},
                {"score": 500, "date": "2024-01-02T03:04:05Z", "gridSize": 6, "isTimed": true},
                "junk"
            ]"#,
        );
        let mode = GameMode::new(GridSize::Four, true);
        let mut ledger = HighScoreLedger::load(&storage, date());
        assert_eq!(ledger.entries().len(), 1);
        assert_eq!(ledger.best_score(mode), 9000);

        assert!(ledger.record(entry(100, GridSize::Four, true)));
        ledger.save(&mut storage);
        let scores: Vec<_> = HighScoreLedger::load(&storage, date())
            .entries_for(mode)
            .map(|e| e.score)
            .collect();
        assert_eq!(scores, vec![9000, 100]);
    }

    #[test]
    fn test_equal_entry_past_the_limit_is_not_kept() {
        let mut ledger =
            HighScoreLedger::from_entries((0..5).map(|_| entry(1000, GridSize::Five, true)));
        assert!(!ledger.record(entry(1000, GridSize::Five, true)));
        assert_eq!(ledger.entries().len(), 5);

        let mut ledger =
            HighScoreLedger::from_entries((0..4).map(|_| entry(1000, GridSize::Five, true)));
        assert!(ledger.record(entry(1000, GridSize::Five, true)));
        assert_eq!(ledger.entries().len(), 5);
    }
}
