use chrono::Utc;
use gridpop_engine::HighScoreLedger;

use crate::storage::FileStorage;

pub fn run(storage: &FileStorage) {
    let ledger = HighScoreLedger::load(storage, Utc::now());
    print!("{}", format_ledger(&ledger));
}

fn format_ledger(ledger: &HighScoreLedger) -> String {
    let mut lines = vec![];
    for (mode, entries) in ledger.categories() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(mode.to_string());
        if entries.is_empty() {
            lines.push("  (no scores yet)".to_owned());
        }
        for (rank, entry) in entries.iter().enumerate() {
            lines.push(format!(
                "  {:>2}. {:>8}  {:>4} lines  {}",
                rank + 1,
                entry.score,
                entry.lines_cleared,
                entry.date.format("%Y-%m-%d"),
            ));
        }
    }
    lines.push(String::new());
    lines.join("\n")
}
