//! Highscore table and its on-disk storage.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use matris_engine::GameResult;
use serde::{Deserialize, Serialize};

use crate::util;

/// Number of entries kept in the table.
pub const MAX_ENTRIES: usize = 10;

/// Longest player name kept, in characters.
pub const MAX_NAME_LEN: usize = 16;

pub const ANONYMOUS: &str = "Anonymous";

/// Trims `name` and caps it to [`MAX_NAME_LEN`] characters.
///
/// A blank name becomes [`ANONYMOUS`].
pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return ANONYMOUS.to_owned();
    }
    name.chars().take(MAX_NAME_LEN).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub name: String,
    pub score: usize,
    pub level: usize,
    pub lines: usize,
    pub date: DateTime<Utc>,
}

impl HighscoreEntry {
    pub fn new(name: &str, result: GameResult, date: DateTime<Utc>) -> Self {
        Self {
            name: normalize_name(name),
            score: result.score,
            level: result.level,
            lines: result.lines,
            date,
        }
    }
}

/// The best [`MAX_ENTRIES`] results, highest score first.
///
/// Entries with equal scores keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HighscoreEntry>", into = "Vec<HighscoreEntry>")]
pub struct HighscoreTable {
    entries: Vec<HighscoreEntry>,
}

impl From<Vec<HighscoreEntry>> for HighscoreTable {
    fn from(mut entries: Vec<HighscoreEntry>) -> Self {
        for entry in &mut entries {
            entry.name = normalize_name(&entry.name);
        }
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }
}

impl From<HighscoreTable> for Vec<HighscoreEntry> {
    fn from(table: HighscoreTable) -> Self {
        table.entries
    }
}

impl HighscoreTable {
    pub fn entries(&self) -> &[HighscoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `entry` and returns its rank (0-based), or `None` if it did not
    /// make the table.
    pub fn insert(&mut self, entry: HighscoreEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        if rank >= MAX_ENTRIES {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }
}

/// Highscore files: a primary location and a fallback copy.
#[derive(Debug, Clone)]
pub struct HighscoreStore {
    primary: PathBuf,
    fallback: PathBuf,
}

impl HighscoreStore {
    pub fn new(primary: PathBuf, fallback: PathBuf) -> Self {
        Self { primary, fallback }
    }

    /// Loads the table from the primary file, falling back to the fallback file.
    ///
    /// Returns an empty table when neither file can be read.
    pub fn load(&self) -> HighscoreTable {
        [&self.primary, &self.fallback]
            .into_iter()
            .find_map(|path| util::read_json_file("highscore", path).ok())
            .unwrap_or_default()
    }

    /// Writes the table to the primary file and always to the fallback file.
    ///
    /// Returns the failures; an empty list means both writes succeeded.
    pub fn save(&self, table: &HighscoreTable) -> Vec<anyhow::Error> {
        [&self.primary, &self.fallback]
            .into_iter()
            .filter_map(|path| util::write_json_file("highscore", path, table).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, process};

    use chrono::TimeZone as _;

    use super::*;

    fn entry(name: &str, score: usize) -> HighscoreEntry {
        HighscoreEntry {
            name: name.to_owned(),
            score,
            level: 1,
            lines: 0,
            date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn names(table: &HighscoreTable) -> Vec<&str> {
        table.entries().iter().map(|e| e.name.as_str()).collect()
    }

    fn temp_dir(test_name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("matris-{}-{test_name}", process::id()));
        _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  alice "), "alice");
        assert_eq!(normalize_name(""), ANONYMOUS);
        assert_eq!(normalize_name("   "), ANONYMOUS);
        assert_eq!(normalize_name("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmnop");
        assert_eq!(normalize_name("ééééééééééééééééé").chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_entry_from_result() {
        let result = GameResult {
            score: 1234,
            level: 3,
            lines: 25,
        };
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let entry = HighscoreEntry::new(" ", result, date);
        assert_eq!(entry.name, ANONYMOUS);
        assert_eq!((entry.score, entry.level, entry.lines), (1234, 3, 25));
        assert_eq!(entry.date, date);
    }

    #[test]
    fn test_insert_sorts_descending() {
        let mut table = HighscoreTable::default();
        assert_eq!(table.insert(entry("b", 200)), Some(0));
        assert_eq!(table.insert(entry("a", 300)), Some(0));
        assert_eq!(table.insert(entry("c", 100)), Some(2));
        assert_eq!(names(&table), ["a", "b", "c"]);
    }

    #[test]
    fn test_insert_ties_keep_insertion_order() {
        let mut table = HighscoreTable::default();
        table.insert(entry("first", 500));
        table.insert(entry("second", 500));
        assert_eq!(table.insert(entry("third", 500)), Some(2));
        assert_eq!(names(&table), ["first", "second", "third"]);
    }

    #[test]
    fn test_table_is_capped() {
        let mut table = HighscoreTable::default();
        for score in 1..=MAX_ENTRIES {
            table.insert(entry(&score.to_string(), score * 10));
        }
        assert_eq!(table.entries().len(), MAX_ENTRIES);

        // Lower than everything: rejected.
        assert_eq!(table.insert(entry("low", 5)), None);
        // Ties with the last entry: rejected, older entry wins.
        assert_eq!(table.insert(entry("tie", 10)), None);
        // Better than the last: the lowest drops out.
        assert_eq!(table.insert(entry("mid", 55)), Some(5));
        assert_eq!(table.entries().len(), MAX_ENTRIES);
        assert_eq!(table.entries().last().unwrap().score, 20);
    }

    #[test]
    fn test_deserialize_sorts_and_truncates() {
        let entries: Vec<_> = (0..15).map(|i| entry(&i.to_string(), i)).collect();
        let json = serde_json::to_string(&entries).unwrap();
        let table: HighscoreTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table.entries().len(), MAX_ENTRIES);
        assert_eq!(table.entries()[0].score, 14);
        assert_eq!(table.entries()[9].score, 5);
    }

    #[test]
    fn test_deserialize_normalizes_names() {
        let entries = vec![
            entry("  ", 300),
            entry("abcdefghijklmnopqrstuvwxyz", 200),
            entry(" bob ", 100),
        ];
        let json = serde_json::to_string(&entries).unwrap();
        let table: HighscoreTable = serde_json::from_str(&json).unwrap();
        assert_eq!(names(&table), [ANONYMOUS, "abcdefghijklmnop", "bob"]);
    }

    #[test]
    fn test_serialize_as_array() {
        let mut table = HighscoreTable::default();
        table.insert(entry("alice", 42));
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "alice");
        assert_eq!(json[0]["score"], 42);
        assert_eq!(json[0]["date"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_store_round_trip() {
        let dir = temp_dir("round-trip");
        let store = HighscoreStore::new(dir.join("primary.json"), dir.join("fallback.json"));
        assert!(store.load().is_empty());

        let mut table = HighscoreTable::default();
        table.insert(entry("alice", 900));
        table.insert(entry("bob", 300));
        assert!(store.save(&table).is_empty());
        assert!(dir.join("fallback.json").exists());
        assert_eq!(store.load(), table);

        _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_store_falls_back_when_primary_is_unreadable() {
        let dir = temp_dir("fallback");
        let primary = dir.join("primary.json");
        let fallback = dir.join("fallback.json");
        let store = HighscoreStore::new(primary.clone(), fallback);

        let mut table = HighscoreTable::default();
        table.insert(entry("carol", 700));
        assert!(store.save(&table).is_empty());

        fs::write(&primary, "not json").unwrap();
        assert_eq!(store.load(), table);

        _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_store_reports_primary_failure_but_writes_fallback() {
        let dir = temp_dir("primary-failure");
        let fallback = dir.join("fallback.json");
        let store = HighscoreStore::new(dir.join("missing").join("primary.json"), fallback.clone());

        let mut table = HighscoreTable::default();
        table.insert(entry("dave", 100));
        let warnings = store.save(&table);
        assert_eq!(warnings.len(), 1);
        assert!(format!("{:#}", warnings[0]).contains("primary.json"));
        assert!(fallback.exists());
        assert_eq!(store.load(), table);

        _ = fs::remove_dir_all(&dir);
    }
}
