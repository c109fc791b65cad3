//! High score leaderboard
//!
//! Persisted under the `highScores` key as a plain JSON list of
//! `{ "name": ..., "score": ... }` records, best first. Keeps the top 5.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player name (trimmed, never blank)
    pub name: String,
    /// Final score (always > 0)
    pub score: u64,
}

impl HighScoreEntry {
    fn is_valid(&self) -> bool {
        self.score > 0 && !self.name.trim().is_empty()
    }
}

/// High score leaderboard
///
/// Entries are kept in non-increasing score order. A new score equal to an
/// existing one is placed after it, so earlier achievers keep the higher rank.
/// Once the table is full a score must strictly beat the lowest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Store key
    pub const STORAGE_KEY: &'static str = "highScores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a table from arbitrary entries, dropping invalid ones
    pub fn from_entries(entries: Vec<HighScoreEntry>) -> Self {
        let mut table = Self { entries };
        table.sanitize();
        table
    }

    /// Drop invalid entries, trim names, sort best first, keep the top 5
    pub fn sanitize(&mut self) {
        self.entries.retain(HighScoreEntry::is_valid);
        for entry in &mut self.entries {
            let trimmed = entry.name.trim();
            if trimmed.len() != entry.name.len() {
                entry.name = trimmed.to_string();
            }
        }
        // Stable sort keeps earlier achievers ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest kept entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies and the name isn't blank)
    /// Returns the rank achieved (1-indexed) or None if nothing changed
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        let name = name.trim();
        if name.is_empty() || !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse a stored table, keeping every well-formed record
    ///
    /// Individual bad records (missing name, non-numeric score, ...) are skipped;
    /// a blob that isn't a JSON list at all is an error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let total = raw.len();
        let entries: Vec<HighScoreEntry> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if entries.len() != total {
            log::warn!("Skipped {} malformed high score records", total - entries.len());
        }
        Ok(Self::from_entries(entries))
    }

    /// Load high scores from the store (missing or malformed data = empty table)
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("Discarding malformed high scores: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read high scores: {}", e),
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(self).map_err(|e| StorageError::Serialize(e.to_string()))?;
        store.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Forget the stored table
    pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.remove_item(Self::STORAGE_KEY)?;
        log::info!("High scores cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn table(scores: &[(&str, u64)]) -> HighScores {
        HighScores::from_entries(
            scores
                .iter()
                .map(|(name, score)| HighScoreEntry {
                    name: name.to_string(),
                    score: *score,
                })
                .collect(),
        )
    }

    fn names(table: &HighScores) -> Vec<&str> {
        table.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_qualifies() {
        let empty = HighScores::new();
        assert!(!empty.qualifies(0));
        assert!(empty.qualifies(1));

        let full = table(&[("A", 500), ("B", 400), ("C", 300), ("D", 200), ("E", 100)]);
        assert!(!full.qualifies(100));
        assert!(full.qualifies(101));
    }

    #[test]
    fn test_insert_into_full_table_drops_lowest() {
        let mut scores = table(&[("A", 500), ("B", 400), ("C", 300), ("D", 200), ("E", 100)]);
        assert_eq!(scores.potential_rank(250), Some(4));

        let rank = scores.add_score("F", 250);
        assert_eq!(rank, Some(4));
        assert_eq!(names(&scores), vec!["A", "B", "C", "F", "D"]);
        assert_eq!(scores.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("   ", 50), None);
        assert_eq!(scores.add_score("", 50), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut scores = HighScores::new();
        scores.add_score("  Ana  ", 40);
        assert_eq!(scores.entries[0].name, "Ana");
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut scores = table(&[("A", 100)]);
        assert_eq!(scores.add_score("B", 100), Some(2));
        assert_eq!(names(&scores), vec!["A", "B"]);
    }

    #[test]
    fn test_from_json_skips_bad_records() {
        let json = r#"[
            {"name": "A", "score": 30},
            {"name": "", "score": 90},
            {"name": "B", "score": "lots"},
            {"score": 70},
            {"name": "C", "score": 0},
            {"name": "D", "score": 60}
        ]"#;
        let scores = HighScores::from_json(json).unwrap();
        assert_eq!(names(&scores), vec!["D", "A"]);
    }

    #[test]
    fn test_load_missing_or_garbage_is_empty() {
        let mut store = MemoryStore::new();
        assert!(HighScores::load(&store).is_empty());

        store.set_item(HighScores::STORAGE_KEY, "null").unwrap();
        assert!(HighScores::load(&store).is_empty());

        store.set_item(HighScores::STORAGE_KEY, "{oops").unwrap();
        assert!(HighScores::load(&store).is_empty());
    }

    #[test]
    fn test_persisted_format_is_plain_list() {
        let mut store = MemoryStore::new();
        let scores = table(&[("A", 20), ("B", 10)]);
        scores.save(&mut store).unwrap();

        let json = store.get_item(HighScores::STORAGE_KEY).unwrap().unwrap();
        assert_eq!(json, r#"[{"name":"A","score":20},{"name":"B","score":10}]"#);
        assert_eq!(HighScores::load(&store), scores);
    }

    #[test]
    fn test_clear_removes_stored_table() {
        let mut store = MemoryStore::new();
        table(&[("A", 20)]).save(&mut store).unwrap();
        HighScores::clear(&mut store).unwrap();
        assert_eq!(store.get_item(HighScores::STORAGE_KEY).unwrap(), None);
        // Clearing an absent table is fine
        HighScores::clear(&mut store).unwrap();
    }

    proptest! {
        #[test]
        fn prop_table_stays_ordered_and_bounded(
            ops in prop::collection::vec(("[a-z ]{0,6}", 0u64..1000), 0..40)
        ) {
            let mut store = MemoryStore::new();
            let mut scores = HighScores::new();
            for (name, score) in ops {
                if scores.add_score(&name, score).is_some() {
                    scores.save(&mut store).unwrap();
                }
                let saved = HighScores::load(&store);
                for t in [&scores, &saved] {
                    prop_assert!(t.len() <= MAX_HIGH_SCORES);
                    prop_assert!(t.entries.windows(2).all(|w| w[0].score >= w[1].score));
                    prop_assert!(t.entries.iter().all(|e| e.score > 0 && !e.name.trim().is_empty()));
                }
            }
        }
    }
}
