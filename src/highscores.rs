//! High score leaderboard
//!
//! Top 10 finished sessions, stored as one JSON list under
//! [`keys::LEADERBOARD`](crate::persistence::keys::LEADERBOARD).

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceGateway, StoreError, keys};
use crate::session::SessionResults;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Coins collected during the run
    pub coins: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
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

    /// Insert a finished session (if it qualifies).
    /// Returns the rank achieved (1-indexed).
    pub fn add(&mut self, results: &SessionResults, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(results.score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score: results.score,
                level: results.level,
                coins: results.coins,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard; a missing or unreadable list starts fresh
    pub fn load(store: &dyn PersistenceGateway) -> Self {
        match store.read(keys::LEADERBOARD) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                    scores.entries.truncate(MAX_HIGH_SCORES);
                    log::debug!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Discarding unreadable leaderboard: {}", e);
                    Self::new()
                }
            },
            Ok(None) => Self::new(),
            Err(e) => {
                log::warn!("Leaderboard read failed: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn PersistenceGateway) -> Result<(), StoreError> {
        store.write(keys::LEADERBOARD, &serde_json::to_string(self)?)?;
        log::debug!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Wall-clock time in ms since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_timestamp() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_timestamp() -> f64 {
    js_sys::Date::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn run(score: u64) -> SessionResults {
        SessionResults {
            score,
            coins: 3,
            level: 2,
            elapsed_ms: 1000.0,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(&run(0), 0.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_descending_and_capped() {
        let mut scores = HighScores::new();
        for s in 1..=12u64 {
            scores.add(&run(s * 100), s as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(1200));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(300));
        assert!(!scores.qualifies(250));
        assert_eq!(scores.potential_rank(650), Some(7));
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut scores = HighScores::new();
        scores.add(&run(500), 1.0);
        assert_eq!(scores.add(&run(500), 2.0), Some(2));
        assert_eq!(scores.entries[0].timestamp, 1.0);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add(&run(700), 42.0);
        scores.save(&mut store).unwrap();

        let loaded = HighScores::load(&store);
        assert_eq!(loaded.entries, scores.entries);
        assert_eq!(loaded.entries[0].level, 2);
        assert_eq!(loaded.entries[0].coins, 3);
    }

    #[test]
    fn test_garbage_loads_empty() {
        let mut store = MemoryStore::new();
        store.write(keys::LEADERBOARD, "[[[").unwrap();
        assert!(HighScores::load(&store).is_empty());
    }
}
