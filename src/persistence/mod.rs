//! Persistence gateway
//!
//! The simulation never touches storage directly. Everything that outlives a
//! session goes through [`PersistenceGateway`], a plain string key-value
//! interface:
//! - `memory`: in-process map (tests, headless runs)
//! - `file`: single JSON file on disk (native)
//! - `local_storage`: browser LocalStorage (wasm32)
//!
//! Each key is read and written independently. A missing or unreadable value
//! counts as zero, and a failed write never blocks the other keys.

pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SessionResults;

/// Storage keys
pub mod keys {
    pub const HIGH_SCORE: &str = "cosmic_cube_high_score";
    pub const TOTAL_COINS: &str = "cosmic_cube_total_coins";
    pub const GAMES_PLAYED: &str = "cosmic_cube_games_played";
    pub const ACHIEVEMENTS: &str = "cosmic_cube_achievements";
    pub const SETTINGS: &str = "cosmic_cube_settings";
    pub const LEADERBOARD: &str = "cosmic_cube_leaderboard";
}

/// Errors a storage backend can report
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable")]
    Unavailable,
}

/// String key-value storage
pub trait PersistenceGateway {
    /// Value stored under `key`, `None` if never written
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read a counter; missing or malformed values count as zero
pub fn read_counter(store: &dyn PersistenceGateway, key: &str) -> u64 {
    match store.read(key) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed value for {}: {:?}", key, raw);
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Read of {} failed: {}", key, e);
            0
        }
    }
}

/// Lifetime totals shown on the menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub best_score: u64,
    pub total_coins: u64,
    pub games_played: u64,
}

impl HighScoreRecord {
    /// Load the record (missing keys read as zero)
    pub fn load(store: &dyn PersistenceGateway) -> Self {
        Self {
            best_score: read_counter(store, keys::HIGH_SCORE),
            total_coins: read_counter(store, keys::TOTAL_COINS),
            games_played: read_counter(store, keys::GAMES_PLAYED),
        }
    }

    /// Fold one finished session into the record
    pub fn with_session(&self, results: &SessionResults) -> Self {
        Self {
            best_score: self.best_score.max(results.score),
            total_coins: self.total_coins + results.coins as u64,
            games_played: self.games_played + 1,
        }
    }
}

/// Outcome of writing a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushReport {
    /// Record as it should now be stored
    pub record: HighScoreRecord,
    /// Keys whose write failed
    pub failed_keys: Vec<&'static str>,
}

impl FlushReport {
    pub fn is_complete(&self) -> bool {
        self.failed_keys.is_empty()
    }

    pub fn is_new_best(&self, results: &SessionResults) -> bool {
        results.score > 0 && self.record.best_score == results.score
    }
}

/// Write a finished session: best score (max), total coins (+), games played (+1).
///
/// Keys are written independently; failures are logged and reported.
pub fn record_session(store: &mut dyn PersistenceGateway, results: &SessionResults) -> FlushReport {
    let record = HighScoreRecord::load(store).with_session(results);

    let mut failed_keys = Vec::new();
    for (key, value) in [
        (keys::HIGH_SCORE, record.best_score),
        (keys::TOTAL_COINS, record.total_coins),
        (keys::GAMES_PLAYED, record.games_played),
    ] {
        if let Err(e) = store.write(key, &value.to_string()) {
            log::warn!("Write of {} failed: {}", key, e);
            failed_keys.push(key);
        }
    }

    log::info!(
        "Session recorded (best {}, coins {}, games {})",
        record.best_score,
        record.total_coins,
        record.games_played
    );
    FlushReport {
        record,
        failed_keys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(score: u64, coins: u32) -> SessionResults {
        SessionResults {
            score,
            coins,
            level: 1,
            elapsed_ms: 0.0,
        }
    }

    /// Store that rejects writes to one key
    struct FlakyStore {
        inner: MemoryStore,
        broken_key: &'static str,
    }

    impl PersistenceGateway for FlakyStore {
        fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.broken_key {
                return Err(StoreError::Unavailable);
            }
            self.inner.write(key, value)
        }
    }

    #[test]
    fn test_empty_store_reads_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScoreRecord::load(&store), HighScoreRecord::default());
    }

    #[test]
    fn test_malformed_values_read_zero() {
        let mut store = MemoryStore::new();
        store.write(keys::HIGH_SCORE, "lots").unwrap();
        store.write(keys::TOTAL_COINS, " 12 ").unwrap();
        let record = HighScoreRecord::load(&store);
        assert_eq!(record.best_score, 0);
        assert_eq!(record.total_coins, 12);
    }

    #[test]
    fn test_record_session_accumulates() {
        let mut store = MemoryStore::new();
        let first = record_session(&mut store, &results(500, 7));
        assert!(first.is_new_best(&results(500, 7)));
        let report = record_session(&mut store, &results(300, 5));

        assert!(report.is_complete());
        assert_eq!(
            HighScoreRecord::load(&store),
            HighScoreRecord {
                best_score: 500,
                total_coins: 12,
                games_played: 2,
            }
        );
        assert!(!report.is_new_best(&results(300, 5)));
    }

    #[test]
    fn test_failed_key_does_not_block_others() {
        let mut store = FlakyStore {
            inner: MemoryStore::new(),
            broken_key: keys::TOTAL_COINS,
        };
        let report = record_session(&mut store, &results(900, 4));

        assert_eq!(report.failed_keys, vec![keys::TOTAL_COINS]);
        let record = HighScoreRecord::load(&store);
        assert_eq!(record.best_score, 900);
        assert_eq!(record.total_coins, 0);
        assert_eq!(record.games_played, 1);
    }
}
