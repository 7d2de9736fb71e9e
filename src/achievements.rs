//! Achievements
//!
//! Evaluated once per finished session against the freshly updated lifetime
//! record. Unlocked ids are stored as a JSON list under
//! [`keys::ACHIEVEMENTS`](crate::persistence::keys::ACHIEVEMENTS) and never
//! re-locked.

use std::collections::BTreeSet;

use crate::persistence::{HighScoreRecord, PersistenceGateway, StoreError, keys};
use crate::session::SessionResults;

/// What an achievement is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    GamesPlayed(u64),
    BestScore(u64),
    TotalCoins(u64),
    SessionLevel(u32),
}

impl Requirement {
    pub fn is_met(&self, record: &HighScoreRecord, results: &SessionResults) -> bool {
        match *self {
            Requirement::GamesPlayed(n) => record.games_played >= n,
            Requirement::BestScore(n) => record.best_score >= n,
            Requirement::TotalCoins(n) => record.total_coins >= n,
            Requirement::SessionLevel(n) => results.level >= n,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
}

pub const ACHIEVEMENTS: [AchievementDef; 5] = [
    AchievementDef {
        id: "first_run",
        name: "First Steps",
        description: "Complete your first run",
        requirement: Requirement::GamesPlayed(1),
    },
    AchievementDef {
        id: "score_1000",
        name: "Rookie Runner",
        description: "Score 1000 points",
        requirement: Requirement::BestScore(1000),
    },
    AchievementDef {
        id: "score_2000",
        name: "Space Explorer",
        description: "Score 2000 points",
        requirement: Requirement::BestScore(2000),
    },
    AchievementDef {
        id: "collect_100_coins",
        name: "Coin Collector",
        description: "Collect 100 coins total",
        requirement: Requirement::TotalCoins(100),
    },
    AchievementDef {
        id: "level_10",
        name: "Cosmic Voyager",
        description: "Reach level 10",
        requirement: Requirement::SessionLevel(10),
    },
];

pub fn find(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Set of unlocked achievement ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unlocked {
    ids: BTreeSet<String>,
}

impl Unlocked {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unlock everything newly earned; returns the ids unlocked by this call
    pub fn evaluate(
        &mut self,
        record: &HighScoreRecord,
        results: &SessionResults,
    ) -> Vec<&'static str> {
        let earned: Vec<&'static str> = ACHIEVEMENTS
            .iter()
            .filter(|a| !self.is_unlocked(a.id) && a.requirement.is_met(record, results))
            .map(|a| a.id)
            .collect();
        self.ids.extend(earned.iter().map(|id| id.to_string()));
        earned
    }

    pub fn load(store: &dyn PersistenceGateway) -> Self {
        let ids = match store.read(keys::ACHIEVEMENTS) {
            Ok(Some(json)) => serde_json::from_str::<Vec<String>>(&json).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable achievements: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Achievements read failed: {}", e);
                Vec::new()
            }
        };
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn save(&self, store: &mut dyn PersistenceGateway) -> Result<(), StoreError> {
        let ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        store.write(keys::ACHIEVEMENTS, &serde_json::to_string(&ids)?)
    }
}
