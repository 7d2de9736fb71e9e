//! Game tuning and preferences
//!
//! Every gameplay constant the simulation reads lives here so runs can be
//! tuned from a JSON file without touching the algorithms. Missing fields
//! fall back to the defaults below.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, TICK_MS};
use crate::persistence::{PersistenceGateway, keys};

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Scale applied to the obstacle spawn probability
    pub fn obstacle_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.6,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Scale applied to the speed increment
    pub fn acceleration_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Lives at session start
    pub fn starting_lives(&self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Normal => 3,
            Difficulty::Hard => 1,
        }
    }
}

/// Game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Preset the values below were derived from
    pub difficulty: Difficulty,

    // === Speed ===
    /// Track speed at session start (units per ms)
    pub initial_speed: f32,
    /// Speed gained per unit of distance travelled
    pub speed_increment: f32,

    // === Lanes ===
    pub lane_width: f32,
    pub lane_count: u8,

    // === Spawning (probability per tick) ===
    pub obstacle_frequency: f32,
    pub coin_frequency: f32,
    pub power_up_frequency: f32,
    /// Entities appear this far ahead of the player
    pub spawn_distance: f32,
    /// Entities are culled once their z reaches this
    pub cull_z: f32,

    // === Collision radii ===
    pub obstacle_hit_radius: f32,
    pub coin_radius: f32,
    pub power_up_radius: f32,

    // === Player ===
    pub starting_lives: u32,
    pub jump_height: f32,
    pub jump_fall_per_tick: f32,
    /// Fraction of the remaining lateral gap closed each tick
    pub lane_ease: f32,

    // === Power-ups ===
    /// Entity motion multiplier while speed boost is active
    pub speed_boost_factor: f32,
    /// Coins closer than this (along the track) drift toward the player
    pub magnet_range: f32,
    /// Lateral drift speed of magnetised coins (units per ms)
    pub magnet_pull: f32,

    // === Clock ===
    pub tick_ms: f32,
    pub max_frame_ms: f32,
    pub max_substeps: u32,

    /// Fixed run seed; the host picks one when absent
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            initial_speed: 0.1,
            speed_increment: 0.002,

            lane_width: 3.0,
            lane_count: 3,

            obstacle_frequency: 0.02,
            coin_frequency: 0.015,
            power_up_frequency: 0.005,
            spawn_distance: 50.0,
            cull_z: 10.0,

            obstacle_hit_radius: 1.0,
            coin_radius: 0.8,
            power_up_radius: 1.0,

            starting_lives: 3,
            jump_height: 2.0,
            jump_fall_per_tick: 0.2,
            lane_ease: 0.1,

            speed_boost_factor: 1.5,
            magnet_range: 15.0,
            magnet_pull: 0.02,

            tick_ms: TICK_MS,
            max_frame_ms: MAX_FRAME_MS,
            max_substeps: MAX_SUBSTEPS,

            seed: None,
        }
    }
}

impl GameSettings {
    /// Create settings from a difficulty preset (applies preset scaling)
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_difficulty(difficulty);
        settings
    }

    /// Apply a difficulty preset on top of the default tuning
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        let base = Self::default();
        self.difficulty = difficulty;
        self.obstacle_frequency = base.obstacle_frequency * difficulty.obstacle_scale();
        self.speed_increment = base.speed_increment * difficulty.acceleration_scale();
        self.starting_lives = difficulty.starting_lives();
    }

    /// Clamp values the simulation cannot work with
    pub fn validate(mut self) -> Self {
        self.obstacle_frequency = self.obstacle_frequency.clamp(0.0, 1.0);
        self.coin_frequency = self.coin_frequency.clamp(0.0, 1.0);
        self.power_up_frequency = self.power_up_frequency.clamp(0.0, 1.0);
        self.lane_count = self.lane_count.max(1);
        self.lane_width = self.lane_width.max(0.0);
        self.initial_speed = self.initial_speed.max(f32::EPSILON);
        self.speed_increment = self.speed_increment.max(0.0);
        self.lane_ease = self.lane_ease.clamp(0.0, 1.0);
        self.jump_fall_per_tick = self.jump_fall_per_tick.max(f32::EPSILON);
        self.speed_boost_factor = self.speed_boost_factor.max(1.0);
        self.tick_ms = self.tick_ms.max(1.0);
        self.max_frame_ms = self.max_frame_ms.max(self.tick_ms);
        self.max_substeps = self.max_substeps.max(1);
        self.starting_lives = self.starting_lives.max(1);
        self
    }

    /// Lane the player starts in
    pub fn start_lane(&self) -> u8 {
        (self.lane_count.max(1) - 1) / 2
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<GameSettings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.validate()
                }
                Err(e) => {
                    log::warn!("Malformed settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings stored through a persistence gateway
    pub fn load(store: &dyn PersistenceGateway) -> Self {
        match store.read(keys::SETTINGS) {
            Ok(Some(json)) => match serde_json::from_str::<GameSettings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded stored settings");
                    return settings.validate();
                }
                Err(e) => log::warn!("Stored settings unreadable: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Settings read failed: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings through a persistence gateway
    pub fn save(&self, store: &mut dyn PersistenceGateway) {
        match serde_json::to_string(self) {
            Ok(json) => match store.write(keys::SETTINGS, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings save failed: {}", e),
            },
            Err(e) => log::warn!("Settings not serializable: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_default_matches_classic_tuning() {
        let s = GameSettings::default();
        assert_eq!(s.lane_count, 3);
        assert_eq!(s.start_lane(), 1);
        assert_eq!(s.starting_lives, 3);
        assert!((s.initial_speed - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_difficulty_round_trip_names() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_hard_spawns_more_obstacles() {
        let hard = GameSettings::from_difficulty(Difficulty::Hard);
        let easy = GameSettings::from_difficulty(Difficulty::Easy);
        assert!(hard.obstacle_frequency > easy.obstacle_frequency);
        assert_eq!(hard.starting_lives, 1);
    }

    #[test]
    fn test_validate_clamps() {
        let s = GameSettings {
            obstacle_frequency: 4.0,
            coin_frequency: -1.0,
            lane_count: 0,
            tick_ms: 0.0,
            ..Default::default()
        }
        .validate();
        assert_eq!(s.obstacle_frequency, 1.0);
        assert_eq!(s.coin_frequency, 0.0);
        assert_eq!(s.lane_count, 1);
        assert_eq!(s.tick_ms, 1.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: GameSettings = serde_json::from_str(r#"{"lane_count": 5}"#).unwrap();
        assert_eq!(s.lane_count, 5);
        assert_eq!(s.start_lane(), 2);
        assert_eq!(s.cull_z, GameSettings::default().cull_z);
    }

    #[test]
    fn test_gateway_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(GameSettings::load(&store), GameSettings::default());

        let s = GameSettings::from_difficulty(Difficulty::Easy);
        s.save(&mut store);
        assert_eq!(GameSettings::load(&store), s);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("cosmic_runner_no_such_settings.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(GameSettings::load_from(&path), GameSettings::default());
    }
}
