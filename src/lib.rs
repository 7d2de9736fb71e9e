//! Cosmic Runner - an endless lane-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, power-ups, scoring)
//! - `session`: Playing/Paused/GameOver state machine driving the simulation
//! - `snapshot`: Read-only per-tick view for renderers and HUDs
//! - `runner`: Dedicated loop thread with a command queue (native only)
//! - `persistence`: Key-value gateway for best score, coin and game totals
//! - `highscores`, `achievements`: Written through the gateway when a run ends
//! - `settings`: Data-driven game tuning
//! - `wasm`: Browser bindings (wasm32 only)

pub mod achievements;
pub mod highscores;
pub mod persistence;
#[cfg(not(target_arch = "wasm32"))]
pub mod runner;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use highscores::HighScores;
pub use persistence::{HighScoreRecord, MemoryStore, PersistenceGateway, StoreError};
pub use session::{Command, Session, SessionResults};
pub use settings::{Difficulty, GameSettings};
pub use snapshot::RenderSnapshot;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: f32 = 16.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest host frame the clock will account for
    pub const MAX_FRAME_MS: f32 = 250.0;

    /// Score for a single coin before the multiplier
    pub const COIN_SCORE: u64 = 10;
    /// Survival score factor: floor(speed * multiplier * SURVIVAL_SCORE_FACTOR) per tick
    pub const SURVIVAL_SCORE_FACTOR: f32 = 100.0;
    /// Distance units per level
    pub const LEVEL_DISTANCE: f64 = 1000.0;
    /// Multiplier granted by the score multiplier power-up
    pub const POWER_UP_MULTIPLIER: f32 = 2.0;

    /// Player's plane along the track axis
    pub const PLAYER_Z: f32 = 0.0;
    /// Spawn heights
    pub const OBSTACLE_Y: f32 = 0.0;
    pub const PICKUP_Y: f32 = 1.0;
}

/// Lateral offset of a lane: `lane_width * (lane - center)`
#[inline]
pub fn lane_offset(lane: u8, lane_count: u8, lane_width: f32) -> f32 {
    let center = (lane_count.max(1) - 1) as f32 / 2.0;
    lane_width * (lane as f32 - center)
}

/// Distance on the ground plane (x/z), ignoring height
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_offset_three_lanes() {
        assert_eq!(lane_offset(0, 3, 3.0), -3.0);
        assert_eq!(lane_offset(1, 3, 3.0), 0.0);
        assert_eq!(lane_offset(2, 3, 3.0), 3.0);
    }

    #[test]
    fn test_lane_offset_even_lane_count() {
        assert_eq!(lane_offset(0, 4, 2.0), -3.0);
        assert_eq!(lane_offset(3, 4, 2.0), 3.0);
    }

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 10.0, 4.0);
        assert!((planar_distance(a, b) - 5.0).abs() < 1e-6);
    }
}
