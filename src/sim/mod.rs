//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod clock;
pub mod collision;
pub mod motion;
pub mod powerup;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::Clock;
pub use collision::{CollisionEvent, detect, resolve};
pub use powerup::{ActiveEffect, POWER_UPS, PowerUpDef, PowerUpManager};
pub use state::{
    Entity, EntityCategory, EntityKind, GameEvent, GameState, JumpState, ObstacleShape, Player,
    PowerUpKind, SessionPhase,
};
pub use tick::{LaneMove, TickInput, tick};
