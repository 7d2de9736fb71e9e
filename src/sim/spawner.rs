//! Procedural spawning
//!
//! Each tick every category rolls independently against its per-tick
//! probability. Spawns land at a fixed distance ahead in a uniformly chosen
//! lane. The random source is passed in so tests can script it.

use glam::Vec3;
use rand::Rng;

use super::state::{EntityKind, GameState, ObstacleShape, PowerUpKind};
use crate::consts::{OBSTACLE_Y, PICKUP_Y, PLAYER_Z};
use crate::lane_offset;
use crate::settings::GameSettings;

/// Roll spawns for one tick using the session's own generator
pub fn spawn(state: &mut GameState, settings: &GameSettings) -> Vec<u32> {
    let mut rng = state.rng.clone();
    let spawned = spawn_with(state, &mut rng, settings);
    state.rng = rng;
    spawned
}

/// Roll spawns for one tick with an explicit random source.
///
/// Returns the ids of the new entities.
pub fn spawn_with<R: Rng + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    settings: &GameSettings,
) -> Vec<u32> {
    let mut spawned = Vec::new();
    let z = PLAYER_Z - settings.spawn_distance;

    if rng.random::<f32>() < settings.obstacle_frequency {
        let x = random_lane_x(rng, settings);
        let shape = ObstacleShape::ALL[rng.random_range(0..ObstacleShape::ALL.len())];
        spawned.push(state.push_entity(
            EntityKind::Obstacle { shape },
            Vec3::new(x, OBSTACLE_Y, z),
        ));
    }

    if rng.random::<f32>() < settings.coin_frequency {
        let x = random_lane_x(rng, settings);
        spawned.push(state.push_entity(EntityKind::Coin, Vec3::new(x, PICKUP_Y, z)));
    }

    if rng.random::<f32>() < settings.power_up_frequency {
        let x = random_lane_x(rng, settings);
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        spawned.push(state.push_entity(
            EntityKind::PowerUp { kind },
            Vec3::new(x, PICKUP_Y, z),
        ));
    }

    if !spawned.is_empty() {
        log::trace!("tick {}: spawned {:?}", state.time_ticks, spawned);
    }
    spawned
}

fn random_lane_x<R: Rng + ?Sized>(rng: &mut R, settings: &GameSettings) -> f32 {
    let lane = rng.random_range(0..settings.lane_count.max(1));
    lane_offset(lane, settings.lane_count, settings.lane_width)
}
