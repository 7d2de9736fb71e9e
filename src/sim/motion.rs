//! Entity motion, player pose and culling

use super::state::{EntityKind, GameState, JumpState, PowerUpKind};
use crate::lane_offset;
use crate::settings::GameSettings;

/// Lateral gap below which the player snaps onto the lane centre
const LANE_SNAP: f32 = 1e-3;

/// Track speed entities move at this tick (base speed plus any boost)
pub fn motion_speed(state: &GameState, settings: &GameSettings) -> f32 {
    if state.effects.is_active(PowerUpKind::Speed) {
        state.game_speed * settings.speed_boost_factor
    } else {
        state.game_speed
    }
}

/// Move every live entity toward the player
pub fn advance_entities(state: &mut GameState, settings: &GameSettings, dt_ms: f32) {
    let dz = motion_speed(state, settings) * dt_ms;
    for entity in &mut state.entities {
        entity.advance(dz);
    }
}

/// Ease the player toward its lane and run the jump arc
pub fn update_player(state: &mut GameState, settings: &GameSettings) {
    let player = &mut state.player;

    let target_x = lane_offset(player.lane, settings.lane_count, settings.lane_width);
    let gap = target_x - player.pos.x;
    if gap.abs() < LANE_SNAP {
        player.pos.x = target_x;
    } else {
        player.pos.x += gap * settings.lane_ease;
    }

    if player.jump == JumpState::Airborne {
        player.pos.y = (player.pos.y - settings.jump_fall_per_tick).max(0.0);
        if player.pos.y <= 0.0 {
            player.jump = JumpState::Grounded;
        }
    }
}

/// Pull unconsumed coins within range sideways toward the player
pub fn apply_magnet(state: &mut GameState, settings: &GameSettings, dt_ms: f32) {
    if !state.effects.is_active(PowerUpKind::Magnet) {
        return;
    }

    let player_pos = state.player.pos;
    let max_step = settings.magnet_pull * dt_ms;
    for entity in &mut state.entities {
        if entity.kind != EntityKind::Coin || entity.consumed {
            continue;
        }
        let ahead = player_pos.z - entity.pos.z;
        if !(0.0..=settings.magnet_range).contains(&ahead) {
            continue;
        }
        let dx = player_pos.x - entity.pos.x;
        entity.pos.x += dx.clamp(-max_step, max_step);
    }
}

/// Drop entities that have passed the player. Returns how many were removed.
pub fn cull(state: &mut GameState, settings: &GameSettings) -> usize {
    let before = state.entities.len();
    state.entities.retain(|e| e.pos.z < settings.cull_z);
    before - state.entities.len()
}
