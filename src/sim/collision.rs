//! Collision detection and resolution
//!
//! Every entity category uses the same test: planar (x/z) distance between
//! the entity and the player against a per-category radius. The forward
//! coordinate is swept across this tick's motion, so a fast entity that
//! jumped past the player between two ticks still registers.

use glam::Vec3;

use super::state::{Entity, EntityKind, GameEvent, GameState, PowerUpKind, SessionPhase};
use crate::consts::COIN_SCORE;
use crate::planar_distance;
use crate::settings::GameSettings;

/// A raw contact found by [`detect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    ObstacleHit { id: u32 },
    CoinCollected { id: u32 },
    PowerUpCollected { id: u32, kind: PowerUpKind },
}

/// Closest planar distance between the entity and the player during this tick
pub fn swept_distance(entity: &Entity, player_pos: Vec3) -> f32 {
    let lo = entity.prev_z.min(entity.pos.z);
    let hi = entity.prev_z.max(entity.pos.z);
    let closest = Vec3::new(entity.pos.x, entity.pos.y, player_pos.z.clamp(lo, hi));
    planar_distance(closest, player_pos)
}

/// Test every live entity against the player, in id order
pub fn detect(state: &GameState, settings: &GameSettings) -> Vec<CollisionEvent> {
    let player_pos = state.player.pos;
    let mut events = Vec::new();

    for entity in &state.entities {
        if entity.consumed {
            continue;
        }
        let distance = swept_distance(entity, player_pos);
        match entity.kind {
            EntityKind::Obstacle { .. } if distance < settings.obstacle_hit_radius => {
                events.push(CollisionEvent::ObstacleHit { id: entity.id });
            }
            EntityKind::Coin if distance < settings.coin_radius => {
                events.push(CollisionEvent::CoinCollected { id: entity.id });
            }
            EntityKind::PowerUp { kind } if distance < settings.power_up_radius => {
                events.push(CollisionEvent::PowerUpCollected {
                    id: entity.id,
                    kind,
                });
            }
            _ => {}
        }
    }

    events
}

/// Apply one contact to the state.
///
/// Contacts with entities that are gone or already consumed are ignored, so
/// resolving the same contact twice is harmless.
pub fn resolve(state: &mut GameState, event: CollisionEvent) -> Vec<GameEvent> {
    match event {
        CollisionEvent::ObstacleHit { id } => resolve_obstacle_hit(state, id),
        CollisionEvent::CoinCollected { id } => resolve_coin(state, id).into_iter().collect(),
        CollisionEvent::PowerUpCollected { id, .. } => {
            resolve_power_up(state, id).into_iter().collect()
        }
    }
}

/// Shield absorbs the hit, otherwise a life is lost. The obstacle is removed either way.
pub fn resolve_obstacle_hit(state: &mut GameState, id: u32) -> Vec<GameEvent> {
    if state.remove_entity(id).is_none() {
        return Vec::new();
    }

    let shielded = state.effects.consume_shield(&mut state.player);
    if !shielded {
        state.player.lives = state.player.lives.saturating_sub(1);
    }

    let lives = state.player.lives;
    log::debug!(
        "Obstacle {} hit (shielded: {}, lives: {})",
        id,
        shielded,
        lives
    );

    let mut events = vec![GameEvent::ObstacleHit {
        id,
        shielded,
        lives,
    }];
    if lives == 0 {
        state.phase = SessionPhase::GameOver;
        events.push(GameEvent::GameOver);
    }
    events
}

/// +1 coin and `10 x multiplier` score; the coin stays in the list, consumed
pub fn resolve_coin(state: &mut GameState, id: u32) -> Option<GameEvent> {
    let multiplier = state.player.multiplier;
    let coin = state.entity_mut(id)?;
    if coin.consumed || coin.kind != EntityKind::Coin {
        return None;
    }
    coin.consumed = true;

    let score_gain = (COIN_SCORE as f32 * multiplier).floor() as u64;
    state.coins += 1;
    state.score = state.score.saturating_add(score_gain);
    log::debug!("Coin {} collected (+{})", id, score_gain);

    Some(GameEvent::CoinCollected { id, score_gain })
}

/// Activate (or refresh) the power-up's effect and consume the entity
pub fn resolve_power_up(state: &mut GameState, id: u32) -> Option<GameEvent> {
    let entity = state.entity_mut(id)?;
    let EntityKind::PowerUp { kind } = entity.kind else {
        return None;
    };
    if entity.consumed {
        return None;
    }
    entity.consumed = true;

    let refreshed = state.effects.collect(kind, id, &mut state.player);
    log::debug!(
        "Power-up {} collected: {} (refreshed: {})",
        id,
        kind.def().name,
        refreshed
    );

    Some(GameEvent::PowerUpCollected {
        id,
        kind,
        refreshed,
    })
}
