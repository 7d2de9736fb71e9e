//! Read-only view of a session for renderers and HUDs
//!
//! Built once at the end of every tick and shared behind an `Arc`; consumers
//! never get a handle into the live [`GameState`].

use glam::Vec3;
use serde::Serialize;

use crate::sim::{
    EntityCategory, EntityKind, GameState, JumpState, PowerUpKind, SessionPhase,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub category: EntityCategory,
    pub kind: EntityKind,
    pub pos: Vec3,
    /// Collected pickups are still listed; renderers should hide them
    pub consumed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec3,
    pub lane: u8,
    pub jump: JumpState,
    pub shield: bool,
}

/// One HUD row per active power-up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectView {
    pub kind: PowerUpKind,
    pub name: &'static str,
    pub color: &'static str,
    pub remaining_ms: f32,
    /// Remaining fraction, `None` for effects without a countdown
    pub progress: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub coins: u32,
    pub level: u32,
    pub lives: u32,
    pub multiplier: f32,
    pub distance: f64,
    pub elapsed_ms: f64,
    pub effects: Vec<EffectView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    /// False before the first start and after the run was abandoned;
    /// `phase` then describes the last run, not a live one
    pub active: bool,
    pub phase: SessionPhase,
    /// Live entities in id order
    pub entities: Vec<EntityView>,
    pub player: PlayerView,
    pub game_speed: f32,
    pub hud: Hud,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, active: bool) -> Self {
        let entities = state
            .entities
            .iter()
            .map(|e| EntityView {
                id: e.id,
                category: e.category(),
                kind: e.kind,
                pos: e.pos,
                consumed: e.consumed,
            })
            .collect();

        let effects = state
            .effects
            .iter()
            .map(|effect| {
                let def = effect.kind.def();
                EffectView {
                    kind: effect.kind,
                    name: def.name,
                    color: def.color,
                    remaining_ms: effect.remaining_ms,
                    progress: effect.progress(),
                }
            })
            .collect();

        Self {
            tick: state.time_ticks,
            active,
            phase: state.phase,
            entities,
            player: PlayerView {
                pos: state.player.pos,
                lane: state.player.lane,
                jump: state.player.jump,
                shield: state.player.shield,
            },
            game_speed: state.game_speed,
            hud: Hud {
                score: state.score,
                coins: state.coins,
                level: state.level,
                lives: state.player.lives,
                multiplier: state.player.multiplier,
                distance: state.distance,
                elapsed_ms: state.elapsed_ms,
                effects,
            },
        }
    }

    /// Entities a renderer should draw
    pub fn visible(&self) -> impl Iterator<Item = &EntityView> {
        self.entities.iter().filter(|e| !e.consumed)
    }
}
