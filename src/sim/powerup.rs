//! Power-up definitions and active effect lifecycle
//!
//! At most one [`ActiveEffect`] exists per [`PowerUpKind`]. Collecting a kind
//! that is already active refreshes it in place. Shields never time out; they
//! are removed only when they absorb a hit.

use serde::{Deserialize, Serialize};

use super::state::{Player, PowerUpKind};
use crate::consts::POWER_UP_MULTIPLIER;

/// Static description of a power-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpDef {
    pub kind: PowerUpKind,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// HUD colour (#rrggbb)
    pub color: &'static str,
    /// Effect length in ms; 0 means "until consumed"
    pub duration_ms: f32,
}

pub const POWER_UPS: [PowerUpDef; 4] = [
    PowerUpDef {
        kind: PowerUpKind::Speed,
        id: "speed_boost",
        name: "Speed Boost",
        description: "Increases speed for 10 seconds",
        color: "#ff6b35",
        duration_ms: 10_000.0,
    },
    PowerUpDef {
        kind: PowerUpKind::Multiplier,
        id: "score_multiplier",
        name: "Score x2",
        description: "Doubles score for 15 seconds",
        color: "#f7931e",
        duration_ms: 15_000.0,
    },
    PowerUpDef {
        kind: PowerUpKind::Shield,
        id: "shield",
        name: "Shield",
        description: "Protects from one collision",
        color: "#00d4ff",
        duration_ms: 0.0,
    },
    PowerUpDef {
        kind: PowerUpKind::Magnet,
        id: "coin_magnet",
        name: "Coin Magnet",
        description: "Attracts nearby coins",
        color: "#00ff88",
        duration_ms: 12_000.0,
    },
];

impl PowerUpKind {
    /// Static definition for this kind
    pub fn def(&self) -> &'static PowerUpDef {
        match self {
            PowerUpKind::Speed => &POWER_UPS[0],
            PowerUpKind::Multiplier => &POWER_UPS[1],
            PowerUpKind::Shield => &POWER_UPS[2],
            PowerUpKind::Magnet => &POWER_UPS[3],
        }
    }

    /// Shields persist until consumed instead of counting down
    pub fn is_timed(&self) -> bool {
        *self != PowerUpKind::Shield
    }
}

/// A power-up currently in force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub remaining_ms: f32,
    /// Entity the effect was collected from
    pub source_id: u32,
}

impl ActiveEffect {
    /// Remaining fraction for progress bars (None for untimed effects)
    pub fn progress(&self) -> Option<f32> {
        let duration = self.kind.def().duration_ms;
        if !self.kind.is_timed() || duration <= 0.0 {
            return None;
        }
        Some((self.remaining_ms / duration).clamp(0.0, 1.0))
    }
}

/// Tracks active effects and keeps the player's modifiers in sync with them
#[derive(Debug, Clone, Default)]
pub struct PowerUpManager {
    effects: Vec<ActiveEffect>,
}

impl PowerUpManager {
    /// Apply a collected power-up. Returns true if an existing effect was refreshed.
    pub fn collect(&mut self, kind: PowerUpKind, source_id: u32, player: &mut Player) -> bool {
        let remaining_ms = kind.def().duration_ms;

        match kind {
            PowerUpKind::Shield => player.shield = true,
            PowerUpKind::Multiplier => player.multiplier = POWER_UP_MULTIPLIER,
            PowerUpKind::Speed | PowerUpKind::Magnet => {}
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining_ms = remaining_ms;
            existing.source_id = source_id;
            return true;
        }

        self.effects.push(ActiveEffect {
            kind,
            remaining_ms,
            source_id,
        });
        false
    }

    /// Spend the shield on a hit. Returns false if there was none.
    pub fn consume_shield(&mut self, player: &mut Player) -> bool {
        let had_shield = player.shield || self.is_active(PowerUpKind::Shield);
        self.effects.retain(|e| e.kind != PowerUpKind::Shield);
        player.shield = false;
        had_shield
    }

    /// Count down timed effects and revert the ones that ran out
    pub fn update(&mut self, dt_ms: f32, player: &mut Player) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            if !effect.kind.is_timed() {
                return true;
            }
            effect.remaining_ms -= dt_ms;
            if effect.remaining_ms <= 0.0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });

        for kind in &expired {
            if *kind == PowerUpKind::Multiplier {
                player.multiplier = 1.0;
            }
        }
        expired
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: PowerUpKind) -> Option<&ActiveEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
