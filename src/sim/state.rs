//! Game state and core simulation types
//!
//! Everything one session mutates lives in [`GameState`]; it is rebuilt from
//! scratch on every (re)start.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::powerup::PowerUpManager;
use crate::consts::PLAYER_Z;
use crate::lane_offset;
use crate::settings::GameSettings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay, the clock is ticking
    Playing,
    /// Frozen until resumed
    Paused,
    /// Lives ran out; terminal
    GameOver,
}

/// Vertical state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpState {
    Grounded,
    Airborne,
}

/// Obstacle look (cosmetic only, never affects collision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleShape {
    Cube,
    Sphere,
}

impl ObstacleShape {
    pub const ALL: [ObstacleShape; 2] = [ObstacleShape::Cube, ObstacleShape::Sphere];
}

/// Power-up effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Shield,
    Multiplier,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Speed,
        PowerUpKind::Shield,
        PowerUpKind::Multiplier,
        PowerUpKind::Magnet,
    ];
}

/// Entity category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityCategory {
    Obstacle,
    Coin,
    PowerUp,
}

/// Per-category payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle { shape: ObstacleShape },
    Coin,
    PowerUp { kind: PowerUpKind },
}

impl EntityKind {
    pub fn category(&self) -> EntityCategory {
        match self {
            EntityKind::Obstacle { .. } => EntityCategory::Obstacle,
            EntityKind::Coin => EntityCategory::Coin,
            EntityKind::PowerUp { .. } => EntityCategory::PowerUp,
        }
    }
}

/// Something that happened during a tick (for logging, audio and HUD cues)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An obstacle reached the player; `shielded` hits cost no life
    ObstacleHit { id: u32, shielded: bool, lives: u32 },
    CoinCollected { id: u32, score_gain: u64 },
    PowerUpCollected { id: u32, kind: PowerUpKind, refreshed: bool },
    PowerUpExpired { kind: PowerUpKind },
    LevelUp { level: u32 },
    GameOver,
}

/// Something streaming toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec3,
    /// Forward coordinate before this tick's advance (for swept collision)
    pub prev_z: f32,
    /// Coins and power-ups stay visible-but-inert once collected
    pub consumed: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec3) -> Self {
        Self {
            id,
            kind,
            pos,
            prev_z: pos.z,
            consumed: false,
        }
    }

    pub fn category(&self) -> EntityCategory {
        self.kind.category()
    }

    /// Move toward the player by `dz` units
    pub fn advance(&mut self, dz: f32) {
        self.prev_z = self.pos.z;
        self.pos.z += dz;
    }
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Target lane (the avatar eases toward it)
    pub lane: u8,
    pub jump: JumpState,
    pub lives: u32,
    pub shield: bool,
    pub multiplier: f32,
}

impl Player {
    pub fn new(settings: &GameSettings) -> Self {
        let lane = settings.start_lane();
        Self {
            pos: Vec3::new(
                lane_offset(lane, settings.lane_count, settings.lane_width),
                0.0,
                PLAYER_Z,
            ),
            lane,
            jump: JumpState::Grounded,
            lives: settings.starting_lives,
            shield: false,
            multiplier: 1.0,
        }
    }

    pub fn move_left(&mut self) {
        self.lane = self.lane.saturating_sub(1);
    }

    pub fn move_right(&mut self, lane_count: u8) {
        if self.lane + 1 < lane_count {
            self.lane += 1;
        }
    }

    /// Start a jump; no-op while already airborne
    pub fn jump(&mut self, height: f32) -> bool {
        if self.jump == JumpState::Airborne {
            return false;
        }
        self.jump = JumpState::Airborne;
        self.pos.y = height;
        true
    }
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn randomness
    pub rng: Pcg32,
    pub phase: SessionPhase,
    pub player: Player,
    /// Live entities (sorted by id for determinism)
    pub entities: Vec<Entity>,
    pub effects: PowerUpManager,
    pub score: u64,
    pub coins: u32,
    pub level: u32,
    pub distance: f64,
    pub game_speed: f32,
    /// Simulated play time in ms
    pub elapsed_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session state with the given seed
    pub fn new(seed: u64, settings: &GameSettings) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Playing,
            player: Player::new(settings),
            entities: Vec::new(),
            effects: PowerUpManager::default(),
            score: 0,
            coins: 0,
            level: 1,
            distance: 0.0,
            game_speed: settings.initial_speed,
            elapsed_ms: 0.0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an entity with a fresh id and return that id
    pub fn push_entity(&mut self, kind: EntityKind, pos: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity::new(id, kind, pos));
        id
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Remove by id; absent ids are ignored
    pub fn remove_entity(&mut self, id: u32) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}
