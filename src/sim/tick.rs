//! Fixed timestep simulation tick
//!
//! Core game loop step. Components run in a fixed order:
//! input, motion, spawning, collisions, culling, power-up decay, scoring.

use super::collision;
use super::motion;
use super::score;
use super::spawner;
use super::state::{GameEvent, GameState, SessionPhase};
use crate::settings::GameSettings;

/// One lateral step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneMove {
    Left,
    Right,
}

/// Commands applied together at the start of a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Lane changes in arrival order (each one clamped on its own)
    pub lane_moves: Vec<LaneMove>,
    /// Jump request
    pub jump: bool,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        self.lane_moves.is_empty() && !self.jump
    }

    pub fn clear(&mut self) {
        self.lane_moves.clear();
        self.jump = false;
    }
}

/// Advance the game state by one fixed timestep of `dt_ms`
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    settings: &GameSettings,
    dt_ms: f32,
) -> Vec<GameEvent> {
    // Don't tick if paused or game over
    if state.phase != SessionPhase::Playing {
        return Vec::new();
    }

    let mut events = Vec::new();
    state.time_ticks += 1;
    state.elapsed_ms += dt_ms as f64;

    for lane_move in &input.lane_moves {
        match lane_move {
            LaneMove::Left => state.player.move_left(),
            LaneMove::Right => state.player.move_right(settings.lane_count),
        }
    }
    if input.jump {
        state.player.jump(settings.jump_height);
    }

    motion::update_player(state, settings);
    motion::advance_entities(state, settings, dt_ms);
    motion::apply_magnet(state, settings, dt_ms);

    spawner::spawn(state, settings);

    // Collisions are checked before culling so nothing leaves play unchecked
    for contact in collision::detect(state, settings) {
        events.extend(collision::resolve(state, contact));
        if state.phase == SessionPhase::GameOver {
            state.normalize_order();
            return events;
        }
    }

    let culled = motion::cull(state, settings);
    if culled > 0 {
        log::trace!("tick {}: culled {}", state.time_ticks, culled);
    }

    for kind in state.effects.update(dt_ms, &mut state.player) {
        log::debug!("{} expired", kind.def().name);
        events.push(GameEvent::PowerUpExpired { kind });
    }

    if let Some(level_up) = score::update(state, settings, dt_ms) {
        events.push(level_up);
    }

    // Ensure deterministic ordering
    state.normalize_order();
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use crate::sim::state::{EntityKind, ObstacleShape, PowerUpKind};
    use glam::Vec3;

    fn quiet_settings() -> GameSettings {
        GameSettings {
            obstacle_frequency: 0.0,
            coin_frequency: 0.0,
            power_up_frequency: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_only_while_playing() {
        let settings = quiet_settings();
        let mut state = GameState::new(1, &settings);
        state.phase = SessionPhase::Paused;
        tick(&mut state, &TickInput::default(), &settings, TICK_MS);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.score, 0);

        state.phase = SessionPhase::Playing;
        tick(&mut state, &TickInput::default(), &settings, TICK_MS);
        assert_eq!(state.time_ticks, 1);
        assert!(state.score > 0);
    }

    #[test]
    fn test_lane_moves_apply_in_order_with_clamping() {
        let settings = quiet_settings();
        let mut state = GameState::new(1, &settings);
        let input = TickInput {
            lane_moves: vec![LaneMove::Left, LaneMove::Left, LaneMove::Right],
            jump: false,
        };
        tick(&mut state, &input, &settings, TICK_MS);
        // 1 -> 0 -> 0 (clamped) -> 1
        assert_eq!(state.player.lane, 1);
    }

    #[test]
    fn test_collision_checked_before_cull() {
        let settings = quiet_settings();
        let mut state = GameState::new(1, &settings);
        // Will land past the cull line this tick, but sweeps through the player
        let id = state.push_entity(
            EntityKind::Obstacle {
                shape: ObstacleShape::Cube,
            },
            Vec3::new(0.0, 0.0, -0.5),
        );
        state.game_speed = 1.0;
        tick(&mut state, &TickInput::default(), &settings, TICK_MS);

        assert_eq!(state.player.lives, 2);
        assert!(state.entity(id).is_none());
    }

    #[test]
    fn test_game_over_stops_score_in_same_tick() {
        let settings = quiet_settings();
        let mut state = GameState::new(1, &settings);
        state.player.lives = 1;
        state.push_entity(
            EntityKind::Obstacle {
                shape: ObstacleShape::Cube,
            },
            Vec3::new(0.0, 0.0, -0.5),
        );
        let events = tick(&mut state, &TickInput::default(), &settings, TICK_MS);
        assert_eq!(state.phase, SessionPhase::GameOver);
        assert_eq!(state.score, 0);
        assert!(events.contains(&GameEvent::GameOver));

        let frozen = (state.score, state.coins, state.level, state.time_ticks);
        tick(&mut state, &TickInput::default(), &settings, TICK_MS);
        assert_eq!(
            frozen,
            (state.score, state.coins, state.level, state.time_ticks)
        );
    }

    #[test]
    fn test_multiplier_expires_after_duration() {
        let settings = quiet_settings();
        let mut state = GameState::new(1, &settings);
        let id = state.push_entity(
            EntityKind::PowerUp {
                kind: PowerUpKind::Multiplier,
            },
            Vec3::new(0.0, 1.0, -0.1),
        );
        tick(&mut state, &TickInput::default(), &settings, TICK_MS);
        assert!(state.entity(id).map(|e| e.consumed).unwrap_or(true));
        assert_eq!(state.player.multiplier, 2.0);

        let mut expired = false;
        for _ in 0..1000 {
            let events = tick(&mut state, &TickInput::default(), &settings, TICK_MS);
            if events.contains(&GameEvent::PowerUpExpired {
                kind: PowerUpKind::Multiplier,
            }) {
                expired = true;
                break;
            }
        }
        assert!(expired);
        assert_eq!(state.player.multiplier, 1.0);
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_long_run_never_overflows() {
        // Speed is uncapped and grows every tick; thousands of ticks push
        // distance and speed to infinity
        let settings = quiet_settings();
        let mut state = GameState::new(1, &settings);
        let mut last = (state.score, state.level, state.distance, state.game_speed);
        for _ in 0..3000 {
            tick(&mut state, &TickInput::default(), &settings, TICK_MS);
            assert_eq!(state.phase, SessionPhase::Playing);
            assert!(state.score >= last.0);
            assert!(state.level >= last.1 && state.level >= 1);
            assert!(state.distance >= last.2);
            assert!(state.game_speed >= last.3);
            last = (state.score, state.level, state.distance, state.game_speed);
        }
        assert_eq!(state.time_ticks, 3000);
        assert_eq!(state.level, u32::MAX);
        assert_eq!(state.score, u64::MAX);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let settings = GameSettings::default();
        let mut state1 = GameState::new(99999, &settings);
        let mut state2 = GameState::new(99999, &settings);

        let inputs = [
            TickInput {
                lane_moves: vec![LaneMove::Left],
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                lane_moves: vec![LaneMove::Right, LaneMove::Right],
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input, &settings, TICK_MS);
                tick(&mut state2, input, &settings, TICK_MS);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.entities, state2.entities);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player, state2.player);
    }
}
