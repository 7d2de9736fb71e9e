//! Distance, speed, survival score and level

use super::state::{GameEvent, GameState};
use crate::consts::{LEVEL_DISTANCE, SURVIVAL_SCORE_FACTOR};
use crate::settings::GameSettings;

/// Level for a distance: one level per `LEVEL_DISTANCE` units, starting at 1.
///
/// Speed is uncapped, so distance can outgrow `u32`; the level saturates.
pub fn level_for_distance(distance: f64) -> u32 {
    ((distance / LEVEL_DISTANCE).floor() as u32).saturating_add(1)
}

/// Advance the score engine by one tick
pub fn update(state: &mut GameState, settings: &GameSettings, dt_ms: f32) -> Option<GameEvent> {
    state.distance += state.game_speed as f64 * dt_ms as f64;
    state.game_speed =
        (settings.initial_speed as f64 + state.distance * settings.speed_increment as f64) as f32;

    // Float-to-int casts saturate, so an infinite speed yields u64::MAX here
    let gain = (state.game_speed * state.player.multiplier * SURVIVAL_SCORE_FACTOR).floor();
    state.score = state.score.saturating_add(gain as u64);

    let level = level_for_distance(state.distance);
    if level > state.level {
        state.level = level;
        log::debug!("Level {} at distance {:.0}", level, state.distance);
        return Some(GameEvent::LevelUp { level });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_distance(0.0), 1);
        assert_eq!(level_for_distance(999.9), 1);
        assert_eq!(level_for_distance(1000.0), 2);
        assert_eq!(level_for_distance(5500.0), 6);
    }

    #[test]
    fn test_first_tick() {
        let settings = GameSettings::default();
        let mut state = GameState::new(1, &settings);
        update(&mut state, &settings, 16.0);

        // 0.1 units/ms for 16 ms
        assert!((state.distance - 1.6).abs() < 1e-6);
        let expected_speed = 0.1 + 1.6 * 0.002;
        assert!((state.game_speed as f64 - expected_speed).abs() < 1e-6);
        assert_eq!(state.score, (expected_speed as f32 * 100.0).floor() as u64);
    }

    #[test]
    fn test_multiplier_doubles_survival_score() {
        let settings = GameSettings::default();
        let mut plain = GameState::new(1, &settings);
        let mut doubled = GameState::new(1, &settings);
        doubled.player.multiplier = 2.0;
        update(&mut plain, &settings, 16.0);
        update(&mut doubled, &settings, 16.0);
        assert!(doubled.score >= plain.score * 2);
    }

    #[test]
    fn test_huge_distance_saturates() {
        assert_eq!(level_for_distance(1e300), u32::MAX);
        assert_eq!(level_for_distance(f64::INFINITY), u32::MAX);

        let settings = GameSettings::default();
        let mut state = GameState::new(1, &settings);
        state.distance = f64::MAX;
        state.game_speed = f32::INFINITY;
        state.score = u64::MAX - 5;
        state.level = u32::MAX;
        assert_eq!(update(&mut state, &settings, 16.0), None);
        assert_eq!(state.score, u64::MAX);
        assert_eq!(state.level, u32::MAX);
    }

    #[test]
    fn test_level_up_event() {
        let settings = GameSettings::default();
        let mut state = GameState::new(1, &settings);
        state.distance = 999.0;
        let event = update(&mut state, &settings, 16.0);
        assert_eq!(state.level, 2);
        assert_eq!(event, Some(GameEvent::LevelUp { level: 2 }));
        assert_eq!(update(&mut state, &settings, 16.0), None);
    }
}
