//! Property tests over arbitrary command streams and frame lengths

use std::collections::HashMap;

use proptest::prelude::*;

use cosmic_runner::GameSettings;
use cosmic_runner::sim::{GameState, LaneMove, PowerUpKind, SessionPhase, TickInput, tick};

fn input_strategy() -> impl Strategy<Value = TickInput> {
    (
        prop::collection::vec(prop_oneof![Just(LaneMove::Left), Just(LaneMove::Right)], 0..4),
        any::<bool>(),
    )
        .prop_map(|(lane_moves, jump)| TickInput { lane_moves, jump })
}

fn busy_settings(lane_count: u8) -> GameSettings {
    GameSettings {
        lane_count,
        obstacle_frequency: 0.1,
        coin_frequency: 0.2,
        power_up_frequency: 0.1,
        starting_lives: 1_000,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn distance_and_speed_never_decrease(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..300),
        dt in 1.0f32..50.0,
    ) {
        let settings = busy_settings(3);
        let mut state = GameState::new(seed, &settings);
        for input in &inputs {
            let (distance, speed) = (state.distance, state.game_speed);
            tick(&mut state, input, &settings, dt);
            prop_assert!(state.distance >= distance);
            prop_assert!(state.game_speed >= speed);
        }
    }

    #[test]
    fn entities_only_move_toward_player(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..300),
    ) {
        let settings = busy_settings(3);
        let mut state = GameState::new(seed, &settings);
        for input in &inputs {
            if state.phase != SessionPhase::Playing {
                break;
            }
            let before: HashMap<u32, f32> =
                state.entities.iter().map(|e| (e.id, e.pos.z)).collect();
            tick(&mut state, input, &settings, 16.0);
            for entity in &state.entities {
                if let Some(z) = before.get(&entity.id) {
                    prop_assert!(entity.pos.z > *z);
                }
                prop_assert!(entity.pos.z < settings.cull_z);
            }
        }
    }

    #[test]
    fn lanes_stay_in_range_and_effects_stay_unique(
        seed in any::<u64>(),
        lane_count in 1u8..6,
        inputs in prop::collection::vec(input_strategy(), 1..300),
    ) {
        let settings = busy_settings(lane_count);
        let mut state = GameState::new(seed, &settings);
        for input in &inputs {
            tick(&mut state, input, &settings, 16.0);
            prop_assert!(state.player.lane < lane_count);
            for kind in PowerUpKind::ALL {
                prop_assert!(state.effects.iter().filter(|e| e.kind == kind).count() <= 1);
            }
            prop_assert!(state.entities.windows(2).all(|w| w[0].id < w[1].id));
        }
    }

    #[test]
    fn same_seed_same_run(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..200),
    ) {
        let settings = busy_settings(3);
        let mut a = GameState::new(seed, &settings);
        let mut b = GameState::new(seed, &settings);
        for input in &inputs {
            prop_assert_eq!(
                tick(&mut a, input, &settings, 16.0),
                tick(&mut b, input, &settings, 16.0)
            );
        }
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(&a.entities, &b.entities);
    }
}
