//! Property tests over arbitrary seeds and input sequences

use std::collections::BTreeMap;

use proptest::prelude::*;

use cube_dash::sim::{FieldKind, GamePhase, GameState, SpawnWeights, TickInput, Tuning, tick};

fn state_with_weights(seed: u64, obstacle: u32, portal: u32, collectible: u32) -> GameState {
    let tuning = Tuning {
        weights: SpawnWeights {
            obstacle,
            portal,
            collectible,
        },
        ..Default::default()
    };
    GameState::builder()
        .tuning(tuning)
        .seed(seed)
        .build()
        .unwrap()
}

fn action(pressed: bool) -> TickInput {
    TickInput {
        action: pressed,
        ..Default::default()
    }
}

fn start(state: &mut GameState) {
    tick(state, &action(true));
    assert_eq!(state.phase, GamePhase::Running);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn player_stays_inside_band(
        seed in any::<u64>(),
        presses in prop::collection::vec(any::<bool>(), 1..600),
    ) {
        let mut state = GameState::new(seed);
        start(&mut state);
        let top = state.tuning.ceiling_y;
        let bottom = state.tuning.ground_y - state.player.size;

        for pressed in presses {
            tick(&mut state, &action(pressed));
            prop_assert!(state.player.y >= top, "y {} above ceiling", state.player.y);
            prop_assert!(state.player.y <= bottom, "y {} below ground", state.player.y);
        }
    }

    #[test]
    fn spawn_gaps_stay_within_spacing(seed in any::<u64>()) {
        // Portals and collectibles only, so the run survives and speed portals rescale gaps
        let mut state = state_with_weights(seed, 0, 1, 1);
        start(&mut state);
        let min = state.tuning.min_spacing;
        let max = state.tuning.max_spacing;
        let first_spawn_x = state.tuning.first_spawn_x;

        // Spawning runs before portals resolve, so a tick's spawns use the
        // multiplier it started with
        let mut seen = BTreeMap::new();
        for _ in 0..800 {
            let multiplier = state.speed_multiplier;
            tick(&mut state, &TickInput::default());
            for e in &state.field {
                seen.entry(e.id).or_insert((e.x, multiplier));
            }
        }

        prop_assert!(!seen.is_empty());
        let mut prev = first_spawn_x;
        for (x, multiplier) in seen.into_values() {
            let gap = x - prev;
            prop_assert!(
                gap >= min * multiplier - 0.01 && gap <= max * multiplier + 0.01,
                "gap {} at multiplier {}",
                gap,
                multiplier
            );
            prev = x;
        }
    }

    #[test]
    fn score_and_progress_never_decrease(
        seed in any::<u64>(),
        presses in prop::collection::vec(any::<bool>(), 1..800),
    ) {
        let mut state = GameState::new(seed);
        start(&mut state);
        let mut score = state.score;
        let mut progress = state.progress;

        for pressed in presses {
            tick(&mut state, &action(pressed));
            prop_assert!(state.score >= score);
            prop_assert!(state.progress >= progress);
            prop_assert!(state.progress <= state.tuning.level_length);
            score = state.score;
            progress = state.progress;
        }
    }

    #[test]
    fn portals_fire_exactly_once(
        seed in any::<u64>(),
        presses in prop::collection::vec(any::<bool>(), 200..900),
    ) {
        let mut state = state_with_weights(seed, 0, 1, 0);
        start(&mut state);
        let mut passed = 0;

        for pressed in presses {
            tick(&mut state, &action(pressed));
            let player_left = state.player_hitbox().min.x;
            for e in &state.field {
                if let FieldKind::Portal(portal) = e.kind {
                    prop_assert!(portal.triggers <= 1);
                    if e.hitbox.max.x <= player_left {
                        prop_assert_eq!(portal.triggers, 1);
                        passed += 1;
                    }
                }
            }
        }
        // Portals span the whole band, so any run long enough passes one
        if state.progress > 1500.0 {
            prop_assert!(passed > 0);
        }
    }

    #[test]
    fn dead_session_ignores_gameplay_input(
        seed in any::<u64>(),
        inputs in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..100),
    ) {
        let mut state = state_with_weights(seed, 1, 0, 0);
        start(&mut state);
        for _ in 0..600 {
            if state.phase == GamePhase::Dead {
                break;
            }
            tick(&mut state, &TickInput::default());
        }
        prop_assert_eq!(state.phase, GamePhase::Dead);

        let progress = state.progress;
        let score = state.score;
        let y = state.player.y;
        for (act, pause, next_level) in inputs {
            let input = TickInput {
                action: act,
                pause,
                next_level,
                ..Default::default()
            };
            tick(&mut state, &input);
            prop_assert_eq!(state.phase, GamePhase::Dead);
            prop_assert_eq!(state.progress, progress);
            prop_assert_eq!(state.score, score);
            prop_assert_eq!(state.player.y, y);
        }
    }
}
