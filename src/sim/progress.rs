//! Level progress and score

use super::phase::GamePhase;
use super::state::{GameEvent, GameState};

/// Completion percentage in [0, 100]
pub fn completion_percent(progress: f32, level_length: f32) -> f32 {
    if level_length <= 0.0 {
        return 0.0;
    }
    (progress / level_length * 100.0).clamp(0.0, 100.0)
}

/// Distance component of the score
#[inline]
pub fn distance_score(progress: f32, distance_per_point: f32) -> u64 {
    (progress.max(0.0) / distance_per_point).floor() as u64
}

/// Advance progress by one Running tick and fire completion
///
/// Progress is capped at the level length. Completion fires on the exact
/// tick progress first reaches it; the phase change stops further ticks.
pub fn advance(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }

    let step = state.tuning.obstacle_speed * state.speed_multiplier;
    state.progress = (state.progress + step).min(state.tuning.level_length);

    let score = distance_score(state.progress, state.tuning.distance_per_point) + state.bonus;
    state.score = state.score.max(score);

    if state.progress >= state.tuning.level_length {
        state.phase = GamePhase::Completed;
        log::info!(
            "Level {} complete: score {}, {} collected",
            state.level,
            state.score,
            state.collected
        );
        state.emit(GameEvent::LevelCompleted {
            level: state.level,
            score: state.score,
        });
    }
}
