//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision;
use super::phase::GamePhase;
use super::physics;
use super::progress;
use super::spawn;
use super::state::{FieldKind, GameState, Gravity, ModeAction};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump / flap / flip (click, tap, space, up arrow)
    pub action: bool,
    /// Pause toggle
    pub pause: bool,
    /// Mute toggle
    pub mute: bool,
    /// Replay the level after dying or completing it
    pub restart: bool,
    /// Advance to the next level after completing one
    pub next_level: bool,
    /// Enter: start, restart or next level depending on phase
    pub confirm: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Clear one-shot inputs after a tick consumed them (demo mode persists)
    pub fn clear_one_shots(&mut self) {
        *self = TickInput {
            idle_mode: self.idle_mode,
            ..Default::default()
        };
    }
}

/// Apply this tick's input, then advance the simulation one step
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.mute {
        state.toggle_mute();
    }
    if input.pause {
        state.toggle_pause();
    }
    if input.restart {
        state.restart();
    }
    if input.next_level {
        state.next_level();
    }
    if input.confirm {
        state.confirm();
    }

    let autopilot = input.idle_mode && autopilot_wants_action(state);
    if input.action || autopilot {
        state.handle_action();
    }

    step(state);
}

/// One simulation step: physics, spawn, collision, progress
///
/// A no-op unless the session is Running.
pub fn step(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;

    physics::integrate(&mut state.player, &state.tuning);

    spawn::spawn_ahead(state);
    spawn::despawn_behind(state);

    collision::resolve(state);

    progress::advance(state);
}

/// Frames of warning the autopilot wants before an obstacle
const AUTOPILOT_LEAD_TICKS: f32 = 7.0;

/// Demo-mode decision: start idle levels and hop over whatever is ahead
pub fn autopilot_wants_action(state: &GameState) -> bool {
    match state.phase {
        GamePhase::Idle => return true,
        GamePhase::Running => {}
        _ => return false,
    }

    let player = &state.player;
    let player_box = state.player_hitbox();
    let speed = state.tuning.obstacle_speed * state.speed_multiplier;
    let lead = speed * AUTOPILOT_LEAD_TICKS;

    let threat = state.field.iter().find(|e| {
        matches!(e.kind, FieldKind::Obstacle(_))
            && e.hitbox.max.x > player_box.min.x
            && e.hitbox.min.x - player_box.max.x <= lead
    });

    match player.mode.profile().action {
        ModeAction::Jump => player.grounded && threat.is_some(),
        ModeAction::FlipGravity => {
            // Flip away from an obstacle sitting on our surface
            player.grounded
                && threat.is_some_and(|e| {
                    let on_floor = e.bounds.max.y >= state.tuning.ground_y;
                    on_floor == (player.gravity == Gravity::Normal)
                })
        }
        ModeAction::Flap => {
            // Hold the middle of the band
            let mid = (state.tuning.ceiling_y + state.tuning.ground_y) / 2.0;
            let falling_away = player.vel_y * player.gravity.sign() > 0.0;
            let past_mid = match player.gravity {
                Gravity::Normal => player_box.min.y > mid,
                Gravity::Inverted => player_box.max.y < mid,
            };
            falling_away && past_mid
        }
    }
}
