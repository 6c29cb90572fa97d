//! Session phase and the transitions between phases
//!
//! Every input maps to exactly one transition or to a no-op:
//!
//! | phase     | action | pause  | restart | next level | confirm |
//! |-----------|--------|--------|---------|------------|---------|
//! | Idle      | start  | -      | -       | -          | start   |
//! | Running   | jump   | pause  | -       | -          | -       |
//! | Paused    | -      | resume | -       | -          | -       |
//! | Dead      | -      | -      | restart | -          | restart |
//! | Completed | -      | -      | restart | next level | next    |
//!
//! Mute toggling is accepted in every phase and never changes the phase.

use serde::{Deserialize, Serialize};

use super::physics;
use super::state::{GameEvent, GameState};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level loaded, waiting for the start action
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Frozen until resumed
    Paused,
    /// Hit an obstacle; terminal until restart
    Dead,
    /// Reached the end of the level; terminal until restart or next level
    Completed,
}

impl GamePhase {
    /// Dead or Completed
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Dead | GamePhase::Completed)
    }
}

impl GameState {
    /// Idle -> Running
    pub fn start(&mut self) {
        if self.phase != GamePhase::Idle {
            return;
        }
        self.phase = GamePhase::Running;
        log::info!("Level {} started", self.level);
        self.emit(GameEvent::Started { level: self.level });
    }

    /// The "perform action" input: starts an idle level, jumps while running
    pub fn handle_action(&mut self) {
        match self.phase {
            GamePhase::Idle => self.start(),
            GamePhase::Running => {
                if physics::perform_action(&mut self.player, &self.tuning) {
                    self.emit(GameEvent::Jumped {
                        mode: self.player.mode,
                    });
                }
            }
            GamePhase::Paused | GamePhase::Dead | GamePhase::Completed => {}
        }
    }

    /// Running <-> Paused; no-op elsewhere
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                log::info!("Paused at {:.0}", self.progress);
                self.emit(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                log::info!("Resumed");
                self.emit(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.emit(GameEvent::MuteToggled { muted: self.muted });
    }

    /// Return to Idle on `level` with a fresh run
    ///
    /// The RNG keeps its stream, so each attempt gets a different field.
    pub fn reset(&mut self, level: u32) {
        self.level = level.max(1);
        self.clear_run();
        log::info!("Reset to level {}", self.level);
        self.emit(GameEvent::Reset { level: self.level });
    }

    /// Replay the current level from a terminal phase
    pub fn restart(&mut self) {
        if !self.phase.is_terminal() {
            return;
        }
        self.reset(self.level);
        self.start();
    }

    /// Advance to the following level after completing this one
    pub fn next_level(&mut self) {
        if self.phase != GamePhase::Completed {
            return;
        }
        self.reset(self.level + 1);
        self.start();
    }

    /// The "confirm" key: start, restart after death, or advance after completion
    pub fn confirm(&mut self) {
        match self.phase {
            GamePhase::Idle => self.start(),
            GamePhase::Dead => self.restart(),
            GamePhase::Completed => self.next_level(),
            GamePhase::Running | GamePhase::Paused => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases_after(state: &mut GameState, f: impl Fn(&mut GameState)) -> GamePhase {
        f(state);
        state.phase
    }

    #[test]
    fn test_start_from_idle() {
        let mut state = GameState::new(1);
        state.handle_action();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.events(), &[GameEvent::Started { level: 1 }]);
        // Starting does not also jump
        assert_eq!(state.player.vel_y, 0.0);
    }

    #[test]
    fn test_pause_round_trip() {
        let mut state = GameState::new(1);
        state.start();
        assert_eq!(phases_after(&mut state, GameState::toggle_pause), GamePhase::Paused);
        assert_eq!(phases_after(&mut state, GameState::toggle_pause), GamePhase::Running);
    }

    #[test]
    fn test_pause_unreachable_outside_running() {
        let mut state = GameState::new(1);
        assert_eq!(phases_after(&mut state, GameState::toggle_pause), GamePhase::Idle);
        state.phase = GamePhase::Dead;
        assert_eq!(phases_after(&mut state, GameState::toggle_pause), GamePhase::Dead);
        state.phase = GamePhase::Completed;
        assert_eq!(
            phases_after(&mut state, GameState::toggle_pause),
            GamePhase::Completed
        );
    }

    #[test]
    fn test_paused_ignores_everything_but_resume_and_mute() {
        let mut state = GameState::new(1);
        state.start();
        state.toggle_pause();
        let y = state.player.y;

        state.handle_action();
        state.restart();
        state.next_level();
        state.confirm();
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.player.y, y);
        assert_eq!(state.player.vel_y, 0.0);

        state.toggle_mute();
        assert!(state.muted);
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_action_while_dead_is_noop() {
        let mut state = GameState::new(1);
        state.start();
        state.phase = GamePhase::Dead;
        state.player.alive = false;
        let (y, vel) = (state.player.y, state.player.vel_y);
        state.drain_events();

        state.handle_action();
        state.toggle_pause();
        state.next_level();
        assert_eq!(state.phase, GamePhase::Dead);
        assert_eq!(state.player.y, y);
        assert_eq!(state.player.vel_y, vel);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_restart_from_dead_resets_run() {
        let mut state = GameState::new(1);
        state.start();
        state.progress = 1234.0;
        state.score = 123;
        state.collected = 2;
        state.phase = GamePhase::Dead;

        state.restart();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.level, 1);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.collected, 0);
        assert!(state.player.alive);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut state = GameState::new(1);
        state.start();
        state.progress = 50.0;
        state.restart();
        assert_eq!(state.progress, 50.0);
    }

    #[test]
    fn test_next_level_only_after_completion() {
        let mut state = GameState::new(1);
        state.start();
        state.phase = GamePhase::Dead;
        state.next_level();
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Dead);

        state.phase = GamePhase::Completed;
        state.next_level();
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_confirm_dispatch() {
        let mut state = GameState::new(1);
        state.confirm();
        assert_eq!(state.phase, GamePhase::Running);

        state.phase = GamePhase::Dead;
        state.confirm();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.level, 1);

        state.phase = GamePhase::Completed;
        state.confirm();
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut state = GameState::new(1);
        state.start();
        state.muted = true;
        state.reset(4);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.level, 4);
        assert!(state.muted);
        assert!(state.events().contains(&GameEvent::Reset { level: 4 }));
    }
}
