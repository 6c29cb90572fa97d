//! Raw input to simulation commands
//!
//! Key codes follow `KeyboardEvent.code` so the mapping is layout independent.

use crate::sim::TickInput;

/// A discrete command from any input device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Jump / flap / flip
    Action,
    TogglePause,
    ToggleMute,
    /// Start, restart or next level depending on phase
    Confirm,
    Restart,
    NextLevel,
    /// Toggle the autopilot
    ToggleDemo,
}

/// Map a `KeyboardEvent.code` to a command
pub fn command_for_key(code: &str) -> Option<Command> {
    match code {
        "Space" | "ArrowUp" | "KeyW" => Some(Command::Action),
        "Enter" | "NumpadEnter" => Some(Command::Confirm),
        "KeyP" | "Escape" => Some(Command::TogglePause),
        "KeyM" => Some(Command::ToggleMute),
        "KeyI" => Some(Command::ToggleDemo),
        _ => None,
    }
}

/// Map a DOM button id to a command
pub fn command_for_button(id: &str) -> Option<Command> {
    match id {
        "play-btn" => Some(Command::Confirm),
        "restart-btn" => Some(Command::Restart),
        "next-level-btn" => Some(Command::NextLevel),
        "pause-btn" => Some(Command::TogglePause),
        "mute-btn" => Some(Command::ToggleMute),
        _ => None,
    }
}

impl Command {
    /// Record this command on the pending tick input
    pub fn apply(self, input: &mut TickInput) {
        match self {
            Command::Action => input.action = true,
            Command::TogglePause => input.pause = !input.pause,
            Command::ToggleMute => input.mute = !input.mute,
            Command::Confirm => input.confirm = true,
            Command::Restart => input.restart = true,
            Command::NextLevel => input.next_level = true,
            Command::ToggleDemo => input.idle_mode = !input.idle_mode,
        }
    }
}
