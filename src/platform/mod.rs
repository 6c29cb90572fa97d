//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, pointer, touch) mapped to simulation commands

pub mod input;

pub use input::{Command, command_for_button, command_for_key};
