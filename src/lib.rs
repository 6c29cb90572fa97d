//! Cube Dash - A side-scrolling obstacle dash arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, field spawning, collisions, game state)
//! - `renderer`: Canvas 2D drawing and cosmetic effects
//! - `platform`: Browser/native input mapping
//! - `audio`: Procedural sound cues driven by simulation events
//! - `settings`: Player preferences

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{GameEvent, GamePhase, GameState, TickInput, Tuning, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Drawing surface dimensions
    pub const CANVAS_WIDTH: f32 = 900.0;
    pub const CANVAS_HEIGHT: f32 = 500.0;

    /// Gravity (pixels/tick², positive is down)
    pub const GRAVITY: f32 = 0.7;
    /// Jump impulse (pixels/tick, negative is up)
    pub const JUMP_FORCE: f32 = -12.0;
    /// Top edge of the ground strip
    pub const GROUND_HEIGHT: f32 = 400.0;
    /// Bottom edge of the ceiling strip (surface for inverted gravity)
    pub const CEILING_HEIGHT: f32 = 60.0;

    /// Scroll speed at speed multiplier 1.0 (pixels/tick)
    pub const OBSTACLE_SPEED: f32 = 6.0;
    /// Spacing between consecutive field entities at speed multiplier 1.0
    pub const OBSTACLE_MIN_DISTANCE: f32 = 300.0;
    pub const OBSTACLE_MAX_DISTANCE: f32 = 500.0;
    /// Distance to travel to complete a level
    pub const LEVEL_LENGTH: f32 = 10000.0;

    /// Player cube edge length
    pub const PLAYER_SIZE: f32 = 30.0;
    /// Fixed screen-space x of the player's left edge
    pub const PLAYER_SCREEN_X: f32 = 150.0;

    /// Score bonus per collectible
    pub const COLLECTIBLE_BONUS: u64 = 50;
    /// Distance units per score point
    pub const DISTANCE_PER_POINT: f32 = 10.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
