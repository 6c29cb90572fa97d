//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected, seedable randomness only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod phase;
pub mod physics;
pub mod progress;
pub mod random;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod tuning;

pub use clock::FrameClock;
pub use collision::Aabb;
pub use phase::GamePhase;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use state::{
    Anchor, Collectible, FieldEntity, FieldKind, GameEvent, GameState, GameStateBuilder, Gravity,
    ModeAction, ModeProfile, Obstacle, ObstacleKind, Player, PlayerMode, Portal, PortalKind,
    Snapshot, SpeedTier,
};
pub use tick::{TickInput, step, tick};
pub use tuning::{ConfigError, SpawnWeights, Tuning};
