//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; there is no ambient global
//! state. Renderers and audio read it through [`Snapshot`] and the event queue.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::phase::GamePhase;
use super::random::{RandomSource, SeededRandom};
use super::tuning::{ConfigError, Tuning};

/// Which way gravity pulls the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gravity {
    /// Toward the ground (screen down)
    #[default]
    Normal,
    /// Toward the ceiling (screen up)
    Inverted,
}

impl Gravity {
    /// +1 when pulling down the screen, -1 when pulling up
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Gravity::Normal => 1.0,
            Gravity::Inverted => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Gravity::Normal => Gravity::Inverted,
            Gravity::Inverted => Gravity::Normal,
        }
    }
}

/// What the action input does in a given mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeAction {
    /// Single jump, only from the surface
    Jump,
    /// Upward thrust at any time (multi-jump)
    Flap,
    /// Swap gravity, only from the surface
    FlipGravity,
}

impl ModeAction {
    pub fn requires_ground(self) -> bool {
        !matches!(self, ModeAction::Flap)
    }
}

/// Physics response of a traversal mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModeProfile {
    /// Multiplier on tuning gravity
    pub gravity_scale: f32,
    /// Multiplier on tuning jump impulse
    pub impulse_scale: f32,
    pub action: ModeAction,
    /// Cap on speed toward the surface gravity pulls to
    pub max_fall_speed: Option<f32>,
}

/// Dispatch table indexed by `PlayerMode as usize`
static MODE_PROFILES: [ModeProfile; 3] = [
    // Cube
    ModeProfile {
        gravity_scale: 1.0,
        impulse_scale: 1.0,
        action: ModeAction::Jump,
        max_fall_speed: None,
    },
    // Ship
    ModeProfile {
        gravity_scale: 0.45,
        impulse_scale: 0.5,
        action: ModeAction::Flap,
        max_fall_speed: Some(8.0),
    },
    // Ball
    ModeProfile {
        gravity_scale: 1.0,
        impulse_scale: 0.5,
        action: ModeAction::FlipGravity,
        max_fall_speed: Some(14.0),
    },
];

/// Player traversal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerMode {
    #[default]
    Cube = 0,
    Ship = 1,
    Ball = 2,
}

impl PlayerMode {
    pub const ALL: [PlayerMode; 3] = [PlayerMode::Cube, PlayerMode::Ship, PlayerMode::Ball];

    #[inline]
    pub fn profile(self) -> &'static ModeProfile {
        &MODE_PROFILES[self as usize]
    }
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top edge (screen space, y grows downward)
    pub y: f32,
    pub vel_y: f32,
    pub size: f32,
    pub mode: PlayerMode,
    pub gravity: Gravity,
    /// Resting on the surface gravity pulls toward
    pub grounded: bool,
    pub alive: bool,
}

impl Player {
    /// A fresh cube resting on the ground
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            y: tuning.floor_rest_y(),
            vel_y: 0.0,
            size: tuning.player_size,
            mode: PlayerMode::Cube,
            gravity: Gravity::Normal,
            grounded: true,
            alive: true,
        }
    }

    /// Hitbox with the left edge at `world_x`
    pub fn hitbox(&self, world_x: f32) -> Aabb {
        Aabb::new(world_x, self.y, self.size, self.size)
    }
}

/// Which surface an obstacle is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Floor,
    Ceiling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Spike,
    DoubleSpike,
    Block,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::Spike,
        ObstacleKind::DoubleSpike,
        ObstacleKind::Block,
    ];

    /// Drawn size (width, height)
    pub fn size(self) -> (f32, f32) {
        match self {
            ObstacleKind::Spike => (30.0, 30.0),
            ObstacleKind::DoubleSpike => (60.0, 30.0),
            ObstacleKind::Block => (40.0, 40.0),
        }
    }

    /// Hitbox inset from the drawn shape (horizontal, from the tip side)
    ///
    /// Spikes are triangles, so their box is trimmed to forgive corner grazes.
    pub fn hitbox_inset(self) -> (f32, f32) {
        match self {
            ObstacleKind::Spike | ObstacleKind::DoubleSpike => (6.0, 10.0),
            ObstacleKind::Block => (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub anchor: Anchor,
}

/// Speed tiers set by speed portals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedTier {
    Slow,
    Normal,
    Fast,
    VeryFast,
}

impl SpeedTier {
    pub const ALL: [SpeedTier; 4] = [
        SpeedTier::Slow,
        SpeedTier::Normal,
        SpeedTier::Fast,
        SpeedTier::VeryFast,
    ];

    pub fn multiplier(self) -> f32 {
        match self {
            SpeedTier::Slow => 0.8,
            SpeedTier::Normal => 1.0,
            SpeedTier::Fast => 1.3,
            SpeedTier::VeryFast => 1.6,
        }
    }
}

/// Effect applied when the player passes through a portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortalKind {
    /// Toggle gravity direction
    Gravity,
    /// Switch traversal mode
    Mode(PlayerMode),
    /// Set the speed multiplier
    Speed(SpeedTier),
}

/// Portal width; portals span the whole play band so they cannot be dodged
pub const PORTAL_WIDTH: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub kind: PortalKind,
    /// Player overlapped this portal on the previous resolve
    pub inside: bool,
    /// Number of times the effect has fired
    pub triggers: u32,
}

impl Portal {
    pub fn new(kind: PortalKind) -> Self {
        Self {
            kind,
            inside: false,
            triggers: 0,
        }
    }
}

/// Collectible edge length
pub const COLLECTIBLE_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Collectible {
    pub collected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Obstacle(Obstacle),
    Portal(Portal),
    Collectible(Collectible),
}

/// Anything placed on the field by the spawner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEntity {
    pub id: u32,
    /// World x where the entity was spawned (left edge)
    pub x: f32,
    /// Drawn extent
    pub bounds: Aabb,
    /// Collision extent
    pub hitbox: Aabb,
    pub kind: FieldKind,
}

impl FieldEntity {
    pub fn is_obstacle(&self) -> bool {
        matches!(self.kind, FieldKind::Obstacle(_))
    }

    pub fn is_portal(&self) -> bool {
        matches!(self.kind, FieldKind::Portal(_))
    }

    pub fn is_collectible(&self) -> bool {
        matches!(self.kind, FieldKind::Collectible(_))
    }

    /// Right edge of the drawn extent
    #[inline]
    pub fn right(&self) -> f32 {
        self.bounds.max.x
    }
}

/// Discrete notifications for audio, rendering and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { level: u32 },
    Jumped { mode: PlayerMode },
    Died { progress: f32 },
    PortalEntered { kind: PortalKind },
    Collected { total: u32 },
    LevelCompleted { level: u32, score: u64 },
    Paused,
    Resumed,
    MuteToggled { muted: bool },
    Reset { level: u32 },
}

/// Spawn cursor for the field generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// World x of the most recent spawn
    pub last_spawn_x: f32,
    /// Unscaled gap to the next spawn; scaled by the speed multiplier at placement
    pub next_spacing: f32,
}

/// Read-only view of a session for renderers and HUDs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub level: u32,
    pub player: &'a Player,
    /// Player left edge in screen space
    pub player_screen_x: f32,
    /// World x of the left screen edge
    pub camera_x: f32,
    pub entities: &'a [FieldEntity],
    pub progress: f32,
    /// Completion in [0, 100]
    pub progress_percent: f32,
    pub score: u64,
    pub collected: u32,
    pub speed_multiplier: f32,
    pub muted: bool,
}

/// Complete session state
#[derive(Debug)]
pub struct GameState {
    pub tuning: Tuning,
    /// Current level (1-based)
    pub level: u32,
    pub phase: GamePhase,
    pub player: Player,
    /// Active field entities, ordered by spawn position
    pub field: Vec<FieldEntity>,
    /// Distance traveled in this run, in [0, level_length]
    pub progress: f32,
    pub score: u64,
    /// Score earned from collectibles this run
    pub bonus: u64,
    /// Collectibles picked up this run
    pub collected: u32,
    pub speed_multiplier: f32,
    /// Running ticks simulated this run
    pub time_ticks: u64,
    /// Audio mute (orthogonal to phase)
    pub muted: bool,
    pub spawner: Spawner,
    pub(crate) random: Box<dyn RandomSource>,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a level-1 session with default tuning and a seeded RNG
    pub fn new(seed: u64) -> Self {
        Self::from_parts(Tuning::default(), Box::new(SeededRandom::new(seed)), 1)
    }

    pub fn builder() -> GameStateBuilder {
        GameStateBuilder::default()
    }

    fn from_parts(tuning: Tuning, random: Box<dyn RandomSource>, level: u32) -> Self {
        let mut state = Self {
            player: Player::new(&tuning),
            spawner: Spawner {
                last_spawn_x: tuning.first_spawn_x,
                next_spacing: tuning.min_spacing,
            },
            tuning,
            level,
            phase: GamePhase::Idle,
            field: Vec::new(),
            progress: 0.0,
            score: 0,
            bonus: 0,
            collected: 0,
            speed_multiplier: 1.0,
            time_ticks: 0,
            muted: false,
            random,
            events: Vec::new(),
            next_id: 1,
        };
        state.clear_run();
        state
    }

    /// Reset everything owned by a single run (keeps tuning, RNG, level, mute)
    pub(crate) fn clear_run(&mut self) {
        self.phase = GamePhase::Idle;
        self.player = Player::new(&self.tuning);
        self.field.clear();
        self.progress = 0.0;
        self.score = 0;
        self.bonus = 0;
        self.collected = 0;
        self.speed_multiplier = 1.0;
        self.time_ticks = 0;
        self.spawner.last_spawn_x = self.tuning.first_spawn_x;
        self.spawner.next_spacing =
            super::spawn::draw_spacing(&self.tuning, self.random.as_mut());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events emitted since the last drain, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// World x of the left screen edge
    #[inline]
    pub fn camera_x(&self) -> f32 {
        self.progress
    }

    /// World x of the player's left edge
    #[inline]
    pub fn player_world_x(&self) -> f32 {
        self.tuning.player_world_x(self.progress)
    }

    pub fn player_hitbox(&self) -> Aabb {
        self.player.hitbox(self.player_world_x())
    }

    /// Level completion in [0, 100]
    pub fn progress_percent(&self) -> f32 {
        super::progress::completion_percent(self.progress, self.tuning.level_length)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &FieldEntity> {
        self.field.iter().filter(|e| e.is_obstacle())
    }

    pub fn portals(&self) -> impl Iterator<Item = &FieldEntity> {
        self.field.iter().filter(|e| e.is_portal())
    }

    pub fn collectibles(&self) -> impl Iterator<Item = &FieldEntity> {
        self.field.iter().filter(|e| e.is_collectible())
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            level: self.level,
            player: &self.player,
            player_screen_x: self.tuning.player_screen_x,
            camera_x: self.camera_x(),
            entities: &self.field,
            progress: self.progress,
            progress_percent: self.progress_percent(),
            score: self.score,
            collected: self.collected,
            speed_multiplier: self.speed_multiplier,
            muted: self.muted,
        }
    }
}

/// Validating constructor for [`GameState`]
#[derive(Debug)]
pub struct GameStateBuilder {
    tuning: Tuning,
    random: Option<Box<dyn RandomSource>>,
    level: u32,
}

impl Default for GameStateBuilder {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            random: None,
            level: 1,
        }
    }
}

impl GameStateBuilder {
    pub fn tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Use a PCG source seeded with `seed`
    pub fn seed(mut self, seed: u64) -> Self {
        self.random = Some(Box::new(SeededRandom::new(seed)));
        self
    }

    pub fn random_source(mut self, source: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(source));
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn build(self) -> Result<GameState, ConfigError> {
        self.tuning.validate()?;
        let random = self.random.ok_or(ConfigError::MissingRandomSource)?;
        Ok(GameState::from_parts(self.tuning, random, self.level))
    }
}
