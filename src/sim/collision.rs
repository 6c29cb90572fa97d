//! Collision detection and interaction response
//!
//! Everything on the field is an axis-aligned box. Overlap uses exclusive
//! bounds: boxes that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::phase::GamePhase;
use super::state::{FieldKind, GameEvent, GameState, PortalKind};

/// Axis-aligned bounding box in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Shrink by `dx` on the left and right and `dy` on top and bottom
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self {
            min: self.min + Vec2::new(dx, dy),
            max: self.max - Vec2::new(dx, dy),
        }
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other.min.x, other.max.x)
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Strict overlap of the horizontal span with `[min_x, max_x]`
    #[inline]
    pub fn overlaps_x(&self, min_x: f32, max_x: f32) -> bool {
        self.min.x < max_x && min_x < self.max.x
    }
}

/// What happened when the player touched a field entity
#[derive(Debug, Clone, Copy, PartialEq)]
enum Interaction {
    Fatal,
    Portal(PortalKind),
    Collect(u32),
}

/// Test the player against the active field and apply the effects
///
/// Entities are visited in spawn order. A fatal hit stops resolution for the
/// rest of the tick. Portals fire once per overlap episode: the effect runs on
/// the tick the player enters and re-arms only after the player has left.
pub fn resolve(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }

    let player_box = state.player_hitbox();
    let mut interactions = Vec::new();

    for entity in &mut state.field {
        // Cheap reject on the player's horizontal slot first
        if !player_box.overlaps_x(entity.hitbox.min.x, entity.hitbox.max.x) {
            if let FieldKind::Portal(portal) = &mut entity.kind {
                portal.inside = false;
            }
            continue;
        }

        let touching = player_box.overlaps(&entity.hitbox);
        match &mut entity.kind {
            FieldKind::Obstacle(_) => {
                if touching {
                    interactions.push(Interaction::Fatal);
                    break;
                }
            }
            FieldKind::Portal(portal) => {
                if touching && !portal.inside {
                    portal.triggers += 1;
                    interactions.push(Interaction::Portal(portal.kind));
                }
                portal.inside = touching;
            }
            FieldKind::Collectible(item) => {
                if touching && !item.collected {
                    item.collected = true;
                    interactions.push(Interaction::Collect(entity.id));
                }
            }
        }
    }

    for interaction in interactions {
        match interaction {
            Interaction::Fatal => {
                kill_player(state);
                return;
            }
            Interaction::Portal(kind) => apply_portal(state, kind),
            Interaction::Collect(id) => collect(state, id),
        }
    }

    state
        .field
        .retain(|e| !matches!(e.kind, FieldKind::Collectible(c) if c.collected));
}

/// Transition to Dead and freeze the player
pub fn kill_player(state: &mut GameState) {
    state.player.alive = false;
    state.player.vel_y = 0.0;
    state.phase = GamePhase::Dead;
    log::info!(
        "Player died at {:.0} ({:.1}%), score {}",
        state.progress,
        state.progress_percent(),
        state.score
    );
    state.emit(GameEvent::Died {
        progress: state.progress,
    });
}

/// Apply a portal's effect to the session
pub fn apply_portal(state: &mut GameState, kind: PortalKind) {
    match kind {
        PortalKind::Gravity => {
            state.player.gravity = state.player.gravity.flipped();
            state.player.grounded = false;
        }
        PortalKind::Mode(mode) => {
            state.player.mode = mode;
        }
        PortalKind::Speed(tier) => {
            state.speed_multiplier = tier.multiplier();
        }
    }
    log::debug!("Portal {:?} entered at {:.0}", kind, state.progress);
    state.emit(GameEvent::PortalEntered { kind });
}

fn collect(state: &mut GameState, id: u32) {
    state.collected += 1;
    state.bonus += state.tuning.collectible_bonus;
    state.score += state.tuning.collectible_bonus;
    log::debug!("Collected #{} (total {})", id, state.collected);
    state.emit(GameEvent::Collected {
        total: state.collected,
    });
}
