//! Procedural field generation
//!
//! The spawner keeps a cursor at the last spawned x and an unscaled gap to the
//! next spawn. The gap is scaled by the current speed multiplier when the next
//! position is computed; whenever the camera's forward edge reaches that
//! position, an entity is placed there and a new gap is drawn. Entities left behind the
//! camera are dropped so the field never grows without bound.

use super::collision::Aabb;
use super::random::RandomSource;
use super::state::{
    Anchor, COLLECTIBLE_SIZE, Collectible, FieldEntity, FieldKind, GameState, Gravity, Obstacle,
    ObstacleKind, PORTAL_WIDTH, PlayerMode, Portal, PortalKind, SpeedTier,
};
use super::tuning::{SpawnWeights, Tuning};

/// Collectible hover heights above the surface
const COLLECTIBLE_HEIGHTS: [f32; 2] = [70.0, 120.0];

/// Broad category picked by weight before the details are rolled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnCategory {
    Obstacle,
    Portal,
    Collectible,
}

/// Unscaled gap to the next spawn, uniform in `[min, max]`
pub fn draw_spacing(tuning: &Tuning, random: &mut dyn RandomSource) -> f32 {
    random.next_range(tuning.min_spacing, tuning.max_spacing)
}

/// Map a unit sample onto the weighted categories
pub fn pick_category(weights: &SpawnWeights, unit: f32) -> SpawnCategory {
    let total = weights.total() as f32;
    let target = unit * total;
    let table = [
        (SpawnCategory::Obstacle, weights.obstacle),
        (SpawnCategory::Portal, weights.portal),
        (SpawnCategory::Collectible, weights.collectible),
    ];

    let mut acc = 0.0;
    let mut last = SpawnCategory::Obstacle;
    for (category, weight) in table {
        if weight == 0 {
            continue;
        }
        acc += weight as f32;
        last = category;
        if target < acc {
            return category;
        }
    }
    // unit == 1.0 lands past the last bucket
    last
}

/// Pick an element of `items` from a unit sample
fn pick<T: Copy>(items: &[T], unit: f32) -> T {
    let idx = ((unit * items.len() as f32) as usize).min(items.len() - 1);
    items[idx]
}

/// Roll a portal effect
fn roll_portal(random: &mut dyn RandomSource) -> PortalKind {
    match pick(&[0u8, 1, 2], random.next_unit()) {
        0 => PortalKind::Gravity,
        1 => PortalKind::Mode(pick(&PlayerMode::ALL, random.next_unit())),
        _ => PortalKind::Speed(pick(&SpeedTier::ALL, random.next_unit())),
    }
}

/// Build the entity for `category` at world `x`
///
/// Surface-attached entities go on the surface gravity currently pulls
/// toward, so an inverted run gets ceiling hazards.
pub fn build_entity(
    tuning: &Tuning,
    gravity: Gravity,
    category: SpawnCategory,
    id: u32,
    x: f32,
    random: &mut dyn RandomSource,
) -> FieldEntity {
    let anchor = match gravity {
        Gravity::Normal => Anchor::Floor,
        Gravity::Inverted => Anchor::Ceiling,
    };

    match category {
        SpawnCategory::Obstacle => {
            let kind = pick(&ObstacleKind::ALL, random.next_unit());
            let (w, h) = kind.size();
            let y = match anchor {
                Anchor::Floor => tuning.ground_y - h,
                Anchor::Ceiling => tuning.ceiling_y,
            };
            let bounds = Aabb::new(x, y, w, h);
            let (ix, iy) = kind.hitbox_inset();
            // Trim the pointed side only
            let hitbox = match anchor {
                Anchor::Floor => Aabb::new(x + ix, y + iy, w - 2.0 * ix, h - iy),
                Anchor::Ceiling => Aabb::new(x + ix, y, w - 2.0 * ix, h - iy),
            };
            FieldEntity {
                id,
                x,
                bounds,
                hitbox,
                kind: FieldKind::Obstacle(Obstacle { kind, anchor }),
            }
        }
        SpawnCategory::Portal => {
            let kind = roll_portal(random);
            let bounds = Aabb::new(
                x,
                tuning.ceiling_y,
                PORTAL_WIDTH,
                tuning.ground_y - tuning.ceiling_y,
            );
            FieldEntity {
                id,
                x,
                bounds,
                hitbox: bounds,
                kind: FieldKind::Portal(Portal::new(kind)),
            }
        }
        SpawnCategory::Collectible => {
            let lift = pick(&COLLECTIBLE_HEIGHTS, random.next_unit());
            let y = match anchor {
                Anchor::Floor => tuning.ground_y - lift - COLLECTIBLE_SIZE,
                Anchor::Ceiling => tuning.ceiling_y + lift,
            };
            let bounds = Aabb::new(x, y, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE);
            FieldEntity {
                id,
                x,
                bounds,
                hitbox: bounds,
                kind: FieldKind::Collectible(Collectible::default()),
            }
        }
    }
}

/// Spawn entities up to the camera's forward edge
///
/// Nothing is placed past the point where the level completes.
pub fn spawn_ahead(state: &mut GameState) {
    let forward_edge = state.camera_x() + state.tuning.view_width + state.tuning.spawn_lookahead;
    let level_end = state.tuning.player_world_x(state.tuning.level_length);

    loop {
        let x = state.spawner.last_spawn_x + state.spawner.next_spacing * state.speed_multiplier;
        if x > forward_edge || x > level_end {
            break;
        }

        let category = pick_category(&state.tuning.weights, state.random.next_unit());
        let id = state.next_entity_id();
        let entity = build_entity(
            &state.tuning,
            state.player.gravity,
            category,
            id,
            x,
            state.random.as_mut(),
        );
        log::debug!("Spawned {:?} #{} at {:.0}", entity.kind, id, x);
        state.field.push(entity);

        state.spawner.last_spawn_x = x;
        state.spawner.next_spacing = draw_spacing(&state.tuning, state.random.as_mut());
    }
}

/// Drop entities that have scrolled fully behind the trailing view
pub fn despawn_behind(state: &mut GameState) {
    let cutoff = state.camera_x() - state.tuning.despawn_margin;
    let before = state.field.len();
    state.field.retain(|e| e.right() >= cutoff);
    let removed = before - state.field.len();
    if removed > 0 {
        log::debug!("Despawned {} entities behind {:.0}", removed, cutoff);
    }
}
