//! Screen-space geometry and palette
//!
//! Pure functions only; the painter turns these into canvas calls.

use glam::Vec2;

use crate::sim::{Anchor, Aabb, ObstacleKind, Player, PortalKind, SpeedTier};

/// Player color scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skin {
    pub primary: String,
    pub secondary: String,
    pub outline: String,
}

/// Base colors cycled by the customize button
pub const SKIN_COLORS: [&str; 5] = ["#4caf50", "#2196f3", "#f44336", "#ffeb3b", "#9c27b0"];

impl Skin {
    /// Skin for a palette index (wraps)
    pub fn from_index(index: usize) -> Self {
        let base = SKIN_COLORS[index % SKIN_COLORS.len()];
        Self {
            primary: base.to_string(),
            secondary: adjust_color(base, -30),
            outline: adjust_color(base, -50),
        }
    }
}

/// Index of the skin after `index`
pub fn next_skin(index: usize) -> usize {
    (index + 1) % SKIN_COLORS.len()
}

/// Shift every channel of a `#rrggbb` color by `amount`, clamped to 0..=255
///
/// Malformed input is returned unchanged.
pub fn adjust_color(hex: &str, amount: i32) -> String {
    let Some(digits) = hex.strip_prefix('#').filter(|d| d.len() == 6) else {
        return hex.to_string();
    };
    let mut out = String::from("#");
    for i in 0..3 {
        let Ok(channel) = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16) else {
            return hex.to_string();
        };
        let shifted = (channel as i32 + amount).clamp(0, 255);
        out.push_str(&format!("{:02x}", shifted));
    }
    out
}

pub const BACKGROUND_TOP: &str = "#0d0221";
pub const BACKGROUND_BOTTOM: &str = "#241734";
pub const GROUND_COLOR: &str = "#2d1b4e";
pub const GROUND_LINE: &str = "#ff2a6d";
pub const SPIKE_COLOR: &str = "#e0e0e0";
pub const BLOCK_COLOR: &str = "#3a3a5c";
pub const COLLECTIBLE_COLOR: &str = "#ffd700";

/// Portal fill color by effect
pub fn portal_color(kind: PortalKind) -> &'static str {
    match kind {
        PortalKind::Gravity => "#00e5ff",
        PortalKind::Mode(_) => "#ff4081",
        PortalKind::Speed(SpeedTier::Slow) => "#ffa726",
        PortalKind::Speed(SpeedTier::Normal) => "#66bb6a",
        PortalKind::Speed(SpeedTier::Fast) => "#42a5f5",
        PortalKind::Speed(SpeedTier::VeryFast) => "#ab47bc",
    }
}

/// World x to screen x
#[inline]
pub fn screen_x(world_x: f32, camera_x: f32) -> f32 {
    world_x - camera_x
}

/// Whether a world-space box intersects the view horizontally
pub fn is_visible(bounds: &Aabb, camera_x: f32, view_width: f32) -> bool {
    bounds.max.x >= camera_x && bounds.min.x <= camera_x + view_width
}

/// Spike triangles for an obstacle, in screen space
///
/// Blocks have no triangles. Floor spikes point up, ceiling spikes point down.
pub fn spike_triangles(
    kind: ObstacleKind,
    anchor: Anchor,
    bounds: &Aabb,
    camera_x: f32,
) -> Vec<[Vec2; 3]> {
    let count = match kind {
        ObstacleKind::Spike => 1,
        ObstacleKind::DoubleSpike => 2,
        ObstacleKind::Block => return Vec::new(),
    };
    let left = screen_x(bounds.min.x, camera_x);
    let w = bounds.width() / count as f32;
    let (base_y, tip_y) = match anchor {
        Anchor::Floor => (bounds.max.y, bounds.min.y),
        Anchor::Ceiling => (bounds.min.y, bounds.max.y),
    };

    (0..count)
        .map(|i| {
            let x0 = left + w * i as f32;
            [
                Vec2::new(x0, base_y),
                Vec2::new(x0 + w * 0.5, tip_y),
                Vec2::new(x0 + w, base_y),
            ]
        })
        .collect()
}

/// Filled width of the progress bar
pub fn progress_bar_width(percent: f32, full_width: f32) -> f32 {
    (percent.clamp(0.0, 100.0) / 100.0) * full_width
}

/// Cube rotation in radians
///
/// Airborne cubes spin with distance traveled; grounded cubes snap to the
/// nearest quarter turn.
pub fn player_rotation(player: &Player, progress: f32) -> f32 {
    let quarter = std::f32::consts::FRAC_PI_2;
    let spin = progress * 0.05 * player.gravity.sign();
    if player.grounded {
        (spin / quarter).round() * quarter
    } else {
        spin
    }
}
