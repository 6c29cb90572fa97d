//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives in [`Tuning`]. Defaults
//! mirror [`crate::consts`]; a JSON file may override any subset of fields.
//! Tuning is validated once, when a session is built, never mid-tick.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while building a session
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("spacing bounds are inverted: min {min} > max {max}")]
    SpacingInverted { min: f32, max: f32 },
    #[error("play band is too small: ceiling {ceiling} and ground {ground} leave no room for a player of size {player}")]
    BandTooSmall { ceiling: f32, ground: f32, player: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("first spawn at {first_spawn_x} is not ahead of the player's front edge at {player_front}")]
    SpawnBehindPlayer { first_spawn_x: f32, player_front: f32 },
    #[error("spawn weights must not all be zero")]
    NoSpawnWeight,
    #[error("spawn weights sum to {total}, more than {}", u32::MAX)]
    WeightOverflow { total: u64 },
    #[error("no randomness source was provided")]
    MissingRandomSource,
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Relative weights for choosing what to spawn next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub obstacle: u32,
    pub portal: u32,
    pub collectible: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            obstacle: 70,
            portal: 10,
            collectible: 20,
        }
    }
}

impl SpawnWeights {
    /// Sum of all weights, widened so extreme overrides cannot overflow
    pub fn total(&self) -> u64 {
        u64::from(self.obstacle) + u64::from(self.portal) + u64::from(self.collectible)
    }
}

/// Gameplay tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Magnitude of the jump impulse (applied against gravity)
    pub jump_impulse: f32,
    /// Top edge of the ground
    pub ground_y: f32,
    /// Bottom edge of the ceiling
    pub ceiling_y: f32,
    /// Scroll distance per tick at speed multiplier 1.0
    pub obstacle_speed: f32,
    pub min_spacing: f32,
    pub max_spacing: f32,
    pub level_length: f32,
    pub player_size: f32,
    /// Player's left edge in screen space
    pub player_screen_x: f32,
    /// Visible width of the field
    pub view_width: f32,
    /// How far past the right screen edge entities are spawned
    pub spawn_lookahead: f32,
    /// Entities are removed once this far behind the left screen edge
    pub despawn_margin: f32,
    /// World x the spawn cursor starts at (spacing is added before the first spawn)
    pub first_spawn_x: f32,
    pub weights: SpawnWeights,
    pub collectible_bonus: u64,
    pub distance_per_point: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: -JUMP_FORCE,
            ground_y: GROUND_HEIGHT,
            ceiling_y: CEILING_HEIGHT,
            obstacle_speed: OBSTACLE_SPEED,
            min_spacing: OBSTACLE_MIN_DISTANCE,
            max_spacing: OBSTACLE_MAX_DISTANCE,
            level_length: LEVEL_LENGTH,
            player_size: PLAYER_SIZE,
            player_screen_x: PLAYER_SCREEN_X,
            view_width: CANVAS_WIDTH,
            spawn_lookahead: 60.0,
            despawn_margin: 100.0,
            first_spawn_x: CANVAS_WIDTH,
            weights: SpawnWeights::default(),
            collectible_bonus: COLLECTIBLE_BONUS,
            distance_per_point: DISTANCE_PER_POINT,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the tuning describes a playable field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("ground_y", self.ground_y),
            ("ceiling_y", self.ceiling_y),
            ("obstacle_speed", self.obstacle_speed),
            ("min_spacing", self.min_spacing),
            ("max_spacing", self.max_spacing),
            ("level_length", self.level_length),
            ("player_size", self.player_size),
            ("player_screen_x", self.player_screen_x),
            ("view_width", self.view_width),
            ("spawn_lookahead", self.spawn_lookahead),
            ("despawn_margin", self.despawn_margin),
            ("first_spawn_x", self.first_spawn_x),
            ("distance_per_point", self.distance_per_point),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        let positive = [
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("obstacle_speed", self.obstacle_speed),
            ("min_spacing", self.min_spacing),
            ("max_spacing", self.max_spacing),
            ("level_length", self.level_length),
            ("player_size", self.player_size),
            ("view_width", self.view_width),
            ("distance_per_point", self.distance_per_point),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("spawn_lookahead", self.spawn_lookahead),
            ("despawn_margin", self.despawn_margin),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let player_front = self.player_screen_x + self.player_size;
        if self.first_spawn_x <= player_front {
            return Err(ConfigError::SpawnBehindPlayer {
                first_spawn_x: self.first_spawn_x,
                player_front,
            });
        }

        if self.min_spacing > self.max_spacing {
            return Err(ConfigError::SpacingInverted {
                min: self.min_spacing,
                max: self.max_spacing,
            });
        }

        if self.ground_y - self.ceiling_y <= self.player_size {
            return Err(ConfigError::BandTooSmall {
                ceiling: self.ceiling_y,
                ground: self.ground_y,
                player: self.player_size,
            });
        }

        match self.weights.total() {
            0 => return Err(ConfigError::NoSpawnWeight),
            total if total > u64::from(u32::MAX) => {
                return Err(ConfigError::WeightOverflow { total });
            }
            _ => {}
        }

        Ok(())
    }

    /// Resting y of the player's top edge on the ground
    #[inline]
    pub fn floor_rest_y(&self) -> f32 {
        self.ground_y - self.player_size
    }

    /// Resting y of the player's top edge against the ceiling
    #[inline]
    pub fn ceiling_rest_y(&self) -> f32 {
        self.ceiling_y
    }

    /// World x of the player's left edge at the given progress
    #[inline]
    pub fn player_world_x(&self, progress: f32) -> f32 {
        progress + self.player_screen_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.gravity, 0.7);
        assert_eq!(t.jump_impulse, 12.0);
        assert_eq!(t.ground_y, 400.0);
        assert_eq!(t.min_spacing, 300.0);
        assert_eq!(t.max_spacing, 500.0);
        assert_eq!(t.level_length, 10000.0);
    }

    #[test]
    fn test_negative_spacing_rejected() {
        let t = Tuning {
            min_spacing: -10.0,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(ConfigError::NotPositive {
                field: "min_spacing",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_spacing_rejected() {
        let t = Tuning {
            min_spacing: 600.0,
            max_spacing: 500.0,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(ConfigError::SpacingInverted { .. })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let t = Tuning {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(ConfigError::NotFinite { field: "gravity", .. })
        ));
    }

    #[test]
    fn test_band_too_small_rejected() {
        let t = Tuning {
            ceiling_y: 380.0,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(ConfigError::BandTooSmall { .. })));
    }

    #[test]
    fn test_zero_weights_rejected() {
        let t = Tuning {
            weights: SpawnWeights {
                obstacle: 0,
                portal: 0,
                collectible: 0,
            },
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(ConfigError::NoSpawnWeight)));
    }

    #[test]
    fn test_overflowing_weights_rejected() {
        let err = Tuning::from_json(
            r#"{"weights":{"obstacle":4294967295,"portal":1,"collectible":0}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WeightOverflow { total: 4_294_967_296 }
        ));
    }

    #[test]
    fn test_max_single_weight_accepted() {
        let t = Tuning {
            weights: SpawnWeights {
                obstacle: u32::MAX,
                portal: 0,
                collectible: 0,
            },
            ..Default::default()
        };
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_negative_despawn_margin_rejected() {
        let t = Tuning {
            despawn_margin: -2000.0,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(ConfigError::Negative {
                field: "despawn_margin",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_lookahead_rejected() {
        let t = Tuning {
            spawn_lookahead: -5000.0,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(ConfigError::Negative {
                field: "spawn_lookahead",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_margins_accepted() {
        let t = Tuning {
            spawn_lookahead: 0.0,
            despawn_margin: 0.0,
            ..Default::default()
        };
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_first_spawn_behind_player_rejected() {
        let t = Tuning {
            first_spawn_x: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(ConfigError::SpawnBehindPlayer { .. })
        ));

        // Touching the player's front edge is still not ahead of it
        let t = Tuning {
            first_spawn_x: PLAYER_SCREEN_X + PLAYER_SIZE,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(ConfigError::SpawnBehindPlayer { .. })
        ));
    }

    #[test]
    fn test_partial_json_override() {
        let t = Tuning::from_json(r#"{ "gravity": 0.9, "weights": { "portal": 0 } }"#)
            .expect("valid json");
        assert_eq!(t.gravity, 0.9);
        assert_eq!(t.weights.portal, 0);
        assert_eq!(t.weights.obstacle, 70);
        assert_eq!(t.level_length, LEVEL_LENGTH);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            Tuning::from_json("{ gravity: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_json_values_rejected() {
        assert!(matches!(
            Tuning::from_json(r#"{ "max_spacing": 100.0 }"#),
            Err(ConfigError::SpacingInverted { .. })
        ));
    }
}
