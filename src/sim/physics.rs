//! Vertical kinematics for the player
//!
//! A single constant-gravity model: velocity integrates gravity, position
//! integrates velocity, then the player is clamped into the play band.
//! Per-mode differences come from [`PlayerMode::profile`], never from ad hoc
//! checks on the mode.

use super::state::{Gravity, ModeAction, Player};
use super::tuning::Tuning;

/// Advance the player by one tick
pub fn integrate(player: &mut Player, tuning: &Tuning) {
    if !player.alive {
        return;
    }

    let profile = player.mode.profile();
    let sign = player.gravity.sign();
    player.vel_y += tuning.gravity * profile.gravity_scale * sign;

    // Only the component toward the gravity surface is capped
    if let Some(max_fall) = profile.max_fall_speed {
        if player.vel_y * sign > max_fall {
            player.vel_y = max_fall * sign;
        }
    }

    player.y += player.vel_y;
    clamp_to_band(player, tuning);
}

/// Clamp the player between ceiling and ground
///
/// Hitting the surface gravity pulls toward zeroes velocity and grounds the
/// player. Hitting the opposite surface zeroes velocity without grounding.
pub fn clamp_to_band(player: &mut Player, tuning: &Tuning) {
    let floor = tuning.ground_y - player.size;
    let ceiling = tuning.ceiling_rest_y();
    player.grounded = false;

    if player.y >= floor {
        player.y = floor;
        if player.vel_y > 0.0 {
            player.vel_y = 0.0;
        }
        player.grounded = player.gravity == Gravity::Normal;
    } else if player.y <= ceiling {
        player.y = ceiling;
        if player.vel_y < 0.0 {
            player.vel_y = 0.0;
        }
        player.grounded = player.gravity == Gravity::Inverted;
    }
}

/// Apply the mode's action; returns true when it took effect
pub fn perform_action(player: &mut Player, tuning: &Tuning) -> bool {
    if !player.alive {
        return false;
    }

    let profile = player.mode.profile();
    if profile.action.requires_ground() && !player.grounded {
        return false;
    }

    let impulse = tuning.jump_impulse * profile.impulse_scale;
    match profile.action {
        ModeAction::Jump | ModeAction::Flap => {
            // Against gravity: up on normal gravity, down when inverted
            player.vel_y = -impulse * player.gravity.sign();
        }
        ModeAction::FlipGravity => {
            player.gravity = player.gravity.flipped();
            player.vel_y = impulse * player.gravity.sign();
        }
    }
    player.grounded = false;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlayerMode;

    fn setup() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(&tuning), tuning)
    }

    #[test]
    fn test_resting_player_stays_grounded() {
        let (mut player, tuning) = setup();
        for _ in 0..10 {
            integrate(&mut player, &tuning);
        }
        assert_eq!(player.y, tuning.floor_rest_y());
        assert_eq!(player.vel_y, 0.0);
        assert!(player.grounded);
    }

    #[test]
    fn test_jump_sets_impulse() {
        let (mut player, tuning) = setup();
        assert!(perform_action(&mut player, &tuning));
        assert_eq!(player.vel_y, crate::consts::JUMP_FORCE);
        assert!(!player.grounded);

        let y0 = player.y;
        integrate(&mut player, &tuning);
        assert!(player.y < y0);
        assert!((player.vel_y - (crate::consts::JUMP_FORCE + crate::consts::GRAVITY)).abs() < 1e-5);
    }

    #[test]
    fn test_no_double_jump_for_cube() {
        let (mut player, tuning) = setup();
        assert!(perform_action(&mut player, &tuning));
        integrate(&mut player, &tuning);
        let vel = player.vel_y;
        assert!(!perform_action(&mut player, &tuning));
        assert_eq!(player.vel_y, vel);
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let (mut player, tuning) = setup();
        perform_action(&mut player, &tuning);
        let mut landed = false;
        for _ in 0..100 {
            integrate(&mut player, &tuning);
            assert!(player.y <= tuning.floor_rest_y());
            if player.grounded {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(player.y, tuning.floor_rest_y());
        assert_eq!(player.vel_y, 0.0);
    }

    #[test]
    fn test_inverted_gravity_falls_to_ceiling() {
        let (mut player, tuning) = setup();
        player.gravity = Gravity::Inverted;
        for _ in 0..100 {
            integrate(&mut player, &tuning);
            assert!(player.y >= tuning.ceiling_rest_y());
        }
        assert_eq!(player.y, tuning.ceiling_rest_y());
        assert!(player.grounded);

        // Inverted jump pushes down the screen
        assert!(perform_action(&mut player, &tuning));
        assert_eq!(player.vel_y, tuning.jump_impulse);
    }

    #[test]
    fn test_ship_can_flap_in_air() {
        let (mut player, tuning) = setup();
        player.mode = PlayerMode::Ship;
        assert!(perform_action(&mut player, &tuning));
        integrate(&mut player, &tuning);
        assert!(!player.grounded);
        assert!(perform_action(&mut player, &tuning));
        assert_eq!(player.vel_y, -tuning.jump_impulse * 0.5);
    }

    #[test]
    fn test_ship_fall_speed_capped() {
        let (mut player, tuning) = setup();
        player.mode = PlayerMode::Ship;
        player.y = tuning.ceiling_rest_y() + 1.0;
        for _ in 0..30 {
            integrate(&mut player, &tuning);
            assert!(player.vel_y <= 8.0);
        }
    }

    #[test]
    fn test_ball_flips_gravity() {
        let (mut player, tuning) = setup();
        player.mode = PlayerMode::Ball;
        assert!(perform_action(&mut player, &tuning));
        assert_eq!(player.gravity, Gravity::Inverted);
        assert!(player.vel_y < 0.0);
        // Airborne ball cannot flip again
        integrate(&mut player, &tuning);
        assert!(!perform_action(&mut player, &tuning));
    }

    #[test]
    fn test_dead_player_is_frozen() {
        let (mut player, tuning) = setup();
        player.alive = false;
        player.y = 200.0;
        integrate(&mut player, &tuning);
        assert_eq!(player.y, 200.0);
        assert!(!perform_action(&mut player, &tuning));
    }

    #[test]
    fn test_ceiling_bump_under_normal_gravity() {
        let (mut player, tuning) = setup();
        player.y = tuning.ceiling_rest_y() + 2.0;
        player.vel_y = -20.0;
        integrate(&mut player, &tuning);
        assert_eq!(player.y, tuning.ceiling_rest_y());
        assert_eq!(player.vel_y, 0.0);
        assert!(!player.grounded);
    }
}
