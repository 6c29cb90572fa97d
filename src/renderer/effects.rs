//! Cosmetic effects driven by simulation events
//!
//! None of this feeds back into the simulation.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::sim::{GameEvent, GamePhase, Snapshot};

use super::shapes;

/// Maximum shake displacement in pixels
pub const MAX_SHAKE_OFFSET: f32 = 12.0;
/// Trauma lost per second
pub const SHAKE_DECAY: f32 = 1.8;

/// Trauma-based camera shake
#[derive(Debug, Clone, Default)]
pub struct CameraShake {
    trauma: f32,
}

impl CameraShake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trauma(&self) -> f32 {
        self.trauma
    }

    pub fn add(&mut self, amount: f32) {
        self.trauma = (self.trauma + amount).clamp(0.0, 1.0);
    }

    pub fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Died { .. } => self.add(1.0),
            GameEvent::Reset { .. } => self.trauma = 0.0,
            _ => {}
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.trauma = (self.trauma - SHAKE_DECAY * dt).max(0.0);
    }

    /// Current displacement; `time` is seconds and only varies the direction
    pub fn offset(&self, time: f64) -> Vec2 {
        if self.trauma <= 0.0 {
            return Vec2::ZERO;
        }
        let strength = self.trauma * self.trauma * MAX_SHAKE_OFFSET;
        let t = time as f32;
        Vec2::new((t * 91.0).sin(), (t * 73.0).cos()) * strength
    }
}

/// Number of past player positions kept for the trail
pub const TRAIL_LENGTH: usize = 10;

/// Fading afterimage behind the player, in screen space
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vec2>,
}

impl Trail {
    pub fn push(&mut self, pos: Vec2) {
        if self.points.len() == TRAIL_LENGTH {
            self.points.pop_front();
        }
        self.points.push_back(pos);
    }

    /// Shift older points left as the world scrolls
    pub fn scroll(&mut self, dx: f32) {
        for p in &mut self.points {
            p.x -= dx;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Points oldest first with their alpha in (0, 1]
    pub fn iter(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        let n = self.points.len() as f32;
        self.points
            .iter()
            .enumerate()
            .map(move |(i, p)| (*p, (i + 1) as f32 / n))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Expanding ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub center: Vec2,
    pub radius: f32,
    /// Remaining life in [0, 1]
    pub life: f32,
    pub color: &'static str,
}

/// Ring growth in pixels per second
pub const PULSE_GROWTH: f32 = 180.0;
/// Ring lifetime in seconds
pub const PULSE_LIFETIME: f32 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct Pulses {
    active: Vec<Pulse>,
}

impl Pulses {
    pub fn spawn(&mut self, center: Vec2, color: &'static str) {
        self.active.push(Pulse {
            center,
            radius: 0.0,
            life: 1.0,
            color,
        });
    }

    pub fn update(&mut self, dt: f32) {
        for p in &mut self.active {
            p.radius += PULSE_GROWTH * dt;
            p.life -= dt / PULSE_LIFETIME;
        }
        self.active.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pulse> {
        self.active.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Parallax factor in (0, 1); nearer stars scroll faster
    pub depth: f32,
}

/// Static background stars with parallax scrolling
#[derive(Debug, Clone)]
pub struct StarField {
    stars: Vec<Star>,
    width: f32,
}

impl StarField {
    /// Generate `count` stars inside `width` x `height`
    pub fn generate(seed: u64, count: usize, width: f32, height: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| Star {
                x: rng.random_range(0.0..width),
                y: rng.random_range(0.0..height),
                size: rng.random_range(0.5..2.0),
                depth: rng.random_range(0.05..0.5),
            })
            .collect();
        Self { stars, width }
    }

    /// Stars at their scrolled screen positions
    pub fn positions(&self, camera_x: f32) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.stars.iter().map(move |s| {
            let x = (s.x - camera_x * s.depth).rem_euclid(self.width);
            (Vec2::new(x, s.y), s.size)
        })
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

/// All cosmetic effect state for one canvas
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub shake: CameraShake,
    pub trail: Trail,
    pub pulses: Pulses,
    /// Camera shake allowed by settings
    pub shake_enabled: bool,
    last_camera_x: Option<f32>,
}

impl Effects {
    pub fn new(shake_enabled: bool) -> Self {
        Self {
            shake_enabled,
            ..Default::default()
        }
    }

    /// React to a drained simulation event
    pub fn on_event(&mut self, event: &GameEvent, snap: &Snapshot<'_>) {
        let center = player_center(snap);
        match event {
            GameEvent::Died { .. } if self.shake_enabled => self.shake.on_event(event),
            GameEvent::PortalEntered { kind } => {
                self.pulses.spawn(center, shapes::portal_color(*kind))
            }
            GameEvent::Collected { .. } => self.pulses.spawn(center, shapes::COLLECTIBLE_COLOR),
            GameEvent::Reset { .. } => {
                self.shake.on_event(event);
                self.trail.clear();
                self.pulses.clear();
                self.last_camera_x = None;
            }
            _ => {}
        }
    }

    /// Advance effects by one display frame
    pub fn update(&mut self, dt: f32, snap: &Snapshot<'_>) {
        self.shake.update(dt);
        self.pulses.update(dt);

        let dx = self
            .last_camera_x
            .map_or(0.0, |last| (snap.camera_x - last).max(0.0));
        self.last_camera_x = Some(snap.camera_x);

        if snap.phase == GamePhase::Running {
            self.trail.scroll(dx);
            self.trail.push(player_center(snap));
        }
    }
}

/// Player center in screen space
pub fn player_center(snap: &Snapshot<'_>) -> Vec2 {
    let half = snap.player.size * 0.5;
    Vec2::new(snap.player_screen_x + half, snap.player.y + half)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake_on_death_then_decays() {
        let mut shake = CameraShake::new();
        assert_eq!(shake.offset(1.0), Vec2::ZERO);

        shake.on_event(&GameEvent::Died { progress: 100.0 });
        assert_eq!(shake.trauma(), 1.0);
        assert!(shake.offset(0.3).length() > 0.0);

        for _ in 0..60 {
            shake.update(1.0 / 60.0);
        }
        assert_eq!(shake.trauma(), 0.0);
        assert_eq!(shake.offset(0.3), Vec2::ZERO);
    }

    #[test]
    fn test_shake_cleared_on_reset() {
        let mut shake = CameraShake::new();
        shake.add(0.7);
        shake.on_event(&GameEvent::Reset { level: 1 });
        assert_eq!(shake.trauma(), 0.0);
    }

    #[test]
    fn test_shake_offset_bounded() {
        let mut shake = CameraShake::new();
        shake.add(5.0);
        let o = shake.offset(12.34);
        assert!(o.x.abs() <= MAX_SHAKE_OFFSET && o.y.abs() <= MAX_SHAKE_OFFSET);
    }

    #[test]
    fn test_trail_keeps_newest() {
        let mut trail = Trail::default();
        for i in 0..15 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), TRAIL_LENGTH);
        let (first, alpha) = trail.iter().next().unwrap();
        assert_eq!(first.x, 5.0);
        assert!(alpha < 1.0);
        assert_eq!(trail.iter().last().unwrap().1, 1.0);
    }

    #[test]
    fn test_trail_scrolls() {
        let mut trail = Trail::default();
        trail.push(Vec2::new(150.0, 370.0));
        trail.scroll(6.0);
        assert_eq!(trail.iter().next().unwrap().0.x, 144.0);
    }

    #[test]
    fn test_pulses_expire() {
        let mut pulses = Pulses::default();
        pulses.spawn(Vec2::new(150.0, 200.0), "#fff");
        pulses.update(0.25);
        let p = *pulses.iter().next().unwrap();
        assert_eq!(p.radius, 45.0);
        assert!((p.life - 0.5).abs() < 1e-6);
        pulses.update(0.3);
        assert_eq!(pulses.iter().count(), 0);
    }

    #[test]
    fn test_star_field_deterministic_and_wrapped() {
        let a = StarField::generate(9, 50, 900.0, 400.0);
        let b = StarField::generate(9, 50, 900.0, 400.0);
        let pa: Vec<_> = a.positions(12345.0).collect();
        let pb: Vec<_> = b.positions(12345.0).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.len(), 50);
        for (pos, _) in pa {
            assert!((0.0..900.0).contains(&pos.x));
            assert!((0.0..400.0).contains(&pos.y));
        }
    }

    #[test]
    fn test_effects_respect_shake_setting() {
        let state = crate::sim::GameState::new(1);
        let snap = state.snapshot();
        let mut off = Effects::new(false);
        off.on_event(&GameEvent::Died { progress: 0.0 }, &snap);
        assert_eq!(off.shake.trauma(), 0.0);

        let mut on = Effects::new(true);
        on.on_event(&GameEvent::Died { progress: 0.0 }, &snap);
        assert_eq!(on.shake.trauma(), 1.0);
    }

    #[test]
    fn test_effects_trail_only_while_running() {
        let mut state = crate::sim::GameState::new(1);
        let mut fx = Effects::new(true);
        fx.update(1.0 / 60.0, &state.snapshot());
        assert!(fx.trail.is_empty());

        state.start();
        fx.update(1.0 / 60.0, &state.snapshot());
        assert_eq!(fx.trail.len(), 1);
        let (center, _) = fx.trail.iter().next().unwrap();
        assert_eq!(center, Vec2::new(165.0, 385.0));
    }

    #[test]
    fn test_portal_spawns_pulse() {
        let state = crate::sim::GameState::new(1);
        let mut fx = Effects::new(true);
        fx.on_event(
            &GameEvent::PortalEntered {
                kind: crate::sim::PortalKind::Gravity,
            },
            &state.snapshot(),
        );
        assert_eq!(fx.pulses.iter().count(), 1);
        fx.on_event(&GameEvent::Reset { level: 1 }, &state.snapshot());
        assert_eq!(fx.pulses.iter().count(), 0);
    }
}
