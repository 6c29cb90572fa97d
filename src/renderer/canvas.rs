//! Canvas 2D painter
//!
//! Draws one frame from a [`Snapshot`]; holds no gameplay state.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::effects::{Effects, StarField};
use super::shapes::{self, Skin};
use crate::sim::{FieldEntity, FieldKind, GamePhase, ObstacleKind, PlayerMode, Snapshot, Tuning};

const STAR_COUNT: usize = 80;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    stars: StarField,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, seed: u64) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        let width = canvas.width() as f64;
        let height = canvas.height() as f64;
        let stars = StarField::generate(seed, STAR_COUNT, width as f32, height as f32);
        Ok(Self {
            ctx,
            width,
            height,
            stars,
        })
    }

    pub fn render(
        &self,
        snap: &Snapshot<'_>,
        fx: &Effects,
        skin: &Skin,
        tuning: &Tuning,
        time: f64,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let shake = fx.shake.offset(time / 1000.0);

        ctx.save();
        ctx.translate(shake.x as f64, shake.y as f64)?;

        self.draw_background(snap, tuning);
        for entity in snap.entities {
            if shapes::is_visible(&entity.bounds, snap.camera_x, tuning.view_width) {
                self.draw_entity(entity, snap.camera_x)?;
            }
        }
        self.draw_effects(fx, skin)?;
        if snap.player.alive {
            self.draw_player(snap, skin)?;
        }

        ctx.restore();

        self.draw_progress_bar(snap);
        self.draw_overlay(snap)?;
        Ok(())
    }

    fn draw_background(&self, snap: &Snapshot<'_>, tuning: &Tuning) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(shapes::BACKGROUND_TOP);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.set_fill_style_str("#ffffff");
        for (pos, size) in self.stars.positions(snap.camera_x) {
            ctx.set_global_alpha(0.3 + size as f64 * 0.3);
            ctx.fill_rect(pos.x as f64, pos.y as f64, size as f64, size as f64);
        }
        ctx.set_global_alpha(1.0);

        let ground = tuning.ground_y as f64;
        let ceiling = tuning.ceiling_y as f64;

        ctx.set_fill_style_str(shapes::BACKGROUND_BOTTOM);
        ctx.fill_rect(0.0, 0.0, self.width, ceiling);
        ctx.set_fill_style_str(shapes::GROUND_COLOR);
        ctx.fill_rect(0.0, ground, self.width, self.height - ground);

        // Ground tiles scroll with the camera
        let tile = 60.0;
        let offset = (snap.camera_x as f64).rem_euclid(tile);
        ctx.set_stroke_style_str(shapes::GROUND_LINE);
        ctx.set_line_width(1.0);
        ctx.set_global_alpha(0.35);
        let mut x = -offset;
        while x < self.width {
            ctx.begin_path();
            ctx.move_to(x, ground);
            ctx.line_to(x, self.height);
            ctx.stroke();
            x += tile;
        }
        ctx.set_global_alpha(1.0);

        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.move_to(0.0, ground);
        ctx.line_to(self.width, ground);
        ctx.move_to(0.0, ceiling);
        ctx.line_to(self.width, ceiling);
        ctx.stroke();
    }

    fn draw_entity(&self, entity: &FieldEntity, camera_x: f32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let b = &entity.bounds;
        let x = shapes::screen_x(b.min.x, camera_x) as f64;
        let y = b.min.y as f64;
        let w = b.width() as f64;
        let h = b.height() as f64;

        match entity.kind {
            FieldKind::Obstacle(obstacle) if obstacle.kind == ObstacleKind::Block => {
                ctx.set_fill_style_str(shapes::BLOCK_COLOR);
                ctx.fill_rect(x, y, w, h);
                ctx.set_stroke_style_str(shapes::SPIKE_COLOR);
                ctx.set_line_width(2.0);
                ctx.stroke_rect(x, y, w, h);
            }
            FieldKind::Obstacle(obstacle) => {
                ctx.set_fill_style_str(shapes::SPIKE_COLOR);
                for tri in shapes::spike_triangles(obstacle.kind, obstacle.anchor, b, camera_x) {
                    ctx.begin_path();
                    ctx.move_to(tri[0].x as f64, tri[0].y as f64);
                    ctx.line_to(tri[1].x as f64, tri[1].y as f64);
                    ctx.line_to(tri[2].x as f64, tri[2].y as f64);
                    ctx.close_path();
                    ctx.fill();
                }
            }
            FieldKind::Portal(portal) => {
                ctx.set_global_alpha(if portal.triggers > 0 { 0.35 } else { 0.8 });
                ctx.set_fill_style_str(shapes::portal_color(portal.kind));
                ctx.fill_rect(x, y, w, h);
                ctx.set_global_alpha(1.0);
            }
            FieldKind::Collectible(_) => {
                ctx.set_fill_style_str(shapes::COLLECTIBLE_COLOR);
                ctx.begin_path();
                ctx.arc(x + w / 2.0, y + h / 2.0, w / 2.0, 0.0, TAU)?;
                ctx.fill();
            }
        }
        Ok(())
    }

    fn draw_effects(&self, fx: &Effects, skin: &Skin) -> Result<(), JsValue> {
        let ctx = &self.ctx;

        ctx.set_fill_style_str(&skin.primary);
        for (pos, alpha) in fx.trail.iter() {
            let half = 8.0 * alpha as f64;
            ctx.set_global_alpha(alpha as f64 * 0.4);
            ctx.fill_rect(pos.x as f64 - half, pos.y as f64 - half, half * 2.0, half * 2.0);
        }

        ctx.set_line_width(3.0);
        for pulse in fx.pulses.iter() {
            ctx.set_global_alpha(pulse.life.max(0.0) as f64);
            ctx.set_stroke_style_str(pulse.color);
            ctx.begin_path();
            ctx.arc(pulse.center.x as f64, pulse.center.y as f64, pulse.radius as f64, 0.0, TAU)?;
            ctx.stroke();
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_player(&self, snap: &Snapshot<'_>, skin: &Skin) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let player = snap.player;
        let size = player.size as f64;
        let half = size / 2.0;
        let center = super::effects::player_center(snap);

        ctx.save();
        ctx.translate(center.x as f64, center.y as f64)?;

        match player.mode {
            PlayerMode::Cube => {
                ctx.rotate(shapes::player_rotation(player, snap.progress) as f64)?;
                ctx.set_fill_style_str(&skin.primary);
                ctx.fill_rect(-half, -half, size, size);
                ctx.set_fill_style_str(&skin.secondary);
                ctx.fill_rect(-half / 2.0, -half / 2.0, half, half);
                ctx.set_stroke_style_str(&skin.outline);
                ctx.set_line_width(2.0);
                ctx.stroke_rect(-half, -half, size, size);
            }
            PlayerMode::Ship => {
                let tilt = (player.vel_y as f64 * 0.05).clamp(-0.6, 0.6);
                ctx.rotate(tilt)?;
                ctx.set_fill_style_str(&skin.primary);
                ctx.begin_path();
                ctx.move_to(half, 0.0);
                ctx.line_to(-half, -half * 0.7);
                ctx.line_to(-half * 0.5, 0.0);
                ctx.line_to(-half, half * 0.7);
                ctx.close_path();
                ctx.fill();
                ctx.set_stroke_style_str(&skin.outline);
                ctx.set_line_width(2.0);
                ctx.stroke();
            }
            PlayerMode::Ball => {
                ctx.set_fill_style_str(&skin.primary);
                ctx.begin_path();
                ctx.arc(0.0, 0.0, half, 0.0, TAU)?;
                ctx.fill();
                ctx.set_stroke_style_str(&skin.outline);
                ctx.set_line_width(2.0);
                ctx.stroke();
                ctx.set_fill_style_str(&skin.secondary);
                ctx.begin_path();
                ctx.arc(0.0, 0.0, half * 0.4, 0.0, TAU)?;
                ctx.fill();
            }
        }

        ctx.restore();
        Ok(())
    }

    fn draw_progress_bar(&self, snap: &Snapshot<'_>) {
        let ctx = &self.ctx;
        let full = self.width - 40.0;
        ctx.set_fill_style_str("rgba(255, 255, 255, 0.15)");
        ctx.fill_rect(20.0, 16.0, full, 6.0);
        ctx.set_fill_style_str(shapes::GROUND_LINE);
        let filled = shapes::progress_bar_width(snap.progress_percent, full as f32);
        ctx.fill_rect(20.0, 16.0, filled as f64, 6.0);
    }

    fn draw_overlay(&self, snap: &Snapshot<'_>) -> Result<(), JsValue> {
        let text = match snap.phase {
            GamePhase::Idle => "Click or press Space to start",
            GamePhase::Paused => "Paused",
            GamePhase::Running | GamePhase::Dead | GamePhase::Completed => return Ok(()),
        };
        let ctx = &self.ctx;
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.45)");
        ctx.fill_rect(0.0, 0.0, self.width, self.height);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 28px sans-serif");
        ctx.set_text_align("center");
        ctx.fill_text(text, self.width / 2.0, self.height / 2.0)
    }
}
