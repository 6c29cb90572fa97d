//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The simulation never plays sounds itself; the frontend maps drained
//! [`GameEvent`]s to [`SoundEffect`]s and plays them here.

use crate::sim::{GameEvent, PortalKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player jumped / flapped / flipped
    Jump,
    /// Player hit an obstacle
    Death,
    /// Gravity or mode portal
    Portal,
    /// Speed portal
    SpeedPortal,
    /// Collectible picked up
    Collect,
    /// Level finished
    LevelComplete,
    /// Run started
    Start,
}

impl SoundEffect {
    /// The cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started { .. } => Some(SoundEffect::Start),
            GameEvent::Jumped { .. } => Some(SoundEffect::Jump),
            GameEvent::Died { .. } => Some(SoundEffect::Death),
            GameEvent::PortalEntered {
                kind: PortalKind::Speed(_),
            } => Some(SoundEffect::SpeedPortal),
            GameEvent::PortalEntered { .. } => Some(SoundEffect::Portal),
            GameEvent::Collected { .. } => Some(SoundEffect::Collect),
            GameEvent::LevelCompleted { .. } => Some(SoundEffect::LevelComplete),
            GameEvent::Paused
            | GameEvent::Resumed
            | GameEvent::MuteToggled { .. }
            | GameEvent::Reset { .. } => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Set SFX volume (0.0 - 1.0)
        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Jump => self.play_jump(ctx, vol),
                SoundEffect::Death => self.play_death(ctx, vol),
                SoundEffect::Portal => self.play_portal(ctx, vol),
                SoundEffect::SpeedPortal => self.play_speed_portal(ctx, vol),
                SoundEffect::Collect => self.play_collect(ctx, vol),
                SoundEffect::LevelComplete => self.play_level_complete(ctx, vol),
                SoundEffect::Start => self.play_start(ctx, vol),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// One enveloped tone, optionally sweeping to `end_freq`
        #[allow(clippy::too_many_arguments)]
        fn tone(
            &self,
            ctx: &AudioContext,
            at: f64,
            freq: f32,
            end_freq: Option<f32>,
            osc_type: OscillatorType,
            level: f32,
            duration: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            gain.gain().set_value_at_time(level, at).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, at + duration)
                .ok();
            if let Some(end) = end_freq {
                osc.frequency().set_value_at_time(freq, at).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end, at + duration)
                    .ok();
            }
            osc.start_with_when(at).ok();
            osc.stop_with_when(at + duration + 0.02).ok();
        }

        /// Jump - quick upward chirp
        fn play_jump(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, t, 300.0, Some(600.0), OscillatorType::Square, vol * 0.2, 0.1);
        }

        /// Death - crunchy downward sweep with a bass thump
        fn play_death(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, t, 400.0, Some(40.0), OscillatorType::Sawtooth, vol * 0.4, 0.4);
            self.tone(ctx, t, 80.0, Some(30.0), OscillatorType::Sine, vol * 0.5, 0.3);
        }

        /// Gravity/mode portal - warbling shimmer
        fn play_portal(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, t, 500.0, Some(1200.0), OscillatorType::Sine, vol * 0.3, 0.25);
            self.tone(ctx, t + 0.05, 750.0, Some(1500.0), OscillatorType::Triangle, vol * 0.15, 0.2);
        }

        /// Speed portal - rising whoosh
        fn play_speed_portal(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, t, 200.0, Some(2000.0), OscillatorType::Sawtooth, vol * 0.15, 0.3);
        }

        /// Collect - bright two-note ding
        fn play_collect(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, t, 988.0, None, OscillatorType::Sine, vol * 0.3, 0.08);
            self.tone(ctx, t + 0.08, 1319.0, None, OscillatorType::Sine, vol * 0.3, 0.15);
        }

        /// Level complete - ascending arpeggio
        fn play_level_complete(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            let notes = [523.0, 659.0, 784.0, 1047.0];
            for (i, freq) in notes.iter().enumerate() {
                let at = t + i as f64 * 0.12;
                self.tone(ctx, at, *freq, None, OscillatorType::Triangle, vol * 0.3, 0.2);
            }
        }

        /// Start - short click
        fn play_start(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, t, 660.0, None, OscillatorType::Square, vol * 0.15, 0.06);
        }
    }
}
