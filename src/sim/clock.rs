//! Fixed-timestep frame clock
//!
//! Display frames arrive at whatever rate the browser manages; the simulation
//! runs in fixed ticks. The clock turns elapsed frame time into a tick count
//! and keeps the clipped frame gap for cosmetic timing.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame gap honored (longer gaps, e.g. a backgrounded tab, are clipped)
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time_ms: Option<f64>,
    last_dt: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp (milliseconds), returning the ticks to run
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time_ms {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time_ms = Some(time_ms);
        self.advance(dt)
    }

    /// Accumulate `dt` seconds, returning the ticks to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.last_dt = dt;
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog the substep cap could not absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Clipped length of the most recent frame, in seconds
    #[inline]
    pub fn last_dt(&self) -> f32 {
        self.last_dt
    }

    /// Forget accumulated time (after pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
        self.last_dt = 0.0;
    }
}
