//! Fixed timestep frame clock
//!
//! Converts variable wall-clock frame times into a whole number of
//! `SIM_DT` ticks. Long stalls are clamped so a hitch never turns into a
//! burst of catch-up ticks large enough to tunnel through a platform.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's elapsed time, get the number of ticks to run
    ///
    /// Negative or NaN frame times count as zero.
    pub fn steps(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        if dt.is_nan() {
            return 0;
        }
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Time we couldn't simulate this frame is dropped
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Forget any partial tick (e.g. after a level load)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of a tick waiting in the accumulator
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}
