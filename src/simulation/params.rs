//! Time parameters for a run
//!
//! `RunParameters` holds:
//! - the total simulated duration,
//! - the fixed integration step,
//! - the snapshot cadence

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunParameters {
    pub time_frame: f64, // total simulated duration
    pub time_step: f64, // integration step dt
    pub output_interval: f64, // snapshot cadence
}

impl RunParameters {
    pub fn new(time_frame: f64, time_step: f64, output_interval: f64) -> Self {
        Self { time_frame, time_step, output_interval }
    }

    /// Number of integration steps, `floor(time_frame / time_step)`
    pub fn num_steps(&self) -> usize {
        (self.time_frame / self.time_step).floor() as usize
    }

    /// Capacity estimate for the history buffers: one per full interval,
    /// plus the initial and final snapshots
    pub fn snapshot_estimate(&self) -> usize {
        (self.time_frame / self.output_interval).floor() as usize + 2
    }

    /// Simulated time after `step` completed steps
    pub fn time_at(&self, step: usize) -> f64 {
        step as f64 * self.time_step
    }
}
