//! Simulation runner
//!
//! Owns an `Ensemble` for the duration of a run together with its
//! acceleration scratch buffer, advances it with fixed Euler-Cromer steps and
//! records snapshots into a `History`.

use log::{debug, trace};

use super::history::History;
use super::integrator::euler_cromer_step;
use super::params::RunParameters;
use super::states::{Ensemble, NVec3};

#[derive(Debug, Clone)]
pub struct Simulation {
    ensemble: Ensemble,
    accel: Vec<NVec3>, // scratch, recomputed every step
}

impl Simulation {
    pub fn new(ensemble: Ensemble) -> Self {
        let accel = vec![NVec3::zeros(); ensemble.count()];
        Self { ensemble, accel }
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn into_ensemble(self) -> Ensemble {
        self.ensemble
    }

    /// Accelerations computed by the most recent step
    pub fn last_accelerations(&self) -> &[NVec3] {
        &self.accel
    }

    /// Advance the ensemble by one fixed step
    pub fn step(&mut self, dt: f64) {
        euler_cromer_step(&mut self.ensemble, dt, &mut self.accel);
    }

    /// Run for `time_frame`, stepping by `time_step` and snapshotting roughly
    /// every `output_interval`.
    ///
    /// Snapshot 0 is the current state at t = 0. After step `k` the simulated
    /// time is `k * time_step`; a snapshot is taken whenever that time reaches
    /// or passes the next scheduled output time, so recorded times are the
    /// first step-aligned instant at or after each multiple of
    /// `output_interval`. Time parameters are assumed positive and finite.
    pub fn run(&mut self, time_frame: f64, time_step: f64, output_interval: f64) -> History {
        self.run_with(&RunParameters::new(time_frame, time_step, output_interval))
    }

    pub fn run_with(&mut self, params: &RunParameters) -> History {
        let num_steps = params.num_steps();
        let mut history = History::with_capacity(params.snapshot_estimate());

        debug!(
            "run: {} bodies, {} steps of {}, output every {}",
            self.ensemble.count(),
            num_steps,
            params.time_step,
            params.output_interval
        );

        // Initial conditions
        history.record(&self.ensemble.positions, &self.ensemble.velocities, 0.0);

        let mut output_count: usize = 1;
        let mut next_output_time = output_count as f64 * params.output_interval;

        for step in 1..=num_steps {
            self.step(params.time_step);

            // Derived from the step count, never accumulated
            let current_time = params.time_at(step);

            if current_time >= next_output_time {
                history.record(&self.ensemble.positions, &self.ensemble.velocities, current_time);
                trace!("snapshot {} at t = {}", output_count, current_time);

                output_count += 1;
                next_output_time = output_count as f64 * params.output_interval;
            }
        }

        debug!("run: recorded {} snapshots", history.len());
        history
    }
}
