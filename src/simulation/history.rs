//! Snapshot buffers produced by a run
//!
//! Three aligned sequences: entry `k` of `positions`, `velocities` and `times`
//! all describe the same simulated instant. Snapshot 0 is the state the run
//! started from.

use super::states::NVec3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    positions: Vec<Vec<NVec3>>,
    velocities: Vec<Vec<NVec3>>,
    times: Vec<f64>,
}

impl History {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            times: Vec::with_capacity(capacity),
        }
    }

    /// Append one snapshot to all three buffers at once
    pub(crate) fn record(&mut self, positions: &[NVec3], velocities: &[NVec3], t: f64) {
        self.positions.push(positions.to_vec());
        self.velocities.push(velocities.to_vec());
        self.times.push(t);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn positions(&self) -> &[Vec<NVec3>] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec<NVec3>] {
        &self.velocities
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Positions of a single body across every snapshot
    pub fn trajectory(&self, body: usize) -> Vec<NVec3> {
        self.positions.iter().map(|snap| snap[body]).collect()
    }

    /// Split into `(positions, velocities, times)`
    pub fn into_parts(self) -> (Vec<Vec<NVec3>>, Vec<Vec<NVec3>>, Vec<f64>) {
        (self.positions, self.velocities, self.times)
    }
}
