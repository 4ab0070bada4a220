//! Core state type for the N-body simulation.
//!
//! The ensemble is stored as aligned arrays rather than per-body structs:
//! body `i` is `positions[i]`, `velocities[i]` and `masses[i]`. Nothing in the
//! crate reorders one array without the others, and the body count never
//! changes after construction.

use nalgebra::Vector3;

use crate::error::{SimError, SimResult};

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    pub(crate) positions: Vec<NVec3>, // mutated every step
    pub(crate) velocities: Vec<NVec3>, // mutated every step
    masses: Vec<f64>, // fixed after construction
    g: f64, // gravitational constant
}

impl Ensemble {
    /// Build an ensemble from aligned arrays.
    ///
    /// Fails fast on a zero count, any array whose length differs from `count`,
    /// a negative or non-finite mass, or a non-positive total mass. Arrays are
    /// never truncated or padded to make them fit.
    pub fn new(
        count: usize,
        positions: Vec<NVec3>,
        velocities: Vec<NVec3>,
        masses: Vec<f64>,
        g: f64,
    ) -> SimResult<Self> {
        if count == 0 {
            return Err(SimError::EmptyEnsemble);
        }

        for (field, found) in [
            ("positions", positions.len()),
            ("velocities", velocities.len()),
            ("masses", masses.len()),
        ] {
            if found != count {
                return Err(SimError::LengthMismatch { field, expected: count, found });
            }
        }

        if let Some((index, &mass)) = masses
            .iter()
            .enumerate()
            .find(|(_, m)| !m.is_finite() || **m < 0.0)
        {
            return Err(SimError::InvalidMass { index, mass });
        }

        let total: f64 = masses.iter().sum();
        if total <= 0.0 {
            return Err(SimError::NonPositiveTotalMass(total));
        }

        Ok(Self { positions, velocities, masses, g })
    }

    pub fn count(&self) -> usize {
        self.masses.len()
    }

    pub fn positions(&self) -> &[NVec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[NVec3] {
        &self.velocities
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.g
    }

    pub fn total_mass(&self) -> f64 {
        self.masses.iter().sum()
    }

    /// Mass-weighted average position
    pub fn center_of_mass(&self) -> NVec3 {
        self.weighted_average(&self.positions)
    }

    /// Mass-weighted average velocity
    pub fn center_of_mass_velocity(&self) -> NVec3 {
        self.weighted_average(&self.velocities)
    }

    fn weighted_average(&self, values: &[NVec3]) -> NVec3 {
        let weighted = values
            .iter()
            .zip(self.masses.iter())
            .fold(NVec3::zeros(), |acc, (v, &m)| acc + m * v);
        weighted / self.total_mass()
    }

    /// Shift the whole system so the center of mass sits at the origin and
    /// the net momentum is zero. Masses are untouched.
    pub fn recenter_to_zero_momentum_origin(&mut self) {
        let com_x = self.center_of_mass();
        let com_v = self.center_of_mass_velocity();

        for x in self.positions.iter_mut() {
            *x -= com_x;
        }
        for v in self.velocities.iter_mut() {
            *v -= com_v;
        }
    }

    /// Total linear momentum, sum of m * v
    pub fn total_momentum(&self) -> NVec3 {
        self.velocities
            .iter()
            .zip(self.masses.iter())
            .fold(NVec3::zeros(), |acc, (v, &m)| acc + m * v)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.velocities
            .iter()
            .zip(self.masses.iter())
            .map(|(v, &m)| 0.5 * m * v.norm_squared())
            .sum()
    }

    /// Pairwise gravitational potential energy, -G m_i m_j / r_ij over i < j
    pub fn potential_energy(&self) -> f64 {
        let n = self.count();
        let mut pe = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let r = (self.positions[j] - self.positions[i]).norm();
                pe -= self.g * self.masses[i] * self.masses[j] / r;
            }
        }
        pe
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }

    /// Total angular momentum about the origin, sum of m * (x cross v)
    pub fn angular_momentum(&self) -> NVec3 {
        self.positions
            .iter()
            .zip(self.velocities.iter())
            .zip(self.masses.iter())
            .fold(NVec3::zeros(), |acc, ((x, v), &m)| acc + m * x.cross(v))
    }

    /// Smallest distance between any two bodies, `f64::INFINITY` for a single body
    pub fn min_separation(&self) -> f64 {
        let n = self.count();
        let mut min_sep = f64::INFINITY;
        for i in 0..n {
            for j in (i + 1)..n {
                min_sep = min_sep.min((self.positions[j] - self.positions[i]).norm());
            }
        }
        min_sep
    }

    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .chain(self.velocities.iter())
            .all(|v| v.iter().all(|c| c.is_finite()))
    }
}
