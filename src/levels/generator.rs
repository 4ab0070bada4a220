//! Scenario factory
//!
//! Builds ready-to-run ensembles in AU / days / solar masses, either from a
//! hand-tuned named scenario or procedurally from a level number. Every
//! ensemble handed out is already recentered on its center of mass.

use std::f64::consts::PI;
use std::fmt;

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use super::kepler::keplerian_state;
use crate::error::{SimError, SimResult};
use crate::simulation::states::{Ensemble, NVec3};

/// Gravitational constant in AU^3 / (solar mass * day^2)
pub const G_AU_DAY_MSUN: f64 = 0.00029591220828;
pub const EARTH_MASS: f64 = 3.003e-6;
pub const SUN_MASS: f64 = 1.0;

/// Which level to build: a named scenario or a procedural level number
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum LevelId {
    Procedural(u32),
    Named(String),
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelId::Procedural(n) => write!(f, "level {n}"),
            LevelId::Named(name) => write!(f, "{name}"),
        }
    }
}

impl std::str::FromStr for LevelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u32>() {
            Ok(n) => LevelId::Procedural(n),
            Err(_) => LevelId::Named(s.to_string()),
        })
    }
}

/// A generated system plus the display metadata plotting code wants.
/// `labels[i]` and `colors[i]` belong to body `i` of the ensemble.
#[derive(Debug, Clone)]
pub struct Level {
    pub ensemble: Ensemble,
    pub labels: Vec<String>,
    pub colors: Vec<String>,
    pub legend: bool,
}

pub struct LevelGenerator {
    g: f64,
    rng: ChaCha8Rng,
}

impl LevelGenerator {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self { g: G_AU_DAY_MSUN, rng: ChaCha8Rng::from_entropy() }
    }

    /// Deterministic generator, same seed gives the same levels
    pub fn with_seed(seed: u64) -> Self {
        Self { g: G_AU_DAY_MSUN, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.g
    }

    pub fn generate_level(&mut self, id: &LevelId) -> SimResult<Level> {
        let level = match id {
            LevelId::Named(name) => self.named_scenario(name)?,
            LevelId::Procedural(n) => self.procedural_level(*n)?,
        };
        info!("generated {} with {} bodies", id, level.ensemble.count());
        Ok(level)
    }

    /// Three suns and a planet. `always_stable` keeps the third sun on a wide
    /// circular orbit; `false_stability` drops it onto an eccentric orbit that
    /// dives close to the binary.
    fn named_scenario(&mut self, name: &str) -> SimResult<Level> {
        let g = self.g;
        let binary_sep = 0.2;
        let v_bin = (g * (2.0 * SUN_MASS) / binary_sep).sqrt();
        let v_planet = (g * (0.5 * SUN_MASS) / 0.1).sqrt();

        // distance of the third sun and its speed there
        let (dist_c, v_c) = match name {
            "always_stable" => {
                let dist_c = 4.0;
                (dist_c, (g * (2.0 * SUN_MASS) / dist_c).sqrt())
            }
            "false_stability" => {
                let start_dist_c = 6.0;
                let perihelion_c = 1.2;
                let semi_major_axis = (perihelion_c + start_dist_c) / 2.0;
                let v_aphelion =
                    (g * (2.0 * SUN_MASS) * (2.0 / start_dist_c - 1.0 / semi_major_axis)).sqrt();
                (start_dist_c, v_aphelion)
            }
            other => return Err(SimError::UnknownScenario(other.to_string())),
        };

        let positions = vec![
            NVec3::new(binary_sep / 2.0, 0.0, 0.0),
            NVec3::new(-binary_sep / 2.0, 0.0, 0.0),
            NVec3::new(0.0, dist_c, 0.0),
            NVec3::new(0.1, dist_c, 0.0),
        ];
        let velocities = vec![
            NVec3::new(0.0, v_bin / 2.0, 0.0),
            NVec3::new(0.0, -v_bin / 2.0, 0.0),
            NVec3::new(-v_c, 0.0, 0.0),
            NVec3::new(-v_c, v_planet, 0.0),
        ];
        let masses = vec![SUN_MASS, SUN_MASS, 0.5 * SUN_MASS, EARTH_MASS];

        let mut ensemble = Ensemble::new(masses.len(), positions, velocities, masses, g)?;
        ensemble.recenter_to_zero_momentum_origin();

        Ok(Level {
            ensemble,
            labels: to_strings(&["Sun 1", "Sun 2", "Sun 3", "Planet 1"]),
            colors: to_strings(&["orange", "yellow", "coral", "cyan"]),
            legend: true,
        })
    }

    /// Levels 1-5 orbit a single star, higher levels a binary.
    /// Planet count grows with the level up to 8.
    fn procedural_level(&mut self, level: u32) -> SimResult<Level> {
        let g = self.g;
        let num_stars = if level > 5 { 2 } else { 1 };
        let num_planets = (level as usize + 2).min(8);

        let mut masses = Vec::new();
        let mut positions = Vec::new();
        let mut velocities = Vec::new();
        let mut labels = Vec::new();
        let mut colors = Vec::new();

        if num_stars == 1 {
            masses.push(self.rng.gen_range(1.0..1.2));
            positions.push(NVec3::zeros());
            velocities.push(NVec3::zeros());
            labels.push("Sun".to_string());
            colors.push("gold".to_string());
        } else {
            let m1: f64 = self.rng.gen_range(1.0..1.5);
            let m2: f64 = self.rng.gen_range(0.8..1.0);
            let sep: f64 = self.rng.gen_range(0.3..0.6);

            // distances from the pair's center of mass
            let r1 = sep * m2 / (m1 + m2);
            let r2 = sep * m1 / (m1 + m2);

            // circular orbit
            let period = (4.0 * PI * PI * sep.powi(3) / (g * (m1 + m2))).sqrt();
            let v1 = 2.0 * PI * r1 / period;
            let v2 = 2.0 * PI * r2 / period;

            masses.push(m1);
            positions.push(NVec3::new(-r1, 0.0, 0.0));
            velocities.push(NVec3::new(0.0, -v1, 0.0));
            labels.push("Sun 1".to_string());
            colors.push("darkorange".to_string());

            masses.push(m2);
            positions.push(NVec3::new(r2, 0.0, 0.0));
            velocities.push(NVec3::new(0.0, v2, 0.0));
            labels.push("Sun 2".to_string());
            colors.push("orangered".to_string());
        }

        let total_star_mass: f64 = masses.iter().sum();

        for k in 0..num_planets {
            let a = self.rng.gen_range(2.0..(6.0 + level as f64 * 0.5));

            // 50% circular, 30% elliptical, 20% extreme
            let roll_e: f64 = self.rng.gen();
            let e = if roll_e < 0.5 {
                0.0
            } else if roll_e < 0.8 {
                self.rng.gen_range(0.1..0.3)
            } else {
                self.rng.gen_range(0.4..0.7)
            };

            // 70% flat, 30% tilted up to 45 degrees
            let roll_i: f64 = self.rng.gen();
            let inclination = if roll_i > 0.7 {
                self.rng.gen_range(10.0_f64..45.0).to_radians()
            } else {
                0.0
            };

            let w = self.rng.gen_range(0.0..(2.0 * PI));

            let (x, v) = keplerian_state(g, total_star_mass, a, e, inclination, w);

            masses.push(self.rng.gen_range(1e-5..1e-4));
            positions.push(x);
            velocities.push(v);
            labels.push(format!("Planet {}", k + 1));

            let green: u8 = self.rng.gen_range(100..=255);
            let blue: u8 = self.rng.gen_range(200..=255);
            colors.push(format!("#00{green:02x}{blue:02x}"));
        }

        let mut ensemble = Ensemble::new(masses.len(), positions, velocities, masses, g)?;
        ensemble.recenter_to_zero_momentum_origin();

        Ok(Level { ensemble, labels, colors, legend: true })
    }
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
