//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`RunConfig`]      – duration, integration step and snapshot cadence
//! - a level source     – either `level` (named scenario or procedural level
//!                        number, with an optional `seed`) or `system`
//! - [`SystemConfig`]   – explicit bodies and gravitational constant
//! - [`BodyConfig`]     – initial state for each explicit body
//! - [`ScenarioConfig`] – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! A generated level:
//!
//! ```yaml
//! run:
//!   time_frame: 1095.72     # total simulated time (days)
//!   time_step: 0.01         # fixed step size
//!   output_interval: 3.6524 # snapshot cadence
//! level: "false_stability"  # or a level number, e.g. 7
//! seed: 42                  # optional, procedural levels only
//! ```
//!
//! An explicit system:
//!
//! ```yaml
//! run:
//!   time_frame: 100.0
//!   time_step: 0.01
//!   output_interval: 1.0
//! system:
//!   G: 2.959122e-4
//!   recenter: true
//!   bodies:
//!     - x: [ 0.1, 0.0, 0.0 ]
//!       v: [ 0.0, 0.0272, 0.0 ]
//!       m: 1.0
//!       label: "Sun 1"
//!     - x: [ -0.1, 0.0, 0.0 ]
//!       v: [ 0.0, -0.0272, 0.0 ]
//!       m: 1.0
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::levels::generator::LevelId;

/// Time parameters of a run
#[derive(Deserialize, Debug, Clone)]
pub struct RunConfig {
    pub time_frame: f64, // total simulated duration
    pub time_step: f64, // fixed integration step
    pub output_interval: f64, // snapshot cadence, at least one step
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: Vec<f64>, // initial position, 3 components
    pub v: Vec<f64>, // initial velocity, 3 components
    pub m: f64, // mass
    #[serde(default)]
    pub label: Option<String>, // display name, plotting only
    #[serde(default)]
    pub color: Option<String>, // display color, plotting only
}

/// A hand-written system of bodies
#[derive(Deserialize, Debug, Clone)]
pub struct SystemConfig {
    #[serde(rename = "G")]
    pub g: f64, // gravitational constant
    #[serde(default)]
    pub recenter: bool, // move COM to the origin with zero net momentum
    pub bodies: Vec<BodyConfig>,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub run: RunConfig,
    #[serde(default)]
    pub level: Option<LevelId>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub system: Option<SystemConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> SimResult<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &Path) -> SimResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check what serde can't: positive time parameters, exactly one level
    /// source, and 3-component body vectors
    pub fn validate(&self) -> SimResult<()> {
        let run = &self.run;
        for (name, value) in [
            ("time_frame", run.time_frame),
            ("time_step", run.time_step),
            ("output_interval", run.output_interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::config(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if run.output_interval < run.time_step {
            return Err(SimError::config(format!(
                "output_interval ({}) must not be smaller than time_step ({})",
                run.output_interval, run.time_step
            )));
        }

        match (&self.level, &self.system) {
            (Some(_), Some(_)) => {
                Err(SimError::config("give either `level` or `system`, not both"))
            }
            (None, None) => Err(SimError::config("one of `level` or `system` is required")),
            (None, Some(system)) => system.validate(),
            (Some(_), None) => Ok(()),
        }
    }
}

impl SystemConfig {
    fn validate(&self) -> SimResult<()> {
        for (i, b) in self.bodies.iter().enumerate() {
            if b.x.len() != 3 || b.v.len() != 3 {
                return Err(SimError::config(format!(
                    "body {i}: x and v need 3 components, got {} and {}",
                    b.x.len(),
                    b.v.len()
                )));
            }
        }
        Ok(())
    }
}
