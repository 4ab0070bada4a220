//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a validated `ScenarioConfig` (YAML-facing) and produces a runtime
//! `Scenario` containing:
//! - run parameters (`RunParameters`)
//! - the level (`Level`: ensemble at t = 0 plus labels and colors)
//!
//! Levels come either from the `LevelGenerator` or from an explicit list of
//! bodies in the config.

use crate::configuration::config::{BodyConfig, ScenarioConfig, SystemConfig};
use crate::error::{SimError, SimResult};
use crate::levels::generator::{Level, LevelGenerator};
use crate::simulation::engine::Simulation;
use crate::simulation::params::RunParameters;
use crate::simulation::states::{Ensemble, NVec3};

/// Runtime bundle built from a [`ScenarioConfig`]
#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: RunParameters,
    pub level: Level,
}

impl Scenario {
    /// Build from config. A `seed` in the config overrides the generator's
    /// own randomness.
    pub fn build_scenario(
        cfg: ScenarioConfig,
        generator: &mut LevelGenerator,
    ) -> SimResult<Self> {
        cfg.validate()?;

        let run = &cfg.run;
        let parameters = RunParameters::new(run.time_frame, run.time_step, run.output_interval);

        let level = match (cfg.level, cfg.system) {
            (Some(id), _) => match cfg.seed {
                Some(seed) => LevelGenerator::with_seed(seed).generate_level(&id)?,
                None => generator.generate_level(&id)?,
            },
            (None, Some(system)) => level_from_system(system)?,
            (None, None) => {
                return Err(SimError::config("one of `level` or `system` is required"));
            }
        };

        Ok(Self { parameters, level })
    }

    /// Hand the ensemble over to a runner
    pub fn into_simulation(self) -> (Simulation, RunParameters) {
        (Simulation::new(self.level.ensemble), self.parameters)
    }
}

fn level_from_system(system: SystemConfig) -> SimResult<Level> {
    let n = system.bodies.len();

    // BodyConfig -> aligned arrays, index i is body i everywhere
    let positions: Vec<NVec3> = system
        .bodies
        .iter()
        .map(|bc: &BodyConfig| NVec3::from_column_slice(&bc.x))
        .collect();
    let velocities: Vec<NVec3> = system
        .bodies
        .iter()
        .map(|bc| NVec3::from_column_slice(&bc.v))
        .collect();
    let masses: Vec<f64> = system.bodies.iter().map(|bc| bc.m).collect();

    let labels = system
        .bodies
        .iter()
        .enumerate()
        .map(|(i, bc)| bc.label.clone().unwrap_or_else(|| format!("Body {}", i + 1)))
        .collect();
    let colors = system
        .bodies
        .iter()
        .map(|bc| bc.color.clone().unwrap_or_else(|| "white".to_string()))
        .collect();

    let mut ensemble = Ensemble::new(n, positions, velocities, masses, system.g)?;
    if system.recenter {
        ensemble.recenter_to_zero_momentum_origin();
    }

    Ok(Level { ensemble, labels, colors, legend: true })
}
