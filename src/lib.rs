pub mod error;
pub mod simulation;
pub mod levels;
pub mod configuration;
pub mod benchmark;

pub use error::{SimError, SimResult};

pub use simulation::states::{Ensemble, NVec3};
pub use simulation::forces::{accelerations, compute_accelerations};
pub use simulation::integrator::euler_cromer_step;
pub use simulation::params::RunParameters;
pub use simulation::history::History;
pub use simulation::engine::Simulation;
pub use simulation::scenario::Scenario;

pub use levels::generator::{Level, LevelGenerator, LevelId, G_AU_DAY_MSUN, EARTH_MASS, SUN_MASS};
pub use levels::kepler::keplerian_state;

pub use configuration::config::{RunConfig, BodyConfig, SystemConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_gravity, bench_run};
