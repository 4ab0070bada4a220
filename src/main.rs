use nbsim::{bench_gravity, bench_run};
use nbsim::{LevelGenerator, LevelId, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up under `scenarios/`
    #[arg(short, default_value = "false_stability.yaml")]
    file_name: String,

    /// Replace the file's level with a named scenario or level number
    #[arg(long)]
    level: Option<LevelId>,

    /// Seed for procedural levels
    #[arg(long)]
    seed: Option<u64>,

    /// Run the benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(args: &Args) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(&args.file_name);
    let mut scenario_cfg = ScenarioConfig::from_yaml_file(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;

    if let Some(level) = &args.level {
        scenario_cfg.level = Some(level.clone());
        scenario_cfg.system = None;
    }
    if args.seed.is_some() {
        scenario_cfg.seed = args.seed;
    }

    Ok(scenario_cfg)
}

/// Relative drift `|e1 - e0| / |e0|`, or the absolute drift when the run
/// started at (near) zero energy, e.g. a single body at rest
fn energy_drift(e0: f64, e1: f64) -> (f64, &'static str) {
    if e0.abs() > f64::EPSILON {
        (((e1 - e0) / e0).abs(), "relative")
    } else {
        ((e1 - e0).abs(), "absolute")
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        bench_gravity()?;
        bench_run()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args)?;

    let mut generator = LevelGenerator::new();
    let scenario = Scenario::build_scenario(scenario_cfg, &mut generator)?;
    let labels = scenario.level.labels.clone();

    let (mut sim, params) = scenario.into_simulation();
    let e0 = sim.ensemble().total_energy();

    let history = sim.run_with(&params);

    let ensemble = sim.ensemble();
    let e1 = ensemble.total_energy();
    let final_t = history.times().last().copied().unwrap_or(0.0);

    let (drift, kind) = energy_drift(e0, e1);
    info!(
        "{} snapshots, final t = {:.4}, {} energy drift = {:.3e}",
        history.len(),
        final_t,
        kind,
        drift
    );
    for (label, x) in labels.iter().zip(ensemble.positions()) {
        info!("{:>10}: [{:+.4}, {:+.4}, {:+.4}]", label, x.x, x.y, x.z);
    }
    if !ensemble.is_finite() {
        log::warn!("state became non-finite during the run");
    }

    Ok(())
}
