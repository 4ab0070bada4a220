use std::time::Instant;

use crate::error::SimResult;
use crate::simulation::engine::Simulation;
use crate::simulation::forces::compute_accelerations;
use crate::simulation::states::{Ensemble, NVec3};

// System sizes to test, from a binary up to well past what levels generate
const SIZES: [usize; 7] = [2, 4, 8, 15, 32, 64, 128];

/// Helper to build a deterministic ensemble of size `n`
fn make_ensemble(n: usize) -> SimResult<Ensemble> {
    let mut positions = Vec::with_capacity(n);
    let mut velocities = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        positions.push(NVec3::new(
            (i_f * 0.37).sin() * 5.0 + i_f * 0.01,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        ));
        velocities.push(NVec3::new(-(i_f * 0.13).cos(), (i_f * 0.37).sin(), 0.0) * 0.01);
    }

    let masses = vec![1.0; n];
    Ensemble::new(n, positions, velocities, masses, 2.959122e-4)
}

/// Time one acceleration evaluation per size
pub fn bench_gravity() -> SimResult<()> {
    println!("N,accel_us");

    for n in SIZES {
        let ens = make_ensemble(n)?;
        let mut out = vec![NVec3::zeros(); n];
        let reps = 1000;

        // Warm up
        compute_accelerations(&ens, &mut out);

        let t0 = Instant::now();
        for _ in 0..reps {
            compute_accelerations(&ens, &mut out);
        }
        let us = t0.elapsed().as_secs_f64() * 1e6 / reps as f64;

        println!("{},{:.3}", n, us);
    }
    Ok(())
}

/// Time a full run (10k steps, 100 snapshots) per size
pub fn bench_run() -> SimResult<()> {
    println!("N,run_ms,snapshots");

    for n in SIZES {
        let mut sim = Simulation::new(make_ensemble(n)?);

        let t0 = Instant::now();
        let history = sim.run(100.0, 0.01, 1.0);
        let ms = t0.elapsed().as_secs_f64() * 1000.0;

        println!("{},{:.3},{}", n, ms, history.len());
    }
    Ok(())
}
