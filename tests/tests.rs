use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use nbsim::{accelerations, compute_accelerations, euler_cromer_step, Ensemble, NVec3, Simulation};
use nbsim::{LevelGenerator, LevelId, Scenario, ScenarioConfig, SimError, G_AU_DAY_MSUN};

use std::f64::consts::PI;
use std::path::PathBuf;

const G: f64 = 0.0002959122;

/// Build a simple 2-body ensemble separated along the x axis, at rest
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> Ensemble {
    Ensemble::new(
        2,
        vec![[-dist / 2.0, 0.0, 0.0].into(), [dist / 2.0, 0.0, 0.0].into()],
        vec![NVec3::zeros(); 2],
        vec![m1, m2],
        0.1,
    )
    .unwrap()
}

/// Equal-mass binary at +-0.1 on a circular orbit, and its period
pub fn circular_binary() -> (Ensemble, f64) {
    let sep = 0.2;
    let v_rel = (G * 2.0 / sep).sqrt();
    let period = 2.0 * PI * sep / v_rel;
    let ens = Ensemble::new(
        2,
        vec![[0.1, 0.0, 0.0].into(), [-0.1, 0.0, 0.0].into()],
        vec![[0.0, v_rel / 2.0, 0.0].into(), [0.0, -v_rel / 2.0, 0.0].into()],
        vec![1.0, 1.0],
        G,
    )
    .unwrap();
    (ens, period)
}

pub fn single_body() -> Ensemble {
    Ensemble::new(1, vec![[1.0, 2.0, 3.0].into()], vec![NVec3::zeros()], vec![1.0], G).unwrap()
}

/// Random ensemble with `n` bodies, reproducible per seed
pub fn random_ensemble(seed: u64, n: usize) -> Ensemble {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let vec3 = |rng: &mut ChaCha8Rng, s: f64| {
        NVec3::new(rng.gen_range(-s..s), rng.gen_range(-s..s), rng.gen_range(-s..s))
    };
    let positions = (0..n).map(|_| vec3(&mut rng, 10.0)).collect();
    let velocities = (0..n).map(|_| vec3(&mut rng, 0.5)).collect();
    let masses = (0..n).map(|_| rng.gen_range(1e-6..2.0)).collect();
    Ensemble::new(n, positions, velocities, masses, G).unwrap()
}

// ==================================================================================
// Construction tests
// ==================================================================================

#[test]
fn construction_rejects_empty() {
    let err = Ensemble::new(0, vec![], vec![], vec![], G).unwrap_err();
    assert!(matches!(err, SimError::EmptyEnsemble));
}

#[test]
fn construction_rejects_mismatched_lengths() {
    let err = Ensemble::new(
        2,
        vec![NVec3::zeros(); 2],
        vec![NVec3::zeros(); 1],
        vec![1.0; 2],
        G,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SimError::LengthMismatch { field: "velocities", expected: 2, found: 1 }
    ));

    let err = Ensemble::new(
        2,
        vec![NVec3::zeros(); 2],
        vec![NVec3::zeros(); 2],
        vec![1.0; 3],
        G,
    )
    .unwrap_err();
    assert!(matches!(err, SimError::LengthMismatch { field: "masses", .. }));
}

#[test]
fn construction_rejects_bad_masses() {
    let err = Ensemble::new(
        2,
        vec![NVec3::zeros(); 2],
        vec![NVec3::zeros(); 2],
        vec![1.0, -1.0],
        G,
    )
    .unwrap_err();
    assert!(matches!(err, SimError::InvalidMass { index: 1, .. }));

    let err = Ensemble::new(
        1,
        vec![NVec3::zeros()],
        vec![NVec3::zeros()],
        vec![0.0],
        G,
    )
    .unwrap_err();
    assert!(matches!(err, SimError::NonPositiveTotalMass(_)));
}

#[test]
fn construction_accepts_test_particles() {
    let ens = Ensemble::new(
        2,
        vec![NVec3::zeros(), [1.0, 0.0, 0.0].into()],
        vec![NVec3::zeros(); 2],
        vec![1.0, 0.0],
        G,
    );
    assert!(ens.is_ok());
}

// ==================================================================================
// Recentering tests
// ==================================================================================

#[test]
fn recenter_zeroes_com_and_momentum() {
    for seed in 0..20 {
        let mut ens = random_ensemble(seed, 2 + seed as usize % 12);
        let masses_before = ens.masses().to_vec();

        ens.recenter_to_zero_momentum_origin();

        assert!(ens.center_of_mass().norm() < 1e-12, "seed {seed}: COM {:?}", ens.center_of_mass());
        assert!(ens.center_of_mass_velocity().norm() < 1e-14, "seed {seed}");
        assert!(ens.total_momentum().norm() < 1e-13, "seed {seed}");
        assert_eq!(ens.masses(), &masses_before[..]);
    }
}

#[test]
fn recenter_preserves_relative_geometry() {
    let mut ens = random_ensemble(5, 6);
    let before = ens.clone();
    ens.recenter_to_zero_momentum_origin();

    for i in 0..ens.count() {
        for j in 0..ens.count() {
            let d0 = before.positions()[i] - before.positions()[j];
            let d1 = ens.positions()[i] - ens.positions()[j];
            assert!((d0 - d1).norm() < 1e-12);
        }
    }
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_self_interaction_is_zero() {
    let acc = accelerations(&single_body());
    assert_eq!(acc, vec![NVec3::zeros()]);
}

#[test]
fn gravity_newton_third_law() {
    let ens = two_body_system(1.0, 2.0, 3.0);
    let acc = accelerations(&ens);

    let (m0, m1) = (ens.masses()[0], ens.masses()[1]);
    let expected = -(m1 / m0) * acc[1];
    for k in 0..3 {
        assert_relative_eq!(acc[0][k], expected[k], max_relative = 1e-12);
    }

    let net = acc[0] * m0 + acc[1] * m1;
    assert!(net.norm() < 1e-12, "Net force not zero: {:?}", net);
}

#[test]
fn gravity_points_toward_other_body() {
    let ens = two_body_system(2.0, 1.0, 1.0);
    let acc = accelerations(&ens);

    let dx = ens.positions()[1] - ens.positions()[0];
    assert!(acc[0].dot(&dx) > 0.0, "Acceleration is not toward second body");
    assert!(acc[1].dot(&dx) < 0.0, "Acceleration is not toward first body");
}

#[test]
fn gravity_inverse_square_law() {
    let acc_r = accelerations(&two_body_system(1.0, 1.0, 1.0));
    let acc_2r = accelerations(&two_body_system(2.0, 1.0, 1.0));

    let ratio = acc_r[0].norm() / acc_2r[0].norm();
    assert_relative_eq!(ratio, 4.0, max_relative = 1e-12);
}

#[test]
fn gravity_matches_closed_form() {
    // |a_0| = G m_1 / d^2
    let ens = two_body_system(0.5, 1.0, 3.0);
    let acc = accelerations(&ens);
    assert_relative_eq!(acc[0].x, 0.1 * 3.0 / 0.25, max_relative = 1e-12);
    assert_abs_diff_eq!(acc[0].y, 0.0);
    assert_abs_diff_eq!(acc[0].z, 0.0);
}

#[test]
fn gravity_superposes_over_bodies() {
    // Middle body of three equal masses on a line feels no net pull
    let ens = Ensemble::new(
        3,
        vec![[-1.0, 0.0, 0.0].into(), NVec3::zeros(), [1.0, 0.0, 0.0].into()],
        vec![NVec3::zeros(); 3],
        vec![1.0; 3],
        1.0,
    )
    .unwrap();
    let acc = accelerations(&ens);
    assert!(acc[1].norm() < 1e-15);
    assert_relative_eq!(acc[0].x, 1.0 + 0.25, max_relative = 1e-12);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn step_updates_velocity_before_position() {
    let (mut ens, _) = circular_binary();
    let dt = 0.5;
    let x0 = ens.positions().to_vec();
    let v0 = ens.velocities().to_vec();
    let a0 = accelerations(&ens);

    let mut scratch = vec![NVec3::zeros(); 2];
    euler_cromer_step(&mut ens, dt, &mut scratch);

    for i in 0..2 {
        let v1 = v0[i] + dt * a0[i];
        assert_eq!(ens.velocities()[i], v1);
        // drift uses the kicked velocity, not v0
        assert_eq!(ens.positions()[i], x0[i] + dt * v1);
    }
    assert_eq!(scratch, a0);
}

/// Three equal masses on a line, at rest
fn three_in_a_row() -> Ensemble {
    Ensemble::new(
        3,
        vec![[-1.0, 0.0, 0.0].into(), [0.0, 1.0, 0.0].into(), [1.0, 0.0, 0.0].into()],
        vec![NVec3::zeros(); 3],
        vec![1.0; 3],
        1.0,
    )
    .unwrap()
}

#[test]
#[should_panic(expected = "acceleration buffer must hold one entry per body")]
fn step_rejects_short_scratch() {
    let mut ens = three_in_a_row();
    let mut scratch = vec![NVec3::zeros(); 1];
    euler_cromer_step(&mut ens, 0.1, &mut scratch);
}

#[test]
#[should_panic(expected = "acceleration buffer must hold one entry per body")]
fn gravity_rejects_long_buffer() {
    let ens = three_in_a_row();
    let mut out = vec![NVec3::zeros(); 4];
    compute_accelerations(&ens, &mut out);
}

#[test]
fn step_kicks_every_body() {
    let mut ens = three_in_a_row();
    let mut scratch = vec![NVec3::zeros(); 3];
    euler_cromer_step(&mut ens, 0.1, &mut scratch);

    for (i, v) in ens.velocities().iter().enumerate() {
        assert!(v.norm() > 0.0, "body {i} was not accelerated");
    }
}

#[test]
fn simulation_step_matches_free_function() {
    let (ens, _) = circular_binary();
    let mut direct = ens.clone();
    let mut sim = Simulation::new(ens);

    let mut scratch = vec![NVec3::zeros(); 2];
    for _ in 0..10 {
        euler_cromer_step(&mut direct, 0.1, &mut scratch);
        sim.step(0.1);
    }
    assert_eq!(sim.ensemble(), &direct);
    assert_eq!(sim.last_accelerations(), &scratch[..]);
}

#[test]
fn circular_orbit_returns_after_one_period() {
    let (ens, period) = circular_binary();
    let start = ens.clone();
    let mut sim = Simulation::new(ens);

    sim.run(period, period / 10000.0, period / 10.0);
    let end = sim.ensemble();

    for i in 0..2 {
        let err = (end.positions()[i] - start.positions()[i]).norm();
        assert!(err < 1e-3 * 0.2, "body {i} off by {err}");
    }
}

#[test]
fn circular_binary_relative_state_within_one_percent() {
    let (ens, period) = circular_binary();
    let r0 = ens.positions()[0] - ens.positions()[1];
    let speed0 = (ens.velocities()[0] - ens.velocities()[1]).norm();

    let mut sim = Simulation::new(ens);
    let history = sim.run(period, period / 10000.0, period / 10.0);

    let last = history.len() - 1;
    let r1 = history.positions()[last][0] - history.positions()[last][1];
    let speed1 = (history.velocities()[last][0] - history.velocities()[last][1]).norm();

    assert!((r1 - r0).norm() < 0.01 * r0.norm(), "separation drifted: {:?}", r1);
    assert_relative_eq!(speed1, speed0, max_relative = 0.01);
}

#[test]
fn energy_and_momentum_stay_bounded() {
    let (ens, period) = circular_binary();
    let e0 = ens.total_energy();
    let l0 = ens.angular_momentum();
    let mut sim = Simulation::new(ens);

    sim.run(3.0 * period, period / 2000.0, period);

    let end = sim.ensemble();
    assert_relative_eq!(end.total_energy(), e0, max_relative = 1e-3);
    assert!((end.angular_momentum() - l0).norm() < 1e-9 * l0.norm().max(1.0));
    assert!(end.total_momentum().norm() < 1e-14);
}

// ==================================================================================
// Run loop tests
// ==================================================================================

#[test]
fn run_static_body_records_every_unit() {
    let ens = single_body();
    let start = ens.clone();
    let mut sim = Simulation::new(ens);

    let history = sim.run(10.0, 1.0, 1.0);

    assert_eq!(history.len(), 11);
    let expected: Vec<f64> = (0..=10).map(|k| k as f64).collect();
    assert_eq!(history.times(), &expected[..]);
    for k in 0..history.len() {
        assert_eq!(history.positions()[k], start.positions());
        assert_eq!(history.velocities()[k], start.velocities());
    }
}

#[test]
fn run_history_is_aligned() {
    let mut generator = LevelGenerator::with_seed(11);
    let level = generator.generate_level(&LevelId::Procedural(4)).unwrap();
    let initial = level.ensemble.clone();
    let mut sim = Simulation::new(level.ensemble);

    let history = sim.run(50.0, 0.05, 2.5);

    assert!(!history.is_empty());
    assert_eq!(history.positions().len(), history.len());
    assert_eq!(history.velocities().len(), history.len());
    assert_eq!(history.times()[0], 0.0);
    assert_eq!(history.positions()[0], initial.positions());
    assert_eq!(history.velocities()[0], initial.velocities());
    assert!(history.times().windows(2).all(|w| w[1] > w[0]));
    for snap in history.positions() {
        assert_eq!(snap.len(), initial.count());
    }

    // last snapshot is the final state
    let last = history.len() - 1;
    assert_eq!(history.positions()[last], sim.ensemble().positions());
}

#[test]
fn run_snapshot_times_round_up_to_step_grid() {
    // 0.3 does not divide 1.0; snapshots land on the first step at or after each multiple
    let mut sim = Simulation::new(single_body());
    let history = sim.run(3.0, 0.3, 1.0);

    let times = history.times();
    assert_eq!(times.len(), 4);
    assert_eq!(times[0], 0.0);
    assert_relative_eq!(times[1], 1.2, max_relative = 1e-12);
    assert_relative_eq!(times[2], 2.1, max_relative = 1e-12);
    assert_relative_eq!(times[3], 3.0, max_relative = 1e-12);
}

#[test]
fn run_output_interval_coarser_than_step() {
    let (ens, period) = circular_binary();
    let mut sim = Simulation::new(ens);
    let history = sim.run(period, period / 1000.0, period / 4.0);

    // t = 0, T/4, T/2, 3T/4 and T (or within a step of them)
    assert!(history.len() == 5 || history.len() == 4, "got {}", history.len());
    assert!(history.len() <= (period / (period / 4.0)).floor() as usize + 2);
}

#[test]
fn run_shorter_than_interval_keeps_only_initial_state() {
    let mut sim = Simulation::new(single_body());
    let history = sim.run(0.5, 0.1, 1.0);
    assert_eq!(history.len(), 1);
    assert_eq!(history.times(), &[0.0]);
}

#[test]
fn trajectory_follows_one_body() {
    let (ens, period) = circular_binary();
    let mut sim = Simulation::new(ens);
    let history = sim.run(period, period / 1000.0, period / 10.0);

    let path = history.trajectory(1);
    assert_eq!(path.len(), history.len());
    for (k, x) in path.iter().enumerate() {
        assert_eq!(*x, history.positions()[k][1]);
        // circular orbit keeps each body near radius 0.1
        assert!((x.norm() - 0.1).abs() < 1e-3);
    }

    let (p, v, t) = history.into_parts();
    assert_eq!(p.len(), v.len());
    assert_eq!(v.len(), t.len());
}

// ==================================================================================
// Scenario tests
// ==================================================================================

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

#[test]
fn bundled_scenarios_load() {
    for name in ["false_stability.yaml", "always_stable.yaml", "level_7.yaml", "binary.yaml"] {
        let cfg = ScenarioConfig::from_yaml_file(&scenario_path(name));
        assert!(cfg.is_ok(), "{name}: {:?}", cfg.err());
    }
}

#[test]
fn binary_scenario_is_recentered_and_runs() {
    let cfg = ScenarioConfig::from_yaml_file(&scenario_path("binary.yaml")).unwrap();
    let scenario = Scenario::build_scenario(cfg, &mut LevelGenerator::with_seed(0)).unwrap();
    assert_eq!(scenario.level.labels, vec!["Sun 1".to_string(), "Sun 2".to_string()]);
    assert!(scenario.level.ensemble.center_of_mass().norm() < 1e-15);

    let (mut sim, params) = scenario.into_simulation();
    let history = sim.run_with(&params);
    let expected = (params.time_frame / params.output_interval).floor() as usize + 1;
    assert_eq!(history.len(), expected);

    let last = *history.times().last().unwrap();
    assert!(
        (params.time_frame - last).abs() <= params.time_step,
        "last snapshot at {last}, run ends at {}",
        params.time_frame
    );
    assert!(sim.ensemble().is_finite());
}

#[test]
fn seeded_scenario_is_reproducible() {
    let cfg = ScenarioConfig::from_yaml_file(&scenario_path("level_7.yaml")).unwrap();
    let a = Scenario::build_scenario(cfg.clone(), &mut LevelGenerator::new()).unwrap();
    let b = Scenario::build_scenario(cfg, &mut LevelGenerator::new()).unwrap();
    assert_eq!(a.level.ensemble, b.level.ensemble);
    assert_eq!(a.level.ensemble.gravitational_constant(), G_AU_DAY_MSUN);
}

#[test]
fn false_stability_binary_starts_circular() {
    let level = LevelGenerator::with_seed(0)
        .generate_level(&LevelId::Named("false_stability".into()))
        .unwrap();
    let ens = &level.ensemble;
    let sep = (ens.positions()[0] - ens.positions()[1]).norm();
    assert_relative_eq!(sep, 0.2, max_relative = 1e-12);
    assert!(ens.min_separation() <= 0.1 + 1e-12);
    assert!(ens.total_energy() < 0.0);
}
