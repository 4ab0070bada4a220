//! Gravitational acceleration for the n-body engine
//!
//! Direct Newtonian sum over every ordered pair of distinct bodies. This is
//! O(N^2) per call and meant for the small systems the level generator builds.

use crate::simulation::states::{Ensemble, NVec3};

/// Compute the acceleration of every body in `ens` into `out`.
///
/// `out[j] = G * sum_{i != j} m_i * (x_i - x_j) / |x_i - x_j|^3`
///
/// `out` must have exactly one entry per body; any other length panics.
/// The buffer is overwritten from scratch on every call. The diagonal
/// (`i == j`) is skipped outright, so a body never pulls on itself and a
/// single-body ensemble always gets a zero acceleration. Two distinct bodies
/// at the same position are not guarded and produce non-finite values.
pub fn compute_accelerations(ens: &Ensemble, out: &mut [NVec3]) {
    assert_eq!(
        out.len(),
        ens.count(),
        "acceleration buffer must hold one entry per body"
    );

    let positions = ens.positions();
    let masses = ens.masses();
    let g = ens.gravitational_constant();

    for (j, a) in out.iter_mut().enumerate() {
        // xj: position of the body feeling the pull
        let xj = positions[j];
        let mut acc = NVec3::zeros();

        for (i, (xi, &mi)) in positions.iter().zip(masses.iter()).enumerate() {
            if i == j {
                continue;
            }

            // r points from j towards i, so j is pulled along +r
            let r = xi - xj;
            let dist = r.norm();

            // 1 / |r|^3
            let inv_r3 = (dist * dist * dist).recip();

            acc += mi * inv_r3 * r;
        }

        *a = g * acc;
    }
}

/// Convenience wrapper that allocates a fresh buffer
pub fn accelerations(ens: &Ensemble) -> Vec<NVec3> {
    let mut out = vec![NVec3::zeros(); ens.count()];
    compute_accelerations(ens, &mut out);
    out
}
