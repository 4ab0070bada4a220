//! Fixed-step time integrator for the N-body system
//!
//! Semi-implicit (Euler-Cromer) update: velocities are kicked with the fresh
//! acceleration, then positions drift with the *updated* velocities. First
//! order, one force evaluation per step, no step-size control.

use super::forces::compute_accelerations;
use super::states::{Ensemble, NVec3};

/// Advance `ens` by one step of size `dt`.
///
/// `accel` is scratch space of length `ens.count()`; it is recomputed here and
/// carries nothing over from the previous step. A buffer of any other length
/// panics rather than leaving some bodies un-kicked.
pub fn euler_cromer_step(ens: &mut Ensemble, dt: f64, accel: &mut [NVec3]) {
    // a_n from x_n, also checks accel.len() == ens.count()
    compute_accelerations(ens, accel);

    // Kick: v_n+1 = v_n + dt * a_n
    for (v, a) in ens.velocities.iter_mut().zip(accel.iter()) {
        *v += dt * *a;
    }

    // Drift: x_n+1 = x_n + dt * v_n+1 (new velocity, not the old one)
    for (x, v) in ens.positions.iter_mut().zip(ens.velocities.iter()) {
        *x += dt * *v;
    }
}
