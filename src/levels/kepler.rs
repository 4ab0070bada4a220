//! Orbital elements to Cartesian state vectors

use nalgebra::{Rotation3, Vector3};

use crate::simulation::states::NVec3;

/// Position and velocity of a body at periapsis around a central mass.
///
/// - `a`: semi-major axis
/// - `e`: eccentricity, `0 <= e < 1`
/// - `inclination`: tilt about the x axis (radians)
/// - `arg_periapsis`: rotation about the z axis (radians)
///
/// The longitude of the ascending node is not modelled.
pub fn keplerian_state(
    g: f64,
    central_mass: f64,
    a: f64,
    e: f64,
    inclination: f64,
    arg_periapsis: f64,
) -> (NVec3, NVec3) {
    // At periapsis the true anomaly is zero
    let r = a * (1.0 - e);
    // vis-viva
    let v = (g * central_mass * (2.0 / r - 1.0 / a)).sqrt();

    // Orbital plane: position along x, velocity along y
    let r_orb = NVec3::new(r, 0.0, 0.0);
    let v_orb = NVec3::new(0.0, v, 0.0);

    // Apply the argument of periapsis first, then the inclination
    let rot_w = Rotation3::from_axis_angle(&Vector3::z_axis(), arg_periapsis);
    let rot_i = Rotation3::from_axis_angle(&Vector3::x_axis(), inclination);
    let rot = rot_i * rot_w;

    (rot * r_orb, rot * v_orb)
}
