use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::vertical::Eulerian;

/// Enumerates the bisecting solutions for the sample-frame vector `qs`.
///
/// `omega` is half of `tth` and the sample is turned so that `qs` lies along
/// the bisector of `ki` and `kf`. Branches come in the order (scattering side,
/// chi side): `(+, +)`, `(+, -)`, `(-, +)`, `(-, -)`.
pub(super) fn solve(qs: &Vector3<f64>, wave_number: f64) -> Vec<Eulerian> {
    let q = qs.norm();
    if q > 2.0 * wave_number {
        return Vec::new();
    }
    if q < 1e-12 {
        return vec![Eulerian::default()];
    }

    let theta = (q / (2.0 * wave_number)).asin();
    let unit = qs / q;
    let (x, y, z) = (unit.x, unit.y, unit.z);
    let rho = x.hypot(z);

    let mut solutions = Vec::with_capacity(4);
    for side in [1.0, -1.0] {
        for tilt in [1.0, -1.0] {
            let phi = if rho > 1e-12 {
                (tilt * x).atan2(tilt * z)
            } else if tilt > 0.0 {
                0.0
            } else {
                PI
            };
            let chi = (side * y).atan2(side * tilt * rho);

            solutions.push(
                Eulerian {
                    omega: side * theta,
                    chi,
                    phi,
                    tth: 2.0 * side * theta,
                }
                .wrapped(),
            );
        }
    }

    solutions
}
