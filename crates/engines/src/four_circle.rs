//! Numerical solves over the vertical eulerian four-circle.
//!
//! Modes without a closed form hand an [`EquationProblem`] over
//! [`Eulerian`] angles to Newton, started from a fixed grid of seeds, and
//! keep the distinct converged roots.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{UnitQuaternion, Vector3};
use tracing::trace;

use gonio_core::{EquationProblem, Model};
use gonio_geometry::{Detector, DiffractometerType, Geometry, GeometryError};
use gonio_solvers::equation::newton;

use crate::{Context, vertical::Eulerian};

/// Starting values for each free sample angle.
pub(crate) const SEEDS: [f64; 4] = [-FRAC_PI_2, 0.0, FRAC_PI_2, PI];

/// Converged roots closer than this (per angle) are the same solution.
pub(crate) const DUPLICATE_TOL: f64 = 1e-7;

/// Scattering vectors shorter than this are treated as null.
pub(crate) const NULL_Q: f64 = 1e-12;

/// Vertical eulerian four-circle kinematics.
pub(crate) struct FourCircle {
    geometry: Geometry,
    detector: Detector,
}

impl FourCircle {
    pub(crate) fn new(context: Context<'_>) -> Self {
        let mut geometry = Geometry::new(DiffractometerType::E4CV);
        geometry.set_source(*context.geometry.source());
        Self {
            geometry,
            detector: *context.detector,
        }
    }
}

/// Sample orientation and wave vectors for one set of angles.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scattering {
    pub sample_rotation: UnitQuaternion<f64>,
    pub ki: Vector3<f64>,
    pub kf: Vector3<f64>,
}

impl Scattering {
    pub(crate) fn q(&self) -> Vector3<f64> {
        self.kf - self.ki
    }
}

impl Model for FourCircle {
    type Input = Eulerian;
    type Output = Scattering;
    type Error = GeometryError;

    fn call(&self, input: &Eulerian) -> Result<Scattering, GeometryError> {
        let mut geometry = self.geometry.clone();
        geometry.set_axis_values(&input.to_array())?;
        Ok(Scattering {
            sample_rotation: geometry.sample_rotation(),
            ki: geometry.ki(),
            kf: geometry.kf(&self.detector),
        })
    }
}

/// Returns the detector angle scattering a vector of length `q`, or `None`
/// beyond the Ewald sphere.
pub(crate) fn two_theta(q: f64, wave_number: f64) -> Option<f64> {
    (q <= 2.0 * wave_number).then(|| 2.0 * (q / (2.0 * wave_number)).asin())
}

/// Solves a problem over all four eulerian angles.
///
/// Every combination of [`SEEDS`] for `omega`, `chi`, `phi` is tried with
/// `tth` at both signs of `two_theta`. Distinct converged roots come back
/// wrapped into `[-π, π)`, in seed order.
pub(crate) fn solve_from_seeds<P>(
    context: Context<'_>,
    problem: &P,
    two_theta: f64,
    config: &newton::Config,
) -> Vec<Eulerian>
where
    P: EquationProblem<4, Input = Eulerian, Output = Scattering>,
{
    let model = FourCircle::new(context);

    let mut solutions: Vec<Eulerian> = Vec::new();
    for tth in [two_theta, -two_theta] {
        for omega in SEEDS {
            for chi in SEEDS {
                for phi in SEEDS {
                    let seed = [omega, chi, phi, tth];
                    match newton::solve_unobserved(&model, problem, seed, config) {
                        Ok(solution) if solution.is_converged() => {
                            let found = solution.snapshot.input.wrapped();
                            if !solutions.iter().any(|s| s.is_close(&found, DUPLICATE_TOL)) {
                                solutions.push(found);
                            }
                        }
                        Ok(solution) => trace!(status = ?solution.status, "seed did not converge"),
                        Err(error) => trace!(%error, "seed failed"),
                    }
                }
            }
        }
    }

    solutions
}
