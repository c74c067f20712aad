//! Modes tying the target reflection to a second one.

use std::convert::Infallible;

use nalgebra::Vector3;
use tracing::trace;

use gonio_core::EquationProblem;
use gonio_solvers::equation::newton;

use crate::{
    Context,
    four_circle::{self, NULL_Q, Scattering},
    psi::FixedAzimuth,
    vertical::Eulerian,
};

/// Drives `R · qs - Q` to zero while the second reflection `R · qs2` also
/// sits on the Ewald sphere: `|R · qs2 + ki|² = |ki|²`.
struct DoubleDiffraction {
    qs: Vector3<f64>,
    qs2: Vector3<f64>,
}

impl EquationProblem<4> for DoubleDiffraction {
    type Input = Eulerian;
    type Output = Scattering;
    type Error = Infallible;

    fn input(&self, &[omega, chi, phi, tth]: &[f64; 4]) -> Result<Eulerian, Self::Error> {
        Ok(Eulerian {
            omega,
            chi,
            phi,
            tth,
        })
    }

    fn residuals(&self, _input: &Eulerian, output: &Scattering) -> Result<[f64; 4], Self::Error> {
        let rotation = output.sample_rotation;
        let miss = rotation * self.qs - output.q();
        let second = rotation * self.qs2 + output.ki;
        Ok([
            miss.x,
            miss.y,
            miss.z,
            second.norm_squared() - output.ki.norm_squared(),
        ])
    }
}

/// Solves for the configurations reaching `qs` while `qs2` diffracts too.
pub(super) fn double_diffraction(
    context: Context<'_>,
    qs: &Vector3<f64>,
    qs2: &Vector3<f64>,
    config: &newton::Config,
) -> Vec<Eulerian> {
    let problem = DoubleDiffraction { qs: *qs, qs2: *qs2 };
    let solutions = solve(context, &problem, qs, config);
    trace!(eulerian = solutions.len(), "double diffraction");
    solutions
}

/// Solves for the configurations reaching `qs` with `reference` at azimuth
/// `psi` about `Q`.
pub(super) fn psi_constant(
    context: Context<'_>,
    qs: &Vector3<f64>,
    reference: &Vector3<f64>,
    psi: f64,
    config: &newton::Config,
) -> Vec<Eulerian> {
    let problem = FixedAzimuth {
        qs: *qs,
        reference: *reference,
        psi,
    };
    solve(context, &problem, qs, config)
}

/// A null `Q` leaves both second conditions without a solution.
fn solve<P>(
    context: Context<'_>,
    problem: &P,
    qs: &Vector3<f64>,
    config: &newton::Config,
) -> Vec<Eulerian>
where
    P: EquationProblem<4, Input = Eulerian, Output = Scattering>,
{
    let q = qs.norm();
    if q < NULL_Q {
        return Vec::new();
    }
    match four_circle::two_theta(q, context.geometry.source().wave_number()) {
        Some(two_theta) => four_circle::solve_from_seeds(context, problem, two_theta, config),
        None => Vec::new(),
    }
}
