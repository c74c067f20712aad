//! The `psi` engine: azimuth of a reference reflection about `Q`.
//!
//! The azimuth is the oriented angle, about `Q`, from the scattering-plane
//! normal `n = (kf × ki) × Q` to the reference `R · UB · (h1, k1, l1)`
//! projected onto the plane normal to `Q`.
//!
//! The inverse keeps the current `hkl` and turns the crystal about `Q` until
//! the reference sits at the target azimuth.

use std::convert::Infallible;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use tracing::trace;

use gonio_core::EquationProblem;
use gonio_geometry::{DiffractometerType, angle};
use gonio_solvers::equation::newton;

use crate::{
    Context, Error, PseudoAxisEngine,
    engine::{check_model, check_target, find_mode},
    error::Unreachable,
    four_circle::{self, NULL_Q, Scattering},
    vertical::{self, Eulerian},
};

/// Reference projections shorter than this leave the azimuth undefined.
const NULL_REFERENCE: f64 = 1e-10;

const PARAMETERS: &[&str] = &["h1", "k1", "l1"];

/// Returns the azimuth of the sample-frame vector `reference` about `Q`.
///
/// Returns `None` when `Q` is null or `reference` is parallel to it.
pub(crate) fn azimuth(
    ki: &Vector3<f64>,
    kf: &Vector3<f64>,
    sample_rotation: &UnitQuaternion<f64>,
    reference: &Vector3<f64>,
) -> Option<f64> {
    let q = kf - ki;
    let q_norm = q.norm();
    if q_norm < NULL_Q {
        return None;
    }
    let q_hat = q / q_norm;

    let n = kf.cross(ki).cross(&q_hat);
    let lab = sample_rotation * reference;
    let projected = lab - q_hat * lab.dot(&q_hat);
    if projected.norm() < NULL_REFERENCE {
        return None;
    }

    Some(n.cross(&projected).dot(&q_hat).atan2(n.dot(&projected)))
}

/// Drives `R · qs - Q` to zero while the reference sits at `psi`.
///
/// The solver variables are `omega`, `chi`, `phi`, and `tth`.
pub(crate) struct FixedAzimuth {
    pub qs: Vector3<f64>,
    pub reference: Vector3<f64>,
    pub psi: f64,
}

impl EquationProblem<4> for FixedAzimuth {
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
        let miss = output.sample_rotation * self.qs - output.q();
        let turn = azimuth(&output.ki, &output.kf, &output.sample_rotation, &self.reference)
            .map_or(self.psi, |current| angle::wrap(self.psi - current));
        Ok([miss.x, miss.y, miss.z, turn])
    }
}

/// Pseudo axis `psi`, with the reference reflection as parameters
/// `h1`, `k1`, `l1` (default `(1, 0, 0)`).
#[derive(Debug, Clone)]
pub struct PsiEngine {
    kind: DiffractometerType,
    reference: [f64; 3],
    newton: newton::Config,
}

impl PsiEngine {
    #[must_use]
    pub fn new(kind: DiffractometerType) -> Self {
        Self {
            kind,
            reference: [1.0, 0.0, 0.0],
            newton: newton::Config::default(),
        }
    }

    /// Replaces the solver configuration used by the inverse.
    #[must_use]
    pub fn with_solver_config(mut self, config: newton::Config) -> Self {
        self.newton = config;
        self
    }

    fn reference_in_sample(&self, ub: &Matrix3<f64>) -> Vector3<f64> {
        ub * Vector3::from(self.reference)
    }

    fn unknown_parameter(&self, name: &str) -> Error {
        Error::UnknownParameter {
            engine: self.name(),
            name: name.to_owned(),
        }
    }
}

impl PseudoAxisEngine for PsiEngine {
    fn name(&self) -> &'static str {
        "psi"
    }

    fn pseudo_axis_names(&self) -> &'static [&'static str] {
        &["psi"]
    }

    fn modes(&self) -> &'static [&'static str] {
        match self.kind {
            DiffractometerType::E4CV | DiffractometerType::K4CV => &["psi"],
            DiffractometerType::E6C | DiffractometerType::K6C => &["psi_vertical"],
        }
    }

    fn mode(&self) -> &'static str {
        self.modes()[0]
    }

    fn select_mode(&mut self, mode: &str) -> Result<(), Error> {
        find_mode(self.name(), self.modes(), mode).map(|_| ())
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        PARAMETERS
    }

    fn parameter(&self, name: &str) -> Result<f64, Error> {
        PARAMETERS
            .iter()
            .position(|&candidate| candidate == name)
            .and_then(|index| self.reference.get(index).copied())
            .ok_or_else(|| self.unknown_parameter(name))
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), Error> {
        let slot = PARAMETERS
            .iter()
            .position(|&candidate| candidate == name)
            .and_then(|index| self.reference.get_mut(index));
        match slot {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(self.unknown_parameter(name)),
        }
    }

    fn is_angular(&self) -> bool {
        true
    }

    fn forward(&self, context: Context<'_>) -> Result<Vec<f64>, Error> {
        let geometry = context.geometry;
        check_model(self.kind, geometry)?;
        let ub = context.sample.ub()?;

        let psi = azimuth(
            &geometry.ki(),
            &geometry.kf(context.detector),
            &geometry.sample_rotation(),
            &self.reference_in_sample(&ub),
        )
        .ok_or_else(|| Error::unreachable(Unreachable::UndefinedAzimuth))?;
        Ok(vec![psi])
    }

    fn inverse(&self, context: Context<'_>, target: &[f64]) -> Result<Vec<Vec<f64>>, Error> {
        check_target(self, target)?;
        let geometry = context.geometry;
        check_model(self.kind, geometry)?;
        let ub = context.sample.ub()?;

        let q = geometry.q(context.detector);
        if q.norm() < NULL_Q {
            return Err(Error::unreachable(Unreachable::UndefinedAzimuth));
        }
        let problem = FixedAzimuth {
            qs: geometry.sample_rotation().inverse() * q,
            reference: self.reference_in_sample(&ub),
            psi: target[0],
        };

        let wave_number = geometry.source().wave_number();
        let solutions = match four_circle::two_theta(problem.qs.norm(), wave_number) {
            Some(two_theta) => {
                four_circle::solve_from_seeds(context, &problem, two_theta, &self.newton)
            }
            None => Vec::new(),
        };
        trace!(psi = target[0], eulerian = solutions.len(), "psi inverse");

        vertical::embed(geometry, &solutions)
    }
}
