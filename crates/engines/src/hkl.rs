//! The `hkl` engine: reciprocal-lattice coordinates of the scattering vector.
//!
//! Forward: `hkl = (R · UB)⁻¹ · Q`, with `R` the sample holder rotation and
//! `Q = kf - ki` in the laboratory frame.
//!
//! # Modes
//!
//! Four-circle names are listed; six-circle models append `_vertical` and keep
//! `mu = gamma = 0`.
//!
//! - `bissector`: `omega` is half of `tth`, solved in closed form
//! - `constant_omega`, `constant_chi`, `constant_phi`: the named eulerian
//!   angle keeps its current value and the other sample angles and `tth` are
//!   found numerically from a fixed grid of seeds
//! - `double_diffraction`: the second reflection `(h2, k2, l2)` diffracts
//!   at the same time
//! - `psi_constant`: the reflection `(h2, k2, l2)` sits at azimuth `psi`
//!   about `Q`, as read by the `psi` engine
//!
//! The last two solve all four eulerian angles numerically.

mod bisector;
mod constant;
mod coupled;

use nalgebra::Vector3;
use tracing::trace;

use gonio_geometry::DiffractometerType;
use gonio_solvers::equation::newton;

use crate::{
    Context, Error, PseudoAxisEngine,
    engine::{check_model, check_target, find_mode},
    error::Unreachable,
    vertical::{self, Eulerian},
};

const FOUR_CIRCLE_MODES: &[&str] = &[
    "bissector",
    "constant_omega",
    "constant_chi",
    "constant_phi",
    "double_diffraction",
    "psi_constant",
];

const SIX_CIRCLE_MODES: &[&str] = &[
    "bissector_vertical",
    "constant_omega_vertical",
    "constant_chi_vertical",
    "constant_phi_vertical",
    "double_diffraction_vertical",
    "psi_constant_vertical",
];

const DOUBLE_DIFFRACTION_PARAMETERS: &[&str] = &["h2", "k2", "l2"];

const PSI_CONSTANT_PARAMETERS: &[&str] = &["h2", "k2", "l2", "psi"];

/// The eulerian angle held fixed by a constant mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fixed {
    Omega,
    Chi,
    Phi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Bissector,
    Constant(Fixed),
    DoubleDiffraction,
    PsiConstant,
}

impl Mode {
    const ALL: [Self; 6] = [
        Self::Bissector,
        Self::Constant(Fixed::Omega),
        Self::Constant(Fixed::Chi),
        Self::Constant(Fixed::Phi),
        Self::DoubleDiffraction,
        Self::PsiConstant,
    ];
}

/// Pseudo axes `h`, `k`, `l`.
///
/// Each mode keeps its own parameters: `double_diffraction` has `h2`, `k2`,
/// `l2` (default `(1, 1, 1)`) and `psi_constant` has `h2`, `k2`, `l2`
/// (default `(1, 1, 1)`) and `psi` (default `0`).
#[derive(Debug, Clone)]
pub struct HklEngine {
    kind: DiffractometerType,
    mode: usize,
    second_reflection: [f64; 3],
    psi_constant: [f64; 4],
    newton: newton::Config,
}

impl HklEngine {
    #[must_use]
    pub fn new(kind: DiffractometerType) -> Self {
        Self {
            kind,
            mode: 0,
            second_reflection: [1.0, 1.0, 1.0],
            psi_constant: [1.0, 1.0, 1.0, 0.0],
            newton: newton::Config::default(),
        }
    }

    /// Replaces the solver configuration used by the numerical modes.
    #[must_use]
    pub fn with_solver_config(mut self, config: newton::Config) -> Self {
        self.newton = config;
        self
    }

    fn current_mode(&self) -> Mode {
        Mode::ALL[self.mode]
    }

    fn parameter_index(&self, name: &str) -> Result<usize, Error> {
        self.parameter_names()
            .iter()
            .position(|&candidate| candidate == name)
            .ok_or_else(|| Error::UnknownParameter {
                engine: self.name(),
                name: name.to_owned(),
            })
    }

    fn parameter_values(&self) -> &[f64] {
        match self.current_mode() {
            Mode::DoubleDiffraction => &self.second_reflection,
            Mode::PsiConstant => &self.psi_constant,
            Mode::Bissector | Mode::Constant(_) => &[],
        }
    }
}

impl PseudoAxisEngine for HklEngine {
    fn name(&self) -> &'static str {
        "hkl"
    }

    fn pseudo_axis_names(&self) -> &'static [&'static str] {
        &["h", "k", "l"]
    }

    fn modes(&self) -> &'static [&'static str] {
        match self.kind {
            DiffractometerType::E4CV | DiffractometerType::K4CV => FOUR_CIRCLE_MODES,
            DiffractometerType::E6C | DiffractometerType::K6C => SIX_CIRCLE_MODES,
        }
    }

    fn mode(&self) -> &'static str {
        self.modes()[self.mode]
    }

    fn select_mode(&mut self, mode: &str) -> Result<(), Error> {
        self.mode = find_mode(self.name(), self.modes(), mode)?;
        Ok(())
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        match self.current_mode() {
            Mode::DoubleDiffraction => DOUBLE_DIFFRACTION_PARAMETERS,
            Mode::PsiConstant => PSI_CONSTANT_PARAMETERS,
            Mode::Bissector | Mode::Constant(_) => &[],
        }
    }

    fn parameter(&self, name: &str) -> Result<f64, Error> {
        let index = self.parameter_index(name)?;
        self.parameter_values()
            .get(index)
            .copied()
            .ok_or_else(|| Error::UnknownParameter {
                engine: self.name(),
                name: name.to_owned(),
            })
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), Error> {
        let index = self.parameter_index(name)?;
        let slot = match self.current_mode() {
            Mode::DoubleDiffraction => self.second_reflection.get_mut(index),
            Mode::PsiConstant => self.psi_constant.get_mut(index),
            Mode::Bissector | Mode::Constant(_) => None,
        };
        match slot {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::UnknownParameter {
                engine: self.name(),
                name: name.to_owned(),
            }),
        }
    }

    fn forward(&self, context: Context<'_>) -> Result<Vec<f64>, Error> {
        check_model(self.kind, context.geometry)?;
        let ub = context.sample.ub()?;
        let rotation = context.geometry.sample_rotation().to_rotation_matrix();
        let inverse = (rotation.matrix() * ub)
            .try_inverse()
            .ok_or_else(|| Error::unreachable(Unreachable::SingularOrientation))?;

        let hkl = inverse * context.geometry.q(context.detector);
        Ok(vec![hkl.x, hkl.y, hkl.z])
    }

    fn inverse(&self, context: Context<'_>, target: &[f64]) -> Result<Vec<Vec<f64>>, Error> {
        check_target(self, target)?;
        check_model(self.kind, context.geometry)?;

        let ub = context.sample.ub()?;
        let qs = ub * Vector3::new(target[0], target[1], target[2]);

        let solutions: Vec<Eulerian> = match self.current_mode() {
            Mode::Bissector => bisector::solve(&qs, context.geometry.source().wave_number()),
            Mode::Constant(fixed) => {
                let current = vertical::project(context.geometry)?;
                constant::solve(context, current, &qs, fixed, &self.newton)
            }
            Mode::DoubleDiffraction => {
                let qs2 = ub * Vector3::from(self.second_reflection);
                coupled::double_diffraction(context, &qs, &qs2, &self.newton)
            }
            Mode::PsiConstant => {
                let [h2, k2, l2, psi] = self.psi_constant;
                let reference = ub * Vector3::new(h2, k2, l2);
                coupled::psi_constant(context, &qs, &reference, psi, &self.newton)
            }
        };
        trace!(mode = self.mode(), eulerian = solutions.len(), "hkl inverse");

        vertical::embed(context.geometry, &solutions)
    }
}
