use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::Matrix3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::LatticeError;

/// Direct lattice parameters: lengths in ångström, angles in radians.
///
/// Any values can be stored; [`Lattice::b_matrix`] reports whether they
/// describe a real cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lattice {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for Lattice {
    fn default() -> Self {
        Self::cubic(1.54)
    }
}

impl Lattice {
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    /// Returns a cubic lattice with edge `a`.
    #[must_use]
    pub fn cubic(a: f64) -> Self {
        Self::new(a, a, a, FRAC_PI_2, FRAC_PI_2, FRAC_PI_2)
    }

    /// Returns the parameters as `[a, b, c, alpha, beta, gamma]`.
    #[must_use]
    pub fn parameters(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.alpha, self.beta, self.gamma]
    }

    /// Replaces all six parameters, in the order of [`Lattice::parameters`].
    pub fn set_parameters(&mut self, [a, b, c, alpha, beta, gamma]: [f64; 6]) {
        *self = Self::new(a, b, c, alpha, beta, gamma);
    }

    /// Returns the cell volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters do not describe a cell.
    pub fn volume(&self) -> Result<f64, LatticeError> {
        let d = self.angular_determinant()?;
        Ok(self.a * self.b * self.c * d.sqrt())
    }

    /// Returns the B matrix mapping `(h, k, l)` to the reciprocal-space
    /// vector in the crystal frame, with the `2π` convention.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters do not describe a cell.
    pub fn b_matrix(&self) -> Result<Matrix3<f64>, LatticeError> {
        let d = self.volume()? / (self.a * self.b * self.c);

        let (s_alpha, c_alpha) = self.alpha.sin_cos();
        let (s_beta, c_beta) = self.beta.sin_cos();
        let (s_gamma, c_gamma) = self.gamma.sin_cos();

        let b11 = TAU / (self.b * s_alpha);
        let b22 = TAU / self.c;
        let tmp = b22 / s_alpha;

        #[rustfmt::skip]
        let b = Matrix3::new(
            TAU * s_alpha / (self.a * d), b11 / d * (c_alpha * c_beta - c_gamma), tmp / d * (c_gamma * c_alpha - c_beta),
            0.0,                          b11,                                    tmp / (s_beta * s_gamma) * (c_beta * c_gamma - c_alpha),
            0.0,                          0.0,                                    b22,
        );
        Ok(b)
    }

    /// Validates the parameters and returns
    /// `1 - cos²α - cos²β - cos²γ + 2 cosα cosβ cosγ`.
    fn angular_determinant(&self) -> Result<f64, LatticeError> {
        for (name, value) in [("a", self.a), ("b", self.b), ("c", self.c)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LatticeError::NonPositiveLength { name, value });
            }
        }
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            if !value.is_finite() || value <= 0.0 || value >= PI {
                return Err(LatticeError::InvalidAngle { name, value });
            }
        }

        let (ca, cb, cg) = (self.alpha.cos(), self.beta.cos(), self.gamma.cos());
        let d = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
        if d > 0.0 {
            Ok(d)
        } else {
            Err(LatticeError::Degenerate)
        }
    }
}
