//! Conversions between kappa and eulerian sample angles.
//!
//! A kappa holder (`komega`, `kappa`, `kphi`) reproduces the rotation of an
//! eulerian holder (`omega`, `chi`, `phi`) with two mirror-image branches.
//! Only `|chi| <= 2α` is reachable, where α is [`KAPPA_ALPHA`].

use std::f64::consts::FRAC_PI_2;

use gonio_geometry::KAPPA_ALPHA;

/// Selects one of the two kappa configurations for an eulerian orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Branch {
    /// `kappa` has the sign of `chi`.
    #[default]
    Positive,
    /// `kappa` has the opposite sign of `chi`.
    Negative,
}

impl Branch {
    pub const ALL: [Self; 2] = [Self::Positive, Self::Negative];
}

/// Converts `[komega, kappa, kphi]` to `[omega, chi, phi]`.
#[must_use]
pub fn to_eulerian([komega, kappa, kphi]: [f64; 3], branch: Branch) -> [f64; 3] {
    let p = ((kappa / 2.0).tan() * KAPPA_ALPHA.cos()).atan();
    let chi = 2.0 * ((kappa / 2.0).sin() * KAPPA_ALPHA.sin()).asin();

    match branch {
        Branch::Positive => [komega + p - FRAC_PI_2, chi, kphi + p + FRAC_PI_2],
        Branch::Negative => [komega + p + FRAC_PI_2, -chi, kphi + p - FRAC_PI_2],
    }
}

/// Converts `[omega, chi, phi]` to `[komega, kappa, kphi]`.
///
/// Returns `None` when `|chi|` exceeds `2α`.
#[must_use]
pub fn from_eulerian([omega, chi, phi]: [f64; 3], branch: Branch) -> Option<[f64; 3]> {
    let ratio = (chi / 2.0).sin() / KAPPA_ALPHA.sin();
    if !ratio.is_finite() || ratio.abs() > 1.0 + f64::EPSILON {
        return None;
    }

    let p = ((chi / 2.0).tan() / KAPPA_ALPHA.tan()).clamp(-1.0, 1.0).asin();
    let kappa = 2.0 * ratio.clamp(-1.0, 1.0).asin();

    Some(match branch {
        Branch::Positive => [omega - p + FRAC_PI_2, kappa, phi - p - FRAC_PI_2],
        Branch::Negative => [omega + p - FRAC_PI_2, -kappa, phi + p + FRAC_PI_2],
    })
}
