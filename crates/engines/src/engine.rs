use std::fmt;

use gonio_geometry::{DiffractometerType, Geometry};

use crate::{Context, Error, error::Unreachable};

/// A named pseudo-axis coordinate system over one diffractometer.
///
/// `forward` reads pseudo-axis values from the current geometry and `inverse`
/// enumerates every axis vector that reaches a target. Neither mutates the
/// context; committing a solution is the collection's job.
pub trait PseudoAxisEngine: fmt::Debug {
    /// Returns the engine name, e.g. `"hkl"`.
    fn name(&self) -> &'static str;

    /// Returns the pseudo-axis names, in target order.
    fn pseudo_axis_names(&self) -> &'static [&'static str];

    /// Returns the names of the available modes.
    fn modes(&self) -> &'static [&'static str];

    /// Returns the name of the current mode.
    fn mode(&self) -> &'static str;

    /// Switches to the named mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMode`] if the engine has no such mode.
    fn select_mode(&mut self, mode: &str) -> Result<(), Error>;

    /// Returns the names of the current mode's parameters.
    fn parameter_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns a mode parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownParameter`] if the mode has no such parameter.
    fn parameter(&self, name: &str) -> Result<f64, Error> {
        Err(Error::UnknownParameter {
            engine: self.name(),
            name: name.to_owned(),
        })
    }

    /// Sets a mode parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownParameter`] if the mode has no such parameter.
    fn set_parameter(&mut self, name: &str, _value: f64) -> Result<(), Error> {
        Err(Error::UnknownParameter {
            engine: self.name(),
            name: name.to_owned(),
        })
    }

    /// Returns `true` when the pseudo axes are angles compared modulo a turn.
    fn is_angular(&self) -> bool {
        false
    }

    /// Computes the pseudo-axis values of the current geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be evaluated, for example when
    /// the sample lattice is degenerate.
    fn forward(&self, context: Context<'_>) -> Result<Vec<f64>, Error>;

    /// Enumerates the axis vectors reaching `target` in the current mode.
    ///
    /// Unreachable targets yield an empty list. Candidates are full axis
    /// vectors in canonical order; they are not yet fitted into axis ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] for a wrong-length target and
    /// [`Error::GeometryUnreachable`] for a non-finite target or an unusable
    /// sample.
    fn inverse(&self, context: Context<'_>, target: &[f64]) -> Result<Vec<Vec<f64>>, Error>;
}

/// Checks a target against the engine's pseudo axes.
pub(crate) fn check_target(engine: &dyn PseudoAxisEngine, target: &[f64]) -> Result<(), Error> {
    let expected = engine.pseudo_axis_names().len();
    if target.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            found: target.len(),
        });
    }
    if target.iter().any(|value| !value.is_finite()) {
        return Err(Error::unreachable(Unreachable::NonFiniteTarget));
    }
    Ok(())
}

/// Looks up a mode by name.
pub(crate) fn find_mode(
    engine: &'static str,
    modes: &'static [&'static str],
    mode: &str,
) -> Result<usize, Error> {
    modes
        .iter()
        .position(|&candidate| candidate == mode)
        .ok_or_else(|| Error::UnknownMode {
            engine,
            mode: mode.to_owned(),
        })
}

/// Checks that an engine built for `kind` is handed a geometry of that model.
pub(crate) fn check_model(kind: DiffractometerType, geometry: &Geometry) -> Result<(), Error> {
    if geometry.kind() == kind {
        Ok(())
    } else {
        Err(Error::unreachable(Unreachable::ModelMismatch {
            expected: kind,
            found: geometry.kind(),
        }))
    }
}

/// Resolves an axis name to its position in the geometry.
pub(crate) fn axis_index(geometry: &Geometry, name: &str) -> Result<usize, Error> {
    geometry.axis_index(name).ok_or_else(|| Error::UnknownAxis {
        name: name.to_owned(),
    })
}
