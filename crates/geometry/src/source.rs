use std::f64::consts::TAU;

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// The monochromatic X-ray source.
///
/// The beam travels along the laboratory `+x` axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Source {
    wavelength: f64,
}

impl Default for Source {
    fn default() -> Self {
        Self { wavelength: 1.54 }
    }
}

impl Source {
    /// Creates a source with the given wavelength in ångström.
    ///
    /// # Errors
    ///
    /// Returns an error if the wavelength is not finite and positive.
    pub fn new(wavelength: f64) -> Result<Self, SourceError> {
        if !wavelength.is_finite() || wavelength <= 0.0 {
            return Err(SourceError::Wavelength(wavelength));
        }
        Ok(Self { wavelength })
    }

    #[must_use]
    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// Returns `k = 2π / λ`.
    #[must_use]
    pub fn wave_number(&self) -> f64 {
        TAU / self.wavelength
    }

    /// Returns the incident wave vector `ki`.
    #[must_use]
    pub fn ki(&self) -> Vector3<f64> {
        Vector3::new(self.wave_number(), 0.0, 0.0)
    }
}
