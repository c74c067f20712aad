use std::{fmt, str::FromStr};

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Axis, Holder, error::UnknownDiffractometer};

/// Angle between the kappa axis and the horizontal plane, in radians.
pub const KAPPA_ALPHA: f64 = 50.031 * std::f64::consts::PI / 180.0;

/// The supported kinematic models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiffractometerType {
    /// Eulerian four-circle, vertical scattering plane.
    E4CV,
    /// Kappa four-circle, vertical scattering plane.
    K4CV,
    /// Eulerian six-circle.
    E6C,
    /// Kappa six-circle.
    K6C,
}

impl DiffractometerType {
    pub const ALL: [Self; 4] = [Self::E4CV, Self::K4CV, Self::E6C, Self::K6C];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::E4CV => "E4CV",
            Self::K4CV => "K4CV",
            Self::E6C => "E6C",
            Self::K6C => "K6C",
        }
    }

    /// Returns `true` for the kappa models.
    #[must_use]
    pub fn is_kappa(self) -> bool {
        matches!(self, Self::K4CV | Self::K6C)
    }

    /// Returns the axis names in canonical order.
    #[must_use]
    pub fn axis_names(self) -> &'static [&'static str] {
        match self {
            Self::E4CV => &["omega", "chi", "phi", "tth"],
            Self::K4CV => &["komega", "kappa", "kphi", "tth"],
            Self::E6C => &["mu", "omega", "chi", "phi", "gamma", "delta"],
            Self::K6C => &["mu", "komega", "kappa", "kphi", "gamma", "delta"],
        }
    }

    /// Builds the axes and the sample and detector holders of this model.
    pub(crate) fn build(self) -> (Vec<Axis>, Holder, Holder) {
        let minus_y = Vector3::new(0.0, -1.0, 0.0);
        let x = Vector3::x();
        let z = Vector3::z();
        let kappa = Vector3::new(0.0, -KAPPA_ALPHA.cos(), -KAPPA_ALPHA.sin());

        let directions: &[Vector3<f64>] = match self {
            Self::E4CV => &[minus_y, x, minus_y, minus_y],
            Self::K4CV => &[minus_y, kappa, minus_y, minus_y],
            Self::E6C => &[z, minus_y, x, minus_y, z, minus_y],
            Self::K6C => &[z, minus_y, kappa, minus_y, z, minus_y],
        };

        let axes = self
            .axis_names()
            .iter()
            .zip(directions)
            .map(|(&name, &direction)| Axis::rotation(name, direction))
            .collect::<Vec<_>>();

        let sample_axes = match self {
            Self::E4CV | Self::K4CV => 3,
            Self::E6C | Self::K6C => 4,
        };
        let sample = Holder::new((0..sample_axes).collect());
        let detector = Holder::new((sample_axes..axes.len()).collect());

        (axes, sample, detector)
    }
}

impl fmt::Display for DiffractometerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiffractometerType {
    type Err = UnknownDiffractometer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDiffractometer { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("K6C".parse::<DiffractometerType>(), Ok(DiffractometerType::K6C));
        assert_eq!("e4cv".parse::<DiffractometerType>(), Ok(DiffractometerType::E4CV));
        assert_eq!(
            "ZAXIS".parse::<DiffractometerType>(),
            Err(UnknownDiffractometer {
                name: "ZAXIS".into()
            })
        );
    }

    #[test]
    fn display_matches_name() {
        for kind in DiffractometerType::ALL {
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn holders_split_the_axes() {
        for kind in DiffractometerType::ALL {
            let (axes, sample, detector) = kind.build();
            assert_eq!(axes.len(), kind.axis_names().len());
            assert_eq!(sample.axes().len() + detector.axes().len(), axes.len());
            assert_eq!(sample.axes()[0], 0);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_variant_name() {
        let json = serde_json::to_string(&DiffractometerType::K4CV).expect("serializes");
        assert_eq!(json, "\"K4CV\"");
    }
}
