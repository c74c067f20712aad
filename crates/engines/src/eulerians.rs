//! The `eulerians` engine: kappa holders read as eulerian angles.

use gonio_geometry::Geometry;

use crate::{
    Context, Error, PseudoAxisEngine,
    engine::{axis_index, check_target, find_mode},
    kappa::{self, Branch},
};

const KAPPA_AXES: [&str; 3] = ["komega", "kappa", "kphi"];

/// Pseudo axes `omega`, `chi`, `phi` for kappa diffractometers.
///
/// The `solutions` parameter picks the kappa branch used by both directions:
/// `1` for [`Branch::Positive`], `0` for [`Branch::Negative`].
#[derive(Debug, Clone, Default)]
pub struct EuleriansEngine {
    branch: Branch,
}

impl EuleriansEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn branch(&self) -> Branch {
        self.branch
    }
}

/// Returns the geometry indices of the kappa sample axes.
fn kappa_indices(geometry: &Geometry) -> Result<[usize; 3], Error> {
    let mut indices = [0; 3];
    for (slot, name) in indices.iter_mut().zip(KAPPA_AXES) {
        *slot = axis_index(geometry, name)?;
    }
    Ok(indices)
}

impl PseudoAxisEngine for EuleriansEngine {
    fn name(&self) -> &'static str {
        "eulerians"
    }

    fn pseudo_axis_names(&self) -> &'static [&'static str] {
        &["omega", "chi", "phi"]
    }

    fn modes(&self) -> &'static [&'static str] {
        &["eulerians"]
    }

    fn mode(&self) -> &'static str {
        "eulerians"
    }

    fn select_mode(&mut self, mode: &str) -> Result<(), Error> {
        find_mode(self.name(), self.modes(), mode).map(|_| ())
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["solutions"]
    }

    fn parameter(&self, name: &str) -> Result<f64, Error> {
        match name {
            "solutions" => Ok(match self.branch {
                Branch::Positive => 1.0,
                Branch::Negative => 0.0,
            }),
            _ => Err(Error::UnknownParameter {
                engine: self.name(),
                name: name.to_owned(),
            }),
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), Error> {
        match name {
            "solutions" => {
                self.branch = if value >= 0.5 {
                    Branch::Positive
                } else {
                    Branch::Negative
                };
                Ok(())
            }
            _ => Err(Error::UnknownParameter {
                engine: self.name(),
                name: name.to_owned(),
            }),
        }
    }

    fn is_angular(&self) -> bool {
        true
    }

    fn forward(&self, context: Context<'_>) -> Result<Vec<f64>, Error> {
        let values = context.geometry.axis_values();
        let [komega, kappa, kphi] = kappa_indices(context.geometry)?;

        let eulerian = kappa::to_eulerian([values[komega], values[kappa], values[kphi]], self.branch);
        Ok(eulerian.to_vec())
    }

    fn inverse(&self, context: Context<'_>, target: &[f64]) -> Result<Vec<Vec<f64>>, Error> {
        check_target(self, target)?;
        let indices = kappa_indices(context.geometry)?;

        let Some(kappa) = kappa::from_eulerian([target[0], target[1], target[2]], self.branch)
        else {
            return Ok(Vec::new());
        };

        let mut values = context.geometry.axis_values();
        for (index, value) in indices.into_iter().zip(kappa) {
            values[index] = value;
        }
        Ok(vec![values])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gonio_geometry::{Detector, DiffractometerType, Sample, angle};

    #[test]
    fn inverse_keeps_the_other_axes() {
        let mut geometry = Geometry::new(DiffractometerType::K6C);
        geometry
            .set_axis_values(&[0.1, 0.0, 0.0, 0.0, 0.2, 0.3])
            .expect("six angles");
        let detector = Detector::zero_d();
        let sample = Sample::default();
        let context = Context::new(&geometry, &detector, &sample);
        let engine = EuleriansEngine::new();

        let target = [0.4, 0.8, -0.3];
        let solutions = engine.inverse(context, &target).expect("valid target");
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0][0], 0.1);
        assert_eq!(&solutions[0][4..], &[0.2, 0.3]);

        let mut moved = geometry.clone();
        moved.set_axis_values(&solutions[0]).expect("six angles");
        let reached = engine
            .forward(context.with_geometry(&moved))
            .expect("kappa geometry");
        for (r, t) in reached.iter().zip(target) {
            assert!(angle::distance(*r, t) < 1e-12);
        }
    }

    #[test]
    fn solutions_parameter_selects_the_branch() {
        let mut engine = EuleriansEngine::new();
        assert_eq!(engine.parameter("solutions"), Ok(1.0));

        engine.set_parameter("solutions", 0.0).expect("known parameter");
        assert_eq!(engine.branch(), Branch::Negative);
        assert!(matches!(
            engine.set_parameter("psi", 1.0),
            Err(Error::UnknownParameter { .. })
        ));
    }

    #[test]
    fn eulerian_geometries_are_rejected() {
        let geometry = Geometry::new(DiffractometerType::E4CV);
        let detector = Detector::zero_d();
        let sample = Sample::default();
        let result = EuleriansEngine::new().forward(Context::new(&geometry, &detector, &sample));
        assert_eq!(
            result,
            Err(Error::UnknownAxis {
                name: "komega".into()
            })
        );
    }

    #[test]
    fn unreachable_chi_yields_nothing() {
        let geometry = Geometry::new(DiffractometerType::K4CV);
        let detector = Detector::zero_d();
        let sample = Sample::default();
        let solutions = EuleriansEngine::new()
            .inverse(Context::new(&geometry, &detector, &sample), &[0.0, 2.5, 0.0])
            .expect("valid target");
        assert!(solutions.is_empty());
    }
}
