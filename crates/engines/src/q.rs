//! The `q` engine: signed magnitude of the scattering vector.

use gonio_geometry::DiffractometerType;

use crate::{
    Context, Error, PseudoAxisEngine,
    engine::{axis_index, check_model, check_target, find_mode},
};

/// Pseudo axis `q = 2k · sin(θ)`, negative when the detector sits on the
/// other side of the beam.
///
/// The inverse moves the detector only.
#[derive(Debug, Clone)]
pub struct QEngine {
    kind: DiffractometerType,
}

impl QEngine {
    #[must_use]
    pub fn new(kind: DiffractometerType) -> Self {
        Self { kind }
    }
}

impl PseudoAxisEngine for QEngine {
    fn name(&self) -> &'static str {
        "q"
    }

    fn pseudo_axis_names(&self) -> &'static [&'static str] {
        &["q"]
    }

    fn modes(&self) -> &'static [&'static str] {
        &["q"]
    }

    fn mode(&self) -> &'static str {
        "q"
    }

    fn select_mode(&mut self, mode: &str) -> Result<(), Error> {
        find_mode(self.name(), self.modes(), mode).map(|_| ())
    }

    fn forward(&self, context: Context<'_>) -> Result<Vec<f64>, Error> {
        let geometry = context.geometry;
        check_model(self.kind, geometry)?;
        let ki = geometry.ki();
        let kf = geometry.kf(context.detector);

        let mut theta = ki.angle(&kf) / 2.0;
        if ki.cross(&kf).y > 0.0 {
            theta = -theta;
        }

        Ok(vec![2.0 * geometry.source().wave_number() * theta.sin()])
    }

    fn inverse(&self, context: Context<'_>, target: &[f64]) -> Result<Vec<Vec<f64>>, Error> {
        check_target(self, target)?;
        let geometry = context.geometry;
        check_model(self.kind, geometry)?;

        let ratio = target[0] / (2.0 * geometry.source().wave_number());
        if ratio.abs() > 1.0 {
            return Ok(Vec::new());
        }
        let tth = 2.0 * ratio.asin();

        let mut values = geometry.axis_values();
        match self.kind {
            DiffractometerType::E4CV | DiffractometerType::K4CV => {
                values[axis_index(geometry, "tth")?] = tth;
            }
            DiffractometerType::E6C | DiffractometerType::K6C => {
                values[axis_index(geometry, "gamma")?] = 0.0;
                values[axis_index(geometry, "delta")?] = tth;
            }
        }

        Ok(vec![values])
    }
}
