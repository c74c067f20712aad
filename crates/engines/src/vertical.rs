//! The vertical four-circle view every model can be reduced to.
//!
//! The hkl modes solve for eulerian `omega`, `chi`, `phi` and the detector
//! angle `tth` in the vertical scattering plane, then write the result onto
//! the real axes of the model.

use gonio_geometry::{DiffractometerType, Geometry, angle};

use crate::{
    Error,
    engine::axis_index,
    kappa::{self, Branch},
};

/// Sample and detector angles of a vertical eulerian four-circle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Eulerian {
    pub omega: f64,
    pub chi: f64,
    pub phi: f64,
    pub tth: f64,
}

impl Eulerian {
    pub(crate) fn wrapped(self) -> Self {
        Self {
            omega: angle::wrap(self.omega),
            chi: angle::wrap(self.chi),
            phi: angle::wrap(self.phi),
            tth: angle::wrap(self.tth),
        }
    }

    pub(crate) fn to_array(self) -> [f64; 4] {
        [self.omega, self.chi, self.phi, self.tth]
    }

    /// Returns `true` if every angle is within `tol` of `other`, modulo a turn.
    pub(crate) fn is_close(&self, other: &Self, tol: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array())
            .all(|(a, b)| angle::distance(*a, b) < tol)
    }
}

/// Axes carrying `omega`, `chi`, `phi` (or their kappa counterparts) and
/// the vertical detector angle.
fn vertical_axes(kind: DiffractometerType) -> [&'static str; 4] {
    match kind {
        DiffractometerType::E4CV => ["omega", "chi", "phi", "tth"],
        DiffractometerType::K4CV => ["komega", "kappa", "kphi", "tth"],
        DiffractometerType::E6C => ["omega", "chi", "phi", "delta"],
        DiffractometerType::K6C => ["komega", "kappa", "kphi", "delta"],
    }
}

/// Axes held at zero by the vertical view.
fn horizontal_axes(kind: DiffractometerType) -> &'static [&'static str] {
    match kind {
        DiffractometerType::E4CV | DiffractometerType::K4CV => &[],
        DiffractometerType::E6C | DiffractometerType::K6C => &["mu", "gamma"],
    }
}

fn vertical_indices(geometry: &Geometry) -> Result<[usize; 4], Error> {
    let mut indices = [0; 4];
    for (slot, name) in indices.iter_mut().zip(vertical_axes(geometry.kind())) {
        *slot = axis_index(geometry, name)?;
    }
    Ok(indices)
}

/// Reads the current axes of `geometry` as vertical eulerian angles.
///
/// Six-circle `mu` and `gamma` are ignored, and kappa holders are read
/// through the positive branch.
///
/// # Errors
///
/// Returns [`Error::UnknownAxis`] if the geometry lacks a vertical axis.
pub(crate) fn project(geometry: &Geometry) -> Result<Eulerian, Error> {
    let values = geometry.axis_values();
    let [a, b, c, detector] = vertical_indices(geometry)?.map(|index| values[index]);

    let [omega, chi, phi] = if geometry.kind().is_kappa() {
        kappa::to_eulerian([a, b, c], Branch::Positive)
    } else {
        [a, b, c]
    };
    Ok(Eulerian {
        omega,
        chi,
        phi,
        tth: detector,
    })
}

/// Writes eulerian solutions onto the axes of `geometry`.
///
/// Kappa models expand each solution into both kappa branches and drop the
/// ones whose `chi` is out of reach. Six-circle models get `mu` and `gamma`
/// at zero.
///
/// # Errors
///
/// Returns [`Error::UnknownAxis`] if the geometry lacks a vertical axis.
pub(crate) fn embed(geometry: &Geometry, solutions: &[Eulerian]) -> Result<Vec<Vec<f64>>, Error> {
    let kind = geometry.kind();
    let [a, b, c, detector] = vertical_indices(geometry)?;

    let mut base = geometry.axis_values();
    for name in horizontal_axes(kind) {
        base[axis_index(geometry, name)?] = 0.0;
    }
    let place = |sample: [f64; 3], tth: f64| {
        let mut values = base.clone();
        values[a] = sample[0];
        values[b] = sample[1];
        values[c] = sample[2];
        values[detector] = tth;
        values
    };

    let mut embedded = Vec::with_capacity(solutions.len() * 2);
    for e in solutions {
        let eulerian = [e.omega, e.chi, e.phi];
        if kind.is_kappa() {
            embedded.extend(
                Branch::ALL
                    .into_iter()
                    .filter_map(|branch| kappa::from_eulerian(eulerian, branch))
                    .map(|sample| place(sample, e.tth)),
            );
        } else {
            embedded.push(place(eulerian, e.tth));
        }
    }

    Ok(embedded)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn embedding_then_projecting_recovers_the_angles() {
        let e = Eulerian {
            omega: 0.3,
            chi: 0.5,
            phi: -1.2,
            tth: 0.6,
        };

        for kind in DiffractometerType::ALL {
            let mut geometry = Geometry::new(kind);
            let embedded = embed(&geometry, &[e]).expect("vertical axes");
            geometry
                .set_axis_values(&embedded[0])
                .expect("embedded vector has the model's length");

            let back = project(&geometry).expect("vertical axes");
            assert!(back.is_close(&e, 1e-12), "{kind}: {back:?}");
        }
    }

    #[test]
    fn kappa_models_get_both_branches_when_reachable() {
        let reachable = Eulerian {
            chi: 0.5,
            ..Eulerian::default()
        };
        let too_far = Eulerian {
            chi: 2.5,
            ..Eulerian::default()
        };

        let embedded = |kind, e| {
            embed(&Geometry::new(kind), &[e])
                .expect("vertical axes")
                .len()
        };
        assert_eq!(embedded(DiffractometerType::K4CV, reachable), 2);
        assert_eq!(embedded(DiffractometerType::K6C, too_far), 0);
        assert_eq!(embedded(DiffractometerType::E4CV, too_far), 1);
    }

    #[test]
    fn six_circle_embedding_is_vertical() {
        let e = Eulerian {
            omega: 0.1,
            chi: 0.2,
            phi: 0.3,
            tth: 0.4,
        };
        let mut geometry = Geometry::new(DiffractometerType::E6C);
        geometry
            .set_axis_values(&[0.5, 0.0, 0.0, 0.0, 0.6, 0.0])
            .expect("six angles");
        let embedded = embed(&geometry, &[e]).expect("vertical axes");
        assert_eq!(embedded, vec![vec![0.0, 0.1, 0.2, 0.3, 0.0, 0.4]]);

        let wrapped = Eulerian { omega: 7.0, ..e }.wrapped();
        assert_relative_eq!(wrapped.omega, 7.0 - std::f64::consts::TAU, epsilon = 1e-15);
    }
}
