use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{Lattice, error::LatticeError};

/// A single crystal: its lattice and its orientation on the sample holder.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    name: String,
    lattice: Lattice,
    orientation: [f64; 3],
}

impl Default for Sample {
    fn default() -> Self {
        Self::new("default", Lattice::default())
    }
}

impl Sample {
    /// Creates a sample with the identity orientation.
    #[must_use]
    pub fn new(name: impl Into<String>, lattice: Lattice) -> Self {
        Self {
            name: name.into(),
            lattice,
            orientation: [0.0; 3],
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn set_lattice(&mut self, lattice: Lattice) {
        self.lattice = lattice;
    }

    /// Returns the orientation angles `[ux, uy, uz]`.
    #[must_use]
    pub fn orientation(&self) -> [f64; 3] {
        self.orientation
    }

    /// Sets the orientation from three angles, `U = Rx(ux) · Ry(uy) · Rz(uz)`.
    pub fn set_orientation(&mut self, ux: f64, uy: f64, uz: f64) {
        self.orientation = [ux, uy, uz];
    }

    /// Returns the orientation matrix U.
    #[must_use]
    pub fn u_matrix(&self) -> Matrix3<f64> {
        let [ux, uy, uz] = self.orientation;
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), ux);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), uy);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), uz);
        (rx * ry * rz).into_inner()
    }

    /// Returns `UB = U · B`, mapping `(h, k, l)` to the sample-frame
    /// scattering vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the lattice does not describe a cell.
    pub fn ub(&self) -> Result<Matrix3<f64>, LatticeError> {
        Ok(self.u_matrix() * self.lattice.b_matrix()?)
    }
}
