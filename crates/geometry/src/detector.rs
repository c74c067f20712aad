use nalgebra::{UnitQuaternion, Vector3};

/// The kinds of detector a geometry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorKind {
    /// A point detector on the detector holder axis.
    #[default]
    ZeroD,
}

/// The detector mounted on the detector holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Detector {
    kind: DetectorKind,
}

impl Detector {
    #[must_use]
    pub fn new(kind: DetectorKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub fn zero_d() -> Self {
        Self::new(DetectorKind::ZeroD)
    }

    #[must_use]
    pub fn kind(&self) -> DetectorKind {
        self.kind
    }

    /// Returns the scattered wave vector seen by the detector when the
    /// detector holder applies `rotation`.
    #[must_use]
    pub fn kf(&self, ki: &Vector3<f64>, rotation: &UnitQuaternion<f64>) -> Vector3<f64> {
        match self.kind {
            DetectorKind::ZeroD => rotation * ki,
        }
    }
}
