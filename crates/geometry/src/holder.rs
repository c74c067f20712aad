use nalgebra::UnitQuaternion;

use crate::Axis;

/// An ordered chain of axes carrying the sample or the detector.
///
/// Axes are listed from the outermost (mounted on the laboratory) to the
/// innermost, so the holder rotation is their product in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holder {
    axes: Vec<usize>,
}

impl Holder {
    pub(crate) fn new(axes: Vec<usize>) -> Self {
        Self { axes }
    }

    /// Returns the geometry axis indices carried by this holder.
    #[must_use]
    pub fn axes(&self) -> &[usize] {
        &self.axes
    }

    /// Returns the holder rotation for the given geometry axes.
    #[must_use]
    pub fn rotation(&self, axes: &[Axis]) -> UnitQuaternion<f64> {
        self.axes
            .iter()
            .filter_map(|&index| axes.get(index))
            .fold(UnitQuaternion::identity(), |acc, axis| acc * axis.quaternion())
    }
}
