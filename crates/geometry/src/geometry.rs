use nalgebra::{UnitQuaternion, Vector3};

use crate::{
    Axis, Detector, DiffractometerType, Holder, Range, Source, angle, error::GeometryError,
};

/// The axes of one diffractometer, their holders, and the source.
///
/// The axis order is fixed by the [`DiffractometerType`] and is the order of
/// every axis vector read from or written to the geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    kind: DiffractometerType,
    axes: Vec<Axis>,
    sample: Holder,
    detector: Holder,
    source: Source,
}

impl Geometry {
    /// Creates a geometry with all axes at zero and the default source.
    #[must_use]
    pub fn new(kind: DiffractometerType) -> Self {
        let (axes, sample, detector) = kind.build();
        Self {
            kind,
            axes,
            sample,
            detector,
            source: Source::default(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> DiffractometerType {
        self.kind
    }

    #[must_use]
    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn set_source(&mut self, source: Source) {
        self.source = source;
    }

    #[must_use]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Returns the number of axes.
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    #[must_use]
    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.name() == name)
    }

    #[must_use]
    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|axis| axis.name() == name)
    }

    /// Returns the axis names in canonical order.
    #[must_use]
    pub fn axis_names(&self) -> Vec<&'static str> {
        self.axes.iter().map(Axis::name).collect()
    }

    /// Returns the current axis values in canonical order.
    #[must_use]
    pub fn axis_values(&self) -> Vec<f64> {
        self.axes.iter().map(Axis::value).collect()
    }

    /// Sets every axis value, in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] if `values` does not
    /// have one entry per axis. The geometry is left unchanged.
    pub fn set_axis_values(&mut self, values: &[f64]) -> Result<(), GeometryError> {
        self.check_len(values)?;
        for (axis, &value) in self.axes.iter_mut().zip(values) {
            axis.set_value(value);
        }
        Ok(())
    }

    /// Sets one axis value by name.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownAxis`] if no axis has that name.
    pub fn set_axis_value(&mut self, name: &str, value: f64) -> Result<(), GeometryError> {
        self.axis_mut(name)?.set_value(value);
        Ok(())
    }

    /// Sets the mechanical range of one axis.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownAxis`] if no axis has that name.
    pub fn set_axis_range(&mut self, name: &str, range: Range) -> Result<(), GeometryError> {
        self.axis_mut(name)?.set_range(range);
        Ok(())
    }

    #[must_use]
    pub fn sample_holder(&self) -> &Holder {
        &self.sample
    }

    #[must_use]
    pub fn detector_holder(&self) -> &Holder {
        &self.detector
    }

    /// Returns the rotation applied to the sample by its holder.
    #[must_use]
    pub fn sample_rotation(&self) -> UnitQuaternion<f64> {
        self.sample.rotation(&self.axes)
    }

    /// Returns the rotation applied to the detector by its holder.
    #[must_use]
    pub fn detector_rotation(&self) -> UnitQuaternion<f64> {
        self.detector.rotation(&self.axes)
    }

    /// Returns the incident wave vector.
    #[must_use]
    pub fn ki(&self) -> Vector3<f64> {
        self.source.ki()
    }

    /// Returns the scattered wave vector reaching `detector`.
    #[must_use]
    pub fn kf(&self, detector: &Detector) -> Vector3<f64> {
        detector.kf(&self.ki(), &self.detector_rotation())
    }

    /// Returns the scattering vector `Q = kf - ki` in the laboratory frame.
    #[must_use]
    pub fn q(&self, detector: &Detector) -> Vector3<f64> {
        self.kf(detector) - self.ki()
    }

    /// Maps every value onto an equivalent angle inside its axis range.
    ///
    /// Returns `Ok(None)` when some value has no equivalent inside its range.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] on a wrong-length input.
    pub fn fit_to_ranges(&self, values: &[f64]) -> Result<Option<Vec<f64>>, GeometryError> {
        self.check_len(values)?;
        Ok(self
            .axes
            .iter()
            .zip(values)
            .map(|(axis, &value)| axis.range().fit(value))
            .collect())
    }

    /// Returns the summed angular distance between the current axis values
    /// and `values`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] on a wrong-length input.
    pub fn distance(&self, values: &[f64]) -> Result<f64, GeometryError> {
        self.check_len(values)?;
        Ok(self
            .axes
            .iter()
            .zip(values)
            .map(|(axis, &value)| angle::distance(axis.value(), value))
            .sum())
    }

    fn axis_mut(&mut self, name: &str) -> Result<&mut Axis, GeometryError> {
        self.axes
            .iter_mut()
            .find(|axis| axis.name() == name)
            .ok_or_else(|| GeometryError::UnknownAxis {
                name: name.to_owned(),
            })
    }

    fn check_len(&self, values: &[f64]) -> Result<(), GeometryError> {
        if values.len() == self.axes.len() {
            Ok(())
        } else {
            Err(GeometryError::DimensionMismatch {
                expected: self.axes.len(),
                found: values.len(),
            })
        }
    }
}
