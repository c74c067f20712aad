use std::f64::consts::{PI, TAU};

use nalgebra::{Unit, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{angle, error::RangeError};

/// Mechanical travel of a rotation axis, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Range {
    min: f64,
    max: f64,
}

impl Default for Range {
    fn default() -> Self {
        Self { min: -PI, max: PI }
    }
}

impl Range {
    /// Creates a range from its bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is not finite or if `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, RangeError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(RangeError::Invalid { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns `true` if `value` lies within the bounds (inclusive).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Maps `value` onto an equivalent angle (modulo a full turn) inside the
    /// range.
    ///
    /// The representative in `(-π, π]` wins when the range contains it;
    /// otherwise the one fewest turns away is used. Returns `None` when no
    /// equivalent angle fits.
    #[must_use]
    pub fn fit(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }

        let base = angle::wrap(value);
        if self.contains(base) {
            return Some(base);
        }

        #[allow(clippy::cast_possible_truncation)]
        let (lo, hi) = (
            ((self.min - base) / TAU).ceil() as i64,
            ((self.max - base) / TAU).floor() as i64,
        );
        if lo > hi {
            return None;
        }

        let turns = if lo > 0 { lo } else { hi };
        #[allow(clippy::cast_precision_loss)]
        let fitted = base + turns as f64 * TAU;
        self.contains(fitted).then_some(fitted)
    }
}

/// A named rotation motor.
///
/// The rotation direction is a unit vector in the laboratory frame, and the
/// value is the rotation angle about it (right-handed, radians).
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: &'static str,
    direction: Unit<Vector3<f64>>,
    value: f64,
    range: Range,
}

impl Axis {
    /// Creates a rotation axis at zero with the default range.
    ///
    /// `direction` is normalized.
    #[must_use]
    pub fn rotation(name: &'static str, direction: Vector3<f64>) -> Self {
        Self {
            name,
            direction: Unit::new_normalize(direction),
            value: 0.0,
            range: Range::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn direction(&self) -> &Unit<Vector3<f64>> {
        &self.direction
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    pub fn set_range(&mut self, range: Range) {
        self.range = range;
    }

    /// Returns the rotation this axis applies at its current value.
    #[must_use]
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        self.quaternion_at(self.value)
    }

    /// Returns the rotation this axis would apply at `value`.
    #[must_use]
    pub fn quaternion_at(&self, value: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&self.direction, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn default_range_is_one_turn() {
        let range = Range::default();
        assert_relative_eq!(range.min(), -PI);
        assert_relative_eq!(range.max(), PI);
    }

    #[test]
    fn rejects_inverted_or_non_finite_bounds() {
        assert!(Range::new(1.0, -1.0).is_err());
        assert!(Range::new(f64::NEG_INFINITY, 0.0).is_err());
        assert!(Range::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn fit_prefers_the_wrapped_representative() {
        let range = Range::default();
        let fitted = range.fit(1.5 * PI).expect("full turn fits everything");
        assert_relative_eq!(fitted, -0.5 * PI, epsilon = 1e-15);
    }

    #[test]
    fn fit_shifts_by_whole_turns_into_offset_ranges() {
        let range = Range::new(0.0, TAU).expect("valid range");
        let fitted = range.fit(-0.5 * PI).expect("should fit");
        assert_relative_eq!(fitted, 1.5 * PI, epsilon = 1e-15);

        let range = Range::new(-3.0 * PI, -2.0 * PI).expect("valid range");
        let fitted = range.fit(-0.5 * PI).expect("should fit");
        assert_relative_eq!(fitted, -2.5 * PI, epsilon = 1e-14);
    }

    #[test]
    fn fit_rejects_values_outside_narrow_ranges() {
        let range = Range::new(0.0, 0.5).expect("valid range");
        assert!(range.fit(1.0).is_none());
        assert!(range.fit(f64::NAN).is_none());
        assert_relative_eq!(range.fit(0.25 + TAU).expect("should fit"), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn rotates_about_its_direction() {
        let mut axis = Axis::rotation("omega", Vector3::new(0.0, -2.0, 0.0));
        assert_relative_eq!(axis.direction().into_inner(), Vector3::new(0.0, -1.0, 0.0));

        axis.set_value(0.5 * PI);
        let rotated = axis.quaternion() * Vector3::x();
        assert_relative_eq!(rotated, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-15);
    }
}
