//! Helpers for periodic angles.

use std::f64::consts::{PI, TAU};

/// Wraps an angle into `(-π, π]`.
#[must_use]
pub fn wrap(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Returns the absolute angular distance between two angles, in `[0, π]`.
#[must_use]
pub fn distance(a: f64, b: f64) -> f64 {
    wrap(a - b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn wraps_into_half_open_interval() {
        assert_relative_eq!(wrap(PI), PI);
        assert_relative_eq!(wrap(-PI), PI);
        assert_relative_eq!(wrap(1.5 * PI), -0.5 * PI, epsilon = 1e-15);
        assert_relative_eq!(wrap(-2.5 * PI), -0.5 * PI, epsilon = 1e-15);
        assert_relative_eq!(wrap(0.25), 0.25);
    }

    #[test]
    fn distance_goes_the_short_way_round() {
        assert_relative_eq!(distance(PI - 0.1, -PI + 0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(distance(0.3, 0.1), 0.2, epsilon = 1e-15);
    }
}
