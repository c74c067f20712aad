//! Policies choosing one solution among the candidates of an inverse solve.

use gonio_geometry::Geometry;

use crate::Solution;

/// Picks the solution to commit, given the geometry it would move.
///
/// Returning `None` leaves the geometry unchanged and skips the target.
/// Closures `Fn(&Geometry, &[Solution]) -> Option<usize>` are policies too.
pub trait SelectionPolicy {
    fn select(&self, geometry: &Geometry, solutions: &[Solution]) -> Option<usize>;
}

/// Always takes the first enumerated solution.
#[derive(Debug, Clone, Copy, Default)]
pub struct First;

impl SelectionPolicy for First {
    fn select(&self, _geometry: &Geometry, solutions: &[Solution]) -> Option<usize> {
        (!solutions.is_empty()).then_some(0)
    }
}

/// Takes the solution with the smallest summed angular move, as measured by
/// [`Geometry::distance`].
///
/// Ties go to the earlier solution. Solutions of the wrong length are never
/// chosen.
#[derive(Debug, Clone, Copy, Default)]
pub struct Closest;

impl SelectionPolicy for Closest {
    fn select(&self, geometry: &Geometry, solutions: &[Solution]) -> Option<usize> {
        solutions
            .iter()
            .enumerate()
            .filter_map(|(index, solution)| {
                geometry
                    .distance(solution.axis_values())
                    .ok()
                    .map(|distance| (index, distance))
            })
            .fold(None, |best: Option<(usize, f64)>, (index, distance)| match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((index, distance)),
            })
            .map(|(index, _)| index)
    }
}

impl<F> SelectionPolicy for F
where
    F: Fn(&Geometry, &[Solution]) -> Option<usize>,
{
    fn select(&self, geometry: &Geometry, solutions: &[Solution]) -> Option<usize> {
        self(geometry, solutions)
    }
}
