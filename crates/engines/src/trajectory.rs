//! Sweeps an engine through a sequence of pseudo-axis targets.
//!
//! Each target is solved against the geometry left by the previous one:
//!
//! ```text
//! solutions = inverse(target)
//! empty      -> skip the target, geometry unchanged
//! otherwise  -> policy picks one, select_solution commits it, record it
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gonio_engines::trajectory;
//!
//! let targets = trajectory::linspace(&[0.0, 0.0, 1.0], &[0.0, 1.0, 1.0], 11)?;
//! let path = trajectory::sweep_unobserved(&mut collection, hkl, &targets)?;
//!
//! for point in &path.points {
//!     println!("{:?} -> {:?}", point.target, point.axis_values);
//! }
//! ```

mod action;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Point, Status, Trajectory};

use gonio_core::Observer;
use tracing::{debug, info};

use crate::{
    EngineCollection, EngineId,
    selection::{First, SelectionPolicy},
};

/// Solves every target in order and records the committed axis values.
///
/// # Algorithm
///
/// 1. Check that the collection is initialized and owns `engine`.
/// 2. For each target:
///    - Enumerate its solutions with [`EngineCollection::inverse`].
///    - Ask `policy` for one, given the current geometry.
///    - If there is none, record the index as skipped.
///    - Otherwise commit it and record the geometry's axis values.
///    - Emit an [`Event`] and stop if the observer returns `StopEarly`.
/// 3. Return the trajectory with [`Status::Complete`].
///
/// Unreachable targets never abort the sweep. A policy index past the end of
/// the solution list counts as no choice.
///
/// # Errors
///
/// Returns [`Error::Setup`] if the sweep cannot start, and [`Error::Target`]
/// with the failing index on the first structural failure, such as a
/// wrong-length target or a degenerate lattice.
pub fn sweep<T, P, Obs>(
    collection: &mut EngineCollection,
    engine: EngineId,
    targets: &[T],
    policy: &P,
    mut observer: Obs,
) -> Result<Trajectory, Error>
where
    T: AsRef<[f64]>,
    P: SelectionPolicy + ?Sized,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let axis_names = collection.geometry().map_err(Error::Setup)?.axis_names();
    let (name, mode) = {
        let engine = collection.engine(engine).map_err(Error::Setup)?;
        (engine.name(), engine.mode())
    };
    info!(engine = name, mode, targets = targets.len(), "sweep started");

    let mut trajectory = Trajectory {
        status: Status::Complete,
        axis_names,
        points: Vec::with_capacity(targets.len()),
        skipped: Vec::new(),
    };

    for (index, target) in targets.iter().enumerate() {
        let target = target.as_ref();
        let failed = |source: crate::Error| Error::Target {
            index,
            target: target.to_vec(),
            source,
        };

        let solutions = collection.inverse(engine, target).map_err(failed)?;
        let chosen = policy
            .select(collection.geometry().map_err(failed)?, &solutions)
            .and_then(|choice| solutions.get(choice));

        let action = match chosen {
            Some(solution) => {
                collection.select_solution(solution).map_err(failed)?;
                let point = Point {
                    index,
                    target: target.to_vec(),
                    axis_values: collection.geometry().map_err(failed)?.axis_values(),
                    candidates: solutions.len(),
                };
                let action = observer.observe(&Event::Solved {
                    index,
                    point: &point,
                });
                trajectory.points.push(point);
                action
            }
            None => {
                debug!(index, ?target, candidates = solutions.len(), "target skipped");
                trajectory.skipped.push(index);
                observer.observe(&Event::Skipped {
                    index,
                    target,
                    candidates: solutions.len(),
                })
            }
        };

        if let Some(Action::StopEarly) = action {
            trajectory.status = Status::StoppedByObserver;
            break;
        }
    }

    info!(
        engine = name,
        points = trajectory.points.len(),
        skipped = trajectory.skipped.len(),
        status = ?trajectory.status,
        "sweep finished"
    );
    Ok(trajectory)
}

/// Sweeps with the first-solution policy and no observation.
///
/// This is a convenience wrapper around [`sweep`].
///
/// # Errors
///
/// Returns an error if the sweep cannot start or a target fails structurally.
pub fn sweep_unobserved<T>(
    collection: &mut EngineCollection,
    engine: EngineId,
    targets: &[T],
) -> Result<Trajectory, Error>
where
    T: AsRef<[f64]>,
{
    sweep(collection, engine, targets, &First, ())
}

/// Returns `points` evenly spaced targets from `start` to `end`, inclusive.
///
/// A single point is `start`; zero points is an empty path.
///
/// # Errors
///
/// Returns [`crate::Error::DimensionMismatch`] if the endpoints differ in
/// length.
pub fn linspace(start: &[f64], end: &[f64], points: usize) -> Result<Vec<Vec<f64>>, crate::Error> {
    if start.len() != end.len() {
        return Err(crate::Error::DimensionMismatch {
            expected: start.len(),
            found: end.len(),
        });
    }

    let intervals = points.saturating_sub(1).max(1) as f64;
    Ok((0..points)
        .map(|i| {
            let fraction = i as f64 / intervals;
            start
                .iter()
                .zip(end)
                .map(|(a, b)| a + (b - a) * fraction)
                .collect()
        })
        .collect())
}
