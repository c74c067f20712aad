//! Capability traits for cross-solver observers.
//!
//! Newton iterations and trajectory sweeps each define their own event and
//! action types. These traits expose what observers need from them, so one
//! observer can watch either.
//!
//! # Event traits
//!
//! - [`HasResidual`]: events that carry a residual value
//! - [`ReportsSkip`]: events that may report a skipped step
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! An observer that stops any solver once the residual is small enough,
//! without naming the solver's event type:
//!
//! ```rust
//! use gonio_core::Observer;
//! use gonio_observers::traits::{CanStopEarly, HasResidual};
//!
//! struct Within(f64);
//!
//! impl<E: HasResidual, A: CanStopEarly> Observer<E, A> for Within {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.residual() <= self.0).then(A::stop_early)
//!     }
//! }
//! ```

use gonio_engines::trajectory;
use gonio_solvers::equation::newton;

/// An event that carries a residual value.
pub trait HasResidual {
    /// Returns the largest absolute residual at this event.
    fn residual(&self) -> f64;
}

/// An event that may report a step that produced no result.
pub trait ReportsSkip {
    /// Returns `true` if this event reports a skipped step.
    fn is_skip(&self) -> bool;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- HasResidual for newton::Event ---

impl<I, O, const N: usize> HasResidual for newton::Event<'_, I, O, N> {
    fn residual(&self) -> f64 {
        self.eval.max_residual()
    }
}

// --- ReportsSkip for trajectory::Event ---

impl ReportsSkip for trajectory::Event<'_> {
    fn is_skip(&self) -> bool {
        matches!(self, trajectory::Event::Skipped { .. })
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for newton::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for trajectory::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
