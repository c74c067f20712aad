use gonio_core::Snapshot;

use crate::equation::Evaluation;

/// Indicates how the Newton solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Residuals fell below the configured tolerance.
    Converged,
    /// Reached the iteration limit without converging.
    MaxIters,
    /// No acceptable step could be found, or steps became negligible.
    Stalled,
    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a Newton solve.
#[derive(Debug, Clone)]
pub struct Solution<I, O, const N: usize> {
    /// Final solver status.
    pub status: Status,
    /// Final iterate.
    pub x: [f64; N],
    /// Residuals at the final iterate.
    pub residuals: [f64; N],
    /// Snapshot at the final iterate.
    pub snapshot: Snapshot<I, O>,
    /// Iteration count when the solver finished.
    pub iters: usize,
}

impl<I, O, const N: usize> Solution<I, O, N> {
    pub(super) fn from_eval(eval: Evaluation<I, O, N>, status: Status, iters: usize) -> Self {
        Self {
            status,
            x: eval.x,
            residuals: eval.residuals,
            snapshot: eval.snapshot,
            iters,
        }
    }

    /// Returns `true` if the solver converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}
