use crate::equation::Evaluation;

/// Event emitted by the Newton solver after each accepted step.
#[derive(Debug)]
pub struct Event<'a, I, O, const N: usize> {
    /// Iteration counter (1-based).
    pub iter: usize,

    /// Fraction of the full Newton step that was accepted.
    pub step_scale: f64,

    /// Evaluation at the accepted iterate.
    pub eval: &'a Evaluation<I, O, N>,
}
