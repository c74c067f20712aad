use gonio_core::Observer;
use gonio_engines::trajectory;
use gonio_solvers::equation::newton;
use tracing::{debug, trace};

/// Logs solver and sweep events through `tracing` and never acts.
///
/// Newton iterations are logged at `TRACE`, sweep points at `DEBUG`. The
/// label tells apart several observed runs in one log.
#[derive(Debug, Clone, Copy)]
pub struct TraceObserver {
    label: &'static str,
}

impl TraceObserver {
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Default for TraceObserver {
    fn default() -> Self {
        Self::new("solve")
    }
}

impl<I, O, A, const N: usize> Observer<newton::Event<'_, I, O, N>, A> for TraceObserver {
    fn observe(&mut self, event: &newton::Event<'_, I, O, N>) -> Option<A> {
        trace!(
            label = self.label,
            iter = event.iter,
            step_scale = event.step_scale,
            x = ?event.eval.x,
            max_residual = event.eval.max_residual(),
            "newton step"
        );
        None
    }
}

impl<A> Observer<trajectory::Event<'_>, A> for TraceObserver {
    fn observe(&mut self, event: &trajectory::Event<'_>) -> Option<A> {
        match event {
            trajectory::Event::Solved { index, point } => debug!(
                label = self.label,
                index,
                target = ?point.target,
                axis_values = ?point.axis_values,
                candidates = point.candidates,
                "point solved"
            ),
            trajectory::Event::Skipped {
                index,
                target,
                candidates,
            } => debug!(label = self.label, index, ?target, candidates, "point skipped"),
        }
        None
    }
}
