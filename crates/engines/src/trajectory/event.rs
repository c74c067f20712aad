use super::Point;

/// Event emitted by a sweep once per target, in target order.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A solution was committed and recorded.
    Solved { index: usize, point: &'a Point },

    /// No solution was committed; the geometry did not move.
    ///
    /// `candidates` is zero when the target is unreachable and positive when
    /// the selection policy declined every solution.
    Skipped {
        index: usize,
        target: &'a [f64],
        candidates: usize,
    },
}

impl Event<'_> {
    /// Returns the position of the target in the sweep.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Solved { index, .. } | Self::Skipped { index, .. } => *index,
        }
    }
}
