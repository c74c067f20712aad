use gonio_core::Observer;

use crate::traits::{CanStopEarly, ReportsSkip};

/// Stops a sweep once `limit` consecutive targets have been skipped.
///
/// A path that leaves the reachable domain for good keeps producing skips;
/// this observer ends the sweep instead of solving the rest of it.
#[derive(Debug, Clone)]
pub struct MaxConsecutiveSkips {
    limit: usize,
    run: usize,
    longest: usize,
}

impl MaxConsecutiveSkips {
    /// Creates an observer that stops after `limit` skips in a row.
    ///
    /// A limit of zero never stops.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            run: 0,
            longest: 0,
        }
    }

    /// Returns the length of the current run of skips.
    #[must_use]
    pub fn run(&self) -> usize {
        self.run
    }

    /// Returns the longest run of skips seen so far.
    #[must_use]
    pub fn longest(&self) -> usize {
        self.longest
    }
}

impl<E, A> Observer<E, A> for MaxConsecutiveSkips
where
    E: ReportsSkip,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if !event.is_skip() {
            self.run = 0;
            return None;
        }

        self.run += 1;
        self.longest = self.longest.max(self.run);
        (self.limit > 0 && self.run >= self.limit).then(A::stop_early)
    }
}

/// Allows `&mut MaxConsecutiveSkips` to be passed to sweeps that take an
/// observer by value, so the counters can be read afterwards.
impl<E, A> Observer<E, A> for &mut MaxConsecutiveSkips
where
    E: ReportsSkip,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}
