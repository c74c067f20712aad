/// Control actions supported by a trajectory sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the sweep and return the points recorded so far.
    StopEarly,
}
