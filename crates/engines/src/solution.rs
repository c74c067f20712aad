/// Handle to an engine inside an [`EngineCollection`](crate::EngineCollection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineId(pub(crate) usize);

impl EngineId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One axis vector reaching the target of an inverse solve.
///
/// A solution can only be committed to the collection that produced it,
/// and only while it belongs to that collection's latest inverse solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub(crate) collection: u64,
    pub(crate) engine: EngineId,
    pub(crate) generation: u64,
    pub(crate) axis_values: Vec<f64>,
}

impl Solution {
    /// Returns the engine that produced this solution.
    #[must_use]
    pub fn engine(&self) -> EngineId {
        self.engine
    }

    /// Returns the axis values in the geometry's canonical order.
    #[must_use]
    pub fn axis_values(&self) -> &[f64] {
        &self.axis_values
    }
}
