/// Errors that abort a trajectory sweep.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("sweep setup failed: {0}")]
    Setup(#[source] crate::Error),

    #[error("target {index} {target:?} failed: {source}")]
    Target {
        index: usize,
        target: Vec<f64>,
        #[source]
        source: crate::Error,
    },
}

impl Error {
    /// Returns the index of the failing target, if the sweep had started.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Setup(_) => None,
            Self::Target { index, .. } => Some(*index),
        }
    }
}
