use thiserror::Error;

use gonio_geometry::{DiffractometerType, GeometryError, LatticeError};

/// Errors raised by engines and the engine collection.
///
/// An unreachable target is not an error: inverse solves report it as an
/// empty solution list.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("expected {expected} values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("engine collection is not initialized")]
    NotInitialized,

    #[error("engine collection is already initialized")]
    AlreadyInitialized,

    #[error("unknown engine `{name}`")]
    UnknownEngine { name: String },

    #[error("engine `{engine}` has no mode `{mode}`")]
    UnknownMode { engine: &'static str, mode: String },

    #[error("engine `{engine}` has no parameter `{name}`")]
    UnknownParameter { engine: &'static str, name: String },

    #[error("unknown axis `{name}`")]
    UnknownAxis { name: String },

    #[error("geometry unreachable: {reason}")]
    GeometryUnreachable { reason: Unreachable },

    #[error("solution does not come from the latest inverse solve")]
    StaleSolution,
}

/// Why a configuration cannot be solved at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Unreachable {
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    #[error("target contains a non-finite value")]
    NonFiniteTarget,

    #[error("geometry is {found}, collection expects {expected}")]
    ModelMismatch {
        expected: DiffractometerType,
        found: DiffractometerType,
    },

    #[error("sample orientation is singular")]
    SingularOrientation,

    #[error("azimuth is undefined: Q is null or parallel to the reference")]
    UndefinedAzimuth,
}

impl From<GeometryError> for Error {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::DimensionMismatch { expected, found } => {
                Self::DimensionMismatch { expected, found }
            }
            GeometryError::UnknownAxis { name } => Self::UnknownAxis { name },
        }
    }
}

impl From<LatticeError> for Error {
    fn from(err: LatticeError) -> Self {
        Self::unreachable(err.into())
    }
}

impl Error {
    pub(crate) fn unreachable(reason: Unreachable) -> Self {
        Self::GeometryUnreachable { reason }
    }
}
