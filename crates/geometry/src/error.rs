use thiserror::Error;

/// Errors raised by [`Geometry`](crate::Geometry) accessors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("expected {expected} axis values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("unknown axis `{name}`")]
    UnknownAxis { name: String },
}

/// Errors raised when a lattice cannot produce a B matrix.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LatticeError {
    #[error("lattice length {name} must be finite and positive, got {value}")]
    NonPositiveLength { name: &'static str, value: f64 },

    #[error("lattice angle {name} must lie strictly between 0 and π, got {value}")]
    InvalidAngle { name: &'static str, value: f64 },

    #[error("lattice angles do not describe a cell")]
    Degenerate,
}

/// Errors raised when constructing a [`Source`](crate::Source).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SourceError {
    #[error("wavelength must be finite and positive, got {0}")]
    Wavelength(f64),
}

/// Errors raised when constructing a [`Range`](crate::Range).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RangeError {
    #[error("range bounds must be finite with min <= max, got [{min}, {max}]")]
    Invalid { min: f64, max: f64 },
}

/// Returned when parsing an unrecognized diffractometer name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown diffractometer `{name}`")]
pub struct UnknownDiffractometer {
    pub name: String,
}
