//! Diffractometer geometries and the context they are solved in.
//!
//! - [`Geometry`]: the axes of one kinematic model, split into a sample
//!   holder and a detector holder, plus the X-ray [`Source`]
//! - [`DiffractometerType`]: the supported kinematic models
//! - [`Axis`] and [`Range`]: one rotation motor and its mechanical travel
//! - [`Sample`] and [`Lattice`]: the crystal, its orientation, and its UB
//!   matrix
//! - [`Detector`]: the (point) detector carried by the detector holder
//!
//! All angles are in radians and all lengths in ångström.

pub mod angle;

mod axis;
mod detector;
mod error;
mod factory;
mod geometry;
mod holder;
mod lattice;
mod sample;
mod source;

pub use axis::{Axis, Range};
pub use detector::{Detector, DetectorKind};
pub use error::{GeometryError, LatticeError, RangeError, SourceError, UnknownDiffractometer};
pub use factory::{DiffractometerType, KAPPA_ALPHA};
pub use geometry::Geometry;
pub use holder::Holder;
pub use lattice::Lattice;
pub use sample::Sample;
pub use source::Source;
