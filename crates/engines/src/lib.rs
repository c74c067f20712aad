//! Pseudo-axis engines and trajectory sweeps for diffractometers.
//!
//! An [`EngineCollection`] owns the geometry, detector, and sample of one
//! diffractometer and the engines that solve against them:
//!
//! - [`HklEngine`]: reciprocal-lattice coordinates `h`, `k`, `l`
//! - [`QEngine`]: signed magnitude of the scattering vector
//! - [`EuleriansEngine`]: eulerian angles of a kappa sample holder
//! - [`PsiEngine`]: azimuth of a reference reflection about `Q`
//!
//! Inverse solves return every [`Solution`] reaching a target, or none when
//! it is unreachable. [`trajectory::sweep`] steps a collection through a
//! sequence of targets, committing one solution per reachable target.

pub mod kappa;
pub mod selection;
pub mod trajectory;

mod collection;
mod context;
mod engine;
mod error;
mod eulerians;
mod four_circle;
mod hkl;
mod psi;
mod q;
mod solution;
mod vertical;

pub use collection::EngineCollection;
pub use context::Context;
pub use engine::PseudoAxisEngine;
pub use error::{Error, Unreachable};
pub use eulerians::EuleriansEngine;
pub use hkl::HklEngine;
pub use psi::PsiEngine;
pub use q::QEngine;
pub use solution::{EngineId, Solution};
