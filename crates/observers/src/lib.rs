//! Reusable observers for goniometer solvers and trajectory sweeps.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the Newton solver and the trajectory stepper.
//!
//! # Modules
//!
//! - [`traits`]: Capability traits for cross-solver observers
//!   ([`HasResidual`], [`ReportsSkip`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`TraceObserver`]: logs every event through `tracing`
//! - [`MaxConsecutiveSkips`]: stops a sweep after a run of unreachable targets
//!
//! [`Observer`]: gonio_core::Observer
//! [`HasResidual`]: traits::HasResidual
//! [`ReportsSkip`]: traits::ReportsSkip
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod skips;
mod trace;

pub use skips::MaxConsecutiveSkips;
pub use trace::TraceObserver;
