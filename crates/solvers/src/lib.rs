//! Numerical solvers for diffractometer kinematics.
//!
//! Solvers are organized by the kind of problem they solve:
//!
//! - [`equation`]: root finding for square systems of equations

pub mod equation;
