use thiserror::Error;

/// Configuration for the Newton solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    residual_tol: f64,
    x_abs_tol: f64,
    fd_step: f64,
    max_backtracks: usize,
}

/// Errors that can occur when validating a Newton solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("residual_tol must be finite and non-negative")]
    ResidualTol,

    #[error("x_abs_tol must be finite and non-negative")]
    XAbs,

    #[error("fd_step must be finite and positive")]
    FdStep,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            residual_tol: 1e-10,
            x_abs_tol: 1e-14,
            fd_step: 1e-7,
            max_backtracks: 30,
        }
    }
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is negative or non-finite, or if the
    /// finite-difference step is not strictly positive.
    pub fn new(
        max_iters: usize,
        residual_tol: f64,
        x_abs_tol: f64,
        fd_step: f64,
        max_backtracks: usize,
    ) -> Result<Self, ConfigError> {
        if !residual_tol.is_finite() || residual_tol < 0.0 {
            return Err(ConfigError::ResidualTol);
        }
        if !x_abs_tol.is_finite() || x_abs_tol < 0.0 {
            return Err(ConfigError::XAbs);
        }
        if !fd_step.is_finite() || fd_step <= 0.0 {
            return Err(ConfigError::FdStep);
        }

        Ok(Self {
            max_iters,
            residual_tol,
            x_abs_tol,
            fd_step,
            max_backtracks,
        })
    }

    /// Returns the maximum number of Newton iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the tolerance on the largest absolute residual.
    #[must_use]
    pub fn residual_tol(&self) -> f64 {
        self.residual_tol
    }

    /// Returns the step size below which the solver reports a stall.
    #[must_use]
    pub fn x_abs_tol(&self) -> f64 {
        self.x_abs_tol
    }

    /// Returns the relative forward-difference step.
    #[must_use]
    pub fn fd_step(&self) -> f64 {
        self.fd_step
    }

    /// Returns the maximum number of step halvings per iteration.
    #[must_use]
    pub fn max_backtracks(&self) -> usize {
        self.max_backtracks
    }
}
