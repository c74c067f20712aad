//! Damped Newton–Raphson solver for square systems of equations.
//!
//! # Algorithm
//!
//! Starting from an initial guess, each iteration:
//!
//! 1. Builds a forward-difference Jacobian of the residuals.
//! 2. Solves `J · dx = -f` with an LU decomposition.
//! 3. Backtracks along `dx`, halving the step until the sum of squared
//!    residuals decreases enough (Armijo condition).
//!
//! The solver converges when the largest absolute residual falls below
//! [`Config::residual_tol`].
//!
//! # When to Use
//!
//! Use Newton when the system is smooth and a reasonable starting point is
//! available. The inverse kinematics engines run it from several seeds and
//! keep the converged, distinct roots.
//!
//! # Limitations
//!
//! - Convergence is local; a poor seed can stall or converge to another root.
//! - An exactly singular Jacobian is reported as an error rather than
//!   regularized.
//!
//! # Observer Events
//!
//! One [`Event`] is emitted per accepted step. Returning
//! [`Action::StopEarly`] ends the solve with [`Status::StoppedByObserver`].

mod action;
mod config;
mod error;
mod event;
mod jacobian;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use gonio_core::{EquationProblem, Model, Observer};

use crate::equation::{Evaluation, evaluate};

/// Sufficient-decrease coefficient for the backtracking line search.
const ARMIJO: f64 = 1e-4;

/// Finds a root of the equation problem with damped Newton iteration.
///
/// # Errors
///
/// Returns an error if the model or problem fails, if the residuals at the
/// initial guess are not finite, or if the Jacobian is singular.
pub fn solve<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: EquationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output, N>, Action>,
{
    let mut current = evaluate(model, problem, x0)?;
    if !current.is_finite() {
        return Err(Error::NonFiniteResidual { iter: 0 });
    }
    if current.max_residual() <= config.residual_tol() {
        return Ok(Solution::from_eval(current, Status::Converged, 0));
    }

    for iter in 1..=config.max_iters() {
        let jacobian = jacobian::forward_difference(model, problem, &current, config.fd_step())?;
        let step = jacobian::newton_step(&jacobian, &current.residuals)
            .ok_or(Error::SingularJacobian { iter })?;

        let Some((next, scale)) = line_search(model, problem, &current, &step, config)? else {
            return Ok(Solution::from_eval(current, Status::Stalled, iter - 1));
        };

        let event = Event {
            iter,
            step_scale: scale,
            eval: &next,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution::from_eval(next, Status::StoppedByObserver, iter));
        }

        let step_size = scale * step.iter().fold(0.0_f64, |acc, dx| acc.max(dx.abs()));
        current = next;

        if current.max_residual() <= config.residual_tol() {
            return Ok(Solution::from_eval(current, Status::Converged, iter));
        }
        if step_size <= config.x_abs_tol() {
            return Ok(Solution::from_eval(current, Status::Stalled, iter));
        }
    }

    Ok(Solution::from_eval(
        current,
        Status::MaxIters,
        config.max_iters(),
    ))
}

/// Runs Newton without observation.
///
/// # Errors
///
/// Returns an error if the model or problem fails, if the residuals at the
/// initial guess are not finite, or if the Jacobian is singular.
pub fn solve_unobserved<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    config: &Config,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: EquationProblem<N, Input = M::Input, Output = M::Output>,
{
    solve(model, problem, x0, config, ())
}

/// An accepted line-search trial and the step scale that produced it.
type Accepted<I, O, const N: usize> = Option<(Evaluation<I, O, N>, f64)>;

/// Halves the Newton step until the merit function decreases enough.
///
/// Returns `None` when every trial within the backtracking budget was
/// rejected.
fn line_search<M, P, const N: usize>(
    model: &M,
    problem: &P,
    current: &Evaluation<M::Input, M::Output, N>,
    step: &[f64; N],
    config: &Config,
) -> Result<Accepted<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: EquationProblem<N, Input = M::Input, Output = M::Output>,
{
    let merit = current.merit();
    let mut scale = 1.0;

    for _ in 0..=config.max_backtracks() {
        let x = std::array::from_fn(|i| current.x[i] + scale * step[i]);
        let trial = evaluate(model, problem, x)?;

        if trial.is_finite() && trial.merit() <= (1.0 - ARMIJO * scale) * merit {
            return Ok(Some((trial, scale)));
        }
        scale *= 0.5;
    }

    Ok(None)
}
