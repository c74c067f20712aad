use thiserror::Error;

use gonio_core::{EquationProblem, Model, Snapshot};

/// One point of an equation problem: the variables, their residuals, and the
/// model call that produced them.
#[derive(Debug, Clone)]
pub struct Evaluation<I, O, const N: usize> {
    pub x: [f64; N],
    pub residuals: [f64; N],
    pub snapshot: Snapshot<I, O>,
}

impl<I, O, const N: usize> Evaluation<I, O, N> {
    /// Returns the largest absolute residual.
    #[must_use]
    pub fn max_residual(&self) -> f64 {
        self.residuals.iter().fold(0.0, |acc, r| acc.max(r.abs()))
    }

    /// Returns the sum of squared residuals.
    #[must_use]
    pub fn merit(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }

    /// Returns `true` if every residual is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.residuals.iter().all(|r| r.is_finite())
    }
}

/// Failure while evaluating an equation problem at one point.
#[derive(Debug, Error)]
pub enum EvalError<ME, PE> {
    #[error("model call failed: {0}")]
    Model(#[source] ME),

    #[error("problem mapping failed: {0}")]
    Problem(#[source] PE),
}

/// Type alias for the result of [`evaluate`].
pub type EvaluateResult<M, P, const N: usize> = Result<
    Evaluation<<M as Model>::Input, <M as Model>::Output, N>,
    EvalError<<M as Model>::Error, <P as EquationProblem<N>>::Error>,
>;

/// Evaluates `problem` at `x`: builds the model input, calls the model, and
/// reads the residuals back from the input/output pair.
///
/// # Errors
///
/// Returns [`EvalError::Problem`] if the input or residuals cannot be built
/// and [`EvalError::Model`] if the model call fails.
pub fn evaluate<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x: [f64; N],
) -> EvaluateResult<M, P, N>
where
    M: Model,
    P: EquationProblem<N, Input = M::Input, Output = M::Output>,
{
    let input = problem.input(&x).map_err(EvalError::Problem)?;
    let output = model.call(&input).map_err(EvalError::Model)?;
    let residuals = problem
        .residuals(&input, &output)
        .map_err(EvalError::Problem)?;

    Ok(Evaluation {
        x,
        residuals,
        snapshot: Snapshot::new(input, output),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    #[derive(Debug, Error)]
    #[error("negative input")]
    struct Negative;

    /// `y = sqrt(x)`, failing for negative inputs.
    struct Sqrt;

    impl Model for Sqrt {
        type Input = f64;
        type Output = f64;
        type Error = Negative;

        fn call(&self, input: &f64) -> Result<f64, Negative> {
            if *input < 0.0 { Err(Negative) } else { Ok(input.sqrt()) }
        }
    }

    /// Solves `sqrt(x) = 3` and `x = 9` at once.
    struct Nine;

    impl EquationProblem<2> for Nine {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn input(&self, x: &[f64; 2]) -> Result<f64, Infallible> {
            Ok(x[0])
        }

        fn residuals(&self, input: &f64, output: &f64) -> Result<[f64; 2], Infallible> {
            Ok([output - 3.0, input - 9.0])
        }
    }

    #[test]
    fn residual_summaries() {
        let eval = evaluate(&Sqrt, &Nine, [4.0, 0.0]).expect("valid input");

        assert_eq!(eval.residuals, [-1.0, -5.0]);
        assert_eq!(eval.snapshot.output, 2.0);
        assert_eq!(eval.max_residual(), 5.0);
        assert_eq!(eval.merit(), 26.0);
        assert!(eval.is_finite());
    }

    #[test]
    fn model_failures_are_reported_as_model_errors() {
        let err = evaluate(&Sqrt, &Nine, [-1.0, 0.0]).expect_err("negative input");
        assert!(matches!(err, EvalError::Model(Negative)));
    }
}
