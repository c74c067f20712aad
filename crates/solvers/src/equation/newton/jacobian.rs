use nalgebra::{DMatrix, DVector};

use gonio_core::{EquationProblem, Model};

use crate::equation::{Evaluation, evaluate};

use super::Error;

/// Row-major Jacobian of the residuals with respect to `x`.
pub(super) type Jacobian<const N: usize> = [[f64; N]; N];

/// Approximates the Jacobian at `at` with forward differences.
///
/// Column `j` uses the step `fd_step * max(1, |x_j|)`.
pub(super) fn forward_difference<M, P, const N: usize>(
    model: &M,
    problem: &P,
    at: &Evaluation<M::Input, M::Output, N>,
    fd_step: f64,
) -> Result<Jacobian<N>, Error>
where
    M: Model,
    P: EquationProblem<N, Input = M::Input, Output = M::Output>,
{
    let mut jacobian = [[0.0; N]; N];

    for j in 0..N {
        let h = fd_step * at.x[j].abs().max(1.0);
        let mut x = at.x;
        x[j] += h;

        let perturbed = evaluate(model, problem, x)?;
        for (row, (r_new, r_old)) in jacobian
            .iter_mut()
            .zip(perturbed.residuals.iter().zip(&at.residuals))
        {
            row[j] = (r_new - r_old) / h;
        }
    }

    Ok(jacobian)
}

/// Solves `J · dx = -f`, returning `None` when `J` is singular.
pub(super) fn newton_step<const N: usize>(
    jacobian: &Jacobian<N>,
    residuals: &[f64; N],
) -> Option<[f64; N]> {
    let matrix = DMatrix::from_fn(N, N, |i, j| jacobian[i][j]);
    let rhs = DVector::from_iterator(N, residuals.iter().map(|r| -r));

    let dx = matrix.lu().solve(&rhs)?;
    if dx.iter().any(|v| !v.is_finite()) {
        return None;
    }

    Some(std::array::from_fn(|i| dx[i]))
}
