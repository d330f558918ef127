//! High-level solver interface.

use crate::error::SolverResult;
use crate::jacobian::{JacobianScheme, central_difference_jacobian, finite_difference_jacobian};
use crate::newton::{NewtonConfig, NewtonResult, newton_solve};
use nalgebra::DVector;

/// Solve F(x) = 0 from `x0` using a finite-difference Jacobian.
///
/// This is the standard entry point for callers that only have a residual
/// function: it pairs [`newton_solve`] with the difference scheme selected in
/// the config. The residual function must be `Sync` because Jacobian columns
/// are evaluated in parallel.
pub fn solve_system<F>(
    x0: DVector<f64>,
    residual_fn: F,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>> + Sync,
{
    let jacobian_fn = |x: &DVector<f64>| match config.jacobian_scheme {
        JacobianScheme::Forward => finite_difference_jacobian(x, &residual_fn, config.fd_epsilon),
        JacobianScheme::Central => central_difference_jacobian(x, &residual_fn, config.fd_epsilon),
    };

    newton_solve(x0, &residual_fn, jacobian_fn, config)
}
