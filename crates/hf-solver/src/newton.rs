//! Damped Newton iteration with backtracking line search.

use crate::error::{SolverError, SolverResult};
use hf_core::ensure_all_finite;
use nalgebra::DVector;
use tracing::{debug, warn};

/// Newton solver configuration.
#[derive(Clone, Debug)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm
    pub rel_tol: f64,
    /// Relative perturbation for finite-difference Jacobians
    pub fd_epsilon: f64,
    /// Finite-difference scheme for [`crate::solve_system`]
    pub jacobian_scheme: crate::JacobianScheme,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-9,
            rel_tol: 1e-9,
            fd_epsilon: 1e-7,
            jacobian_scheme: crate::JacobianScheme::default(),
            line_search_beta: 0.5,
            max_line_search_iters: 20,
        }
    }
}

/// Newton iteration result.
///
/// Returned for both converged and unconverged solves: when the iteration
/// budget runs out, the line search stagnates, or the Jacobian factorization
/// fails, `x` holds the best point found so far and `converged` is false.
/// Callers must check the flag before trusting the point.
#[derive(Clone, Debug)]
pub struct NewtonResult {
    /// Solution vector (best-effort point if not converged)
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Solve F(x) = 0 with a damped Newton iteration.
///
/// The residual function may itself fail with a [`SolverError`]; that is a
/// hard fault (broken call contract, non-finite arithmetic) and propagates.
/// Plain failure to converge does not: it comes back as `Ok` with
/// `converged = false` and the current iterate as a best-effort point.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<nalgebra::DMatrix<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;

    if r.len() != x.len() {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "residual dimension {} does not match unknown dimension {}",
                r.len(),
                x.len()
            ),
        });
    }
    ensure_all_finite(r.as_slice(), "residual")?;

    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        // Check convergence
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        // Compute Jacobian and solve J * dx = -r
        let jac = jacobian_fn(&x)?;
        let Some(dx) = jac.lu().solve(&(-r.clone())) else {
            warn!(
                iteration = iter,
                residual = r_norm,
                "Jacobian factorization failed; returning best-effort point"
            );
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: false,
            });
        };

        // Backtracking line search on the residual norm
        let mut alpha = 1.0;
        let mut x_new = &x + alpha * &dx;
        let mut r_new = residual_fn(&x_new)?;
        let mut r_new_norm = r_new.norm();

        for _ in 0..config.max_line_search_iters {
            if r_new_norm.is_finite() && r_new_norm < r_norm {
                break;
            }
            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
            r_new = residual_fn(&x_new)?;
            r_new_norm = r_new.norm();
        }

        if !r_new_norm.is_finite() || r_new_norm >= r_norm {
            warn!(
                iteration = iter,
                residual = r_norm,
                "line search stagnated; returning best-effort point"
            );
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: false,
            });
        }

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;

        debug!(iteration = iter, residual = r_norm, step = alpha, "newton step");
    }

    let converged = r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm;
    if !converged {
        warn!(
            max_iterations = config.max_iterations,
            residual = r_norm,
            "iteration budget exhausted; returning best-effort point"
        );
    }
    Ok(NewtonResult {
        x,
        residual_norm: r_norm,
        iterations: config.max_iterations,
        converged,
    })
}
