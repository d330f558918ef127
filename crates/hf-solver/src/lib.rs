//! Dense nonlinear-system solver.
//!
//! This crate provides a damped Newton solver for square systems of nonlinear
//! algebraic equations F(x) = 0. The caller supplies a residual function; the
//! Jacobian is approximated by finite differences unless an analytic one is
//! provided. Non-convergence is reported as data (a best-effort point plus a
//! `converged` flag), never masked as success.

pub mod error;
pub mod jacobian;
pub mod newton;
pub mod solve;

pub use error::{SolverError, SolverResult};
pub use jacobian::{JacobianScheme, central_difference_jacobian, finite_difference_jacobian};
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
pub use solve::solve_system;
