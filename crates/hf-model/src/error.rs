//! Error types for model operations.

use thiserror::Error;

/// Hard errors raised while setting up or running the circuit solves.
///
/// Non-convergence is not represented here; it travels as the `converged`
/// flag on [`crate::FlowSolution`] and [`crate::ComplianceSolution`].
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Solver error: {0}")]
    Solver(#[from] hf_solver::SolverError),

    #[error("Core error: {0}")]
    Core(#[from] hf_core::HfError),
}

pub type ModelResult<T> = Result<T, ModelError>;
