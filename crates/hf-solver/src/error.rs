//! Error types for solver operations.
//!
//! Note that failing to converge is not an error: the Newton solver returns a
//! best-effort point with `converged = false` in that case. These variants
//! cover broken call contracts only.

use hf_core::HfError;
use thiserror::Error;

/// Hard errors raised during a nonlinear solve.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Core error: {0}")]
    Core(#[from] HfError),
}

pub type SolverResult<T> = Result<T, SolverError>;
