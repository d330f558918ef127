//! End-to-end pipeline: compliance solve followed by verification.

use crate::compliance::{ComplianceProblem, ComplianceSolution};
use crate::error::ModelResult;
use crate::params::CircuitParams;
use crate::verify::{VerifyReport, verify};
use hf_solver::NewtonConfig;

/// Options for a pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    /// Newton configuration for the outer compliance solve
    pub outer_config: NewtonConfig,
    /// Relative tolerance for the verification pressure match
    pub verify_rel_tol: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            outer_config: NewtonConfig::default(),
            verify_rel_tol: 0.01,
        }
    }
}

/// Full run record: inputs, solved compliances, and the verification check.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PipelineReport {
    pub params: CircuitParams,
    pub p_sa_target: f64,
    pub solution: ComplianceSolution,
    pub verification: VerifyReport,
}

/// Construct the problem, run the compliance solve, then the verification
/// pass, and return everything as one value. No printing happens here;
/// presenting the report is the caller's concern.
pub fn run_pipeline(
    params: CircuitParams,
    p_sa_target: f64,
    options: &PipelineOptions,
) -> ModelResult<PipelineReport> {
    let problem = ComplianceProblem::new(params, p_sa_target);
    let solution = problem.solve(None, &options.outer_config)?;
    let verification = verify(
        params,
        &solution.compliances,
        p_sa_target,
        options.verify_rel_tol,
    )?;

    Ok(PipelineReport {
        params,
        p_sa_target,
        solution,
        verification,
    })
}
