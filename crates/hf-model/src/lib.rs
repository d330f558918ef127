//! Lumped-parameter cardiovascular circuit model.
//!
//! This crate finds the compliance parameters of a closed-loop circulatory
//! circuit such that a target systemic arterial pressure is reached at steady
//! state. Two nested dense nonlinear solves do the work:
//!
//! - the inner **flow solve** ([`FlowProblem`]) finds the 7 cycle-averaged
//!   flows and pressures for a fixed compliance vector;
//! - the outer **compliance solve** ([`ComplianceProblem`]) iterates over the
//!   5 compliances, running the inner solve to convergence inside every
//!   residual evaluation.
//!
//! A standalone [`verify`] pass re-runs the forward flow solve at the solved
//! compliances and reports the achieved arterial pressure against the target.

pub mod compliance;
pub mod error;
pub mod flow;
pub mod params;
pub mod pipeline;
pub mod state;
pub mod verify;

pub use compliance::{ComplianceProblem, ComplianceSolution};
pub use error::{ModelError, ModelResult};
pub use flow::{FlowProblem, FlowSolution};
pub use params::CircuitParams;
pub use pipeline::{PipelineOptions, PipelineReport, run_pipeline};
pub use state::{Compliances, FlowState};
pub use verify::{VerifyReport, verify};
