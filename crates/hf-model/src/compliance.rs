//! Outer solve: compliances that hit a target systemic arterial pressure.

use crate::error::ModelResult;
use crate::flow::{FlowProblem, FlowSolution};
use crate::params::CircuitParams;
use crate::state::{Compliances, FlowState};
use hf_solver::{NewtonConfig, SolverResult, solve_system};
use nalgebra::DVector;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Inverse compliance problem.
///
/// Bundles the fixed parameters, the pressure target, and the starting guess
/// for the inner flow solve. Every outer residual evaluation runs the inner
/// solve to convergence from `flow_guess` — deliberately never warm-started
/// from a previous outer iterate, since warm-starting can change which root
/// the inner solve lands on.
pub struct ComplianceProblem {
    pub params: CircuitParams,
    /// Target systemic arterial pressure
    pub p_sa_target: f64,
    /// Fixed starting point for every inner flow solve
    pub flow_guess: FlowState,
    /// Newton configuration for the inner flow solves
    pub flow_config: NewtonConfig,
    // Residual evaluations run concurrently during Jacobian columns, so the
    // inner-failure count needs interior mutability that is Sync.
    inner_failures: AtomicUsize,
}

/// Solved compliance vector with diagnostics from both solve levels.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComplianceSolution {
    pub compliances: Compliances,
    /// Fresh inner solve at the solved compliances
    pub flow: FlowSolution,
    /// Outer residual norm at the returned point
    pub residual_norm: f64,
    /// Outer Newton iterations used
    pub iterations: usize,
    /// Requires both the outer solve and the final inner solve to converge
    pub converged: bool,
    /// Inner solves that failed to converge during outer residual evaluations
    pub inner_failures: usize,
}

impl ComplianceProblem {
    pub fn new(params: CircuitParams, p_sa_target: f64) -> Self {
        Self {
            params,
            p_sa_target,
            flow_guess: FlowState::initial_guess(),
            flow_config: NewtonConfig::default(),
            inner_failures: AtomicUsize::new(0),
        }
    }

    /// The five outer residuals at a candidate compliance vector.
    ///
    /// Runs the inner flow solve at the candidate point, then evaluates the
    /// pressure target plus the consistency equations that structurally
    /// involve the compliances, re-stated at the inner solve's returned
    /// state. The purely flow/resistance equations are trusted to the inner
    /// solve and not repeated here.
    pub fn residuals(&self, c: &Compliances) -> ModelResult<DVector<f64>> {
        Ok(self.residual_vec(&c.to_vector())?)
    }

    fn residual_vec(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let compliances = Compliances::from_vector(x);
        let flow_problem = FlowProblem::new(self.params, compliances);

        let inner = solve_system(
            self.flow_guess.to_vector(),
            |z| flow_problem.residual_vec(z),
            &self.flow_config,
        )?;
        if !inner.converged {
            // Fold the best-effort point in anyway; the outer iteration may
            // step away from the bad region. The count surfaces in the
            // final solution.
            self.inner_failures.fetch_add(1, Ordering::Relaxed);
            debug!(
                residual = inner.residual_norm,
                "inner flow solve did not converge during outer residual evaluation"
            );
        }
        let s = FlowState::from_vector(&inner.x);

        let p = &self.params;
        let c = &compliances;
        Ok(DVector::from_column_slice(&[
            s.p_sa - self.p_sa_target,
            c.c_d * s.p_pv - c.c_s * s.p_sa - s.q_v / p.hr,
            c.c_sa * s.p_sa + c.c_pv * s.p_pv + c.c_pa * s.p_pa - 1.0,
            s.q_p - s.q_v,
            p.pvr * s.q_p - (s.p_pa - s.p_pv),
        ]))
    }

    /// Solve for the compliances from `guess` (or the standard starting point).
    pub fn solve(
        &self,
        guess: Option<Compliances>,
        config: &NewtonConfig,
    ) -> ModelResult<ComplianceSolution> {
        let x0 = guess.unwrap_or_else(Compliances::initial_guess).to_vector();
        self.inner_failures.store(0, Ordering::Relaxed);

        let outer = solve_system(x0, |x| self.residual_vec(x), config)?;
        let compliances = Compliances::from_vector(&outer.x);

        // Fresh inner solve at the solved point; its convergence gates the
        // overall flag so an unconverged inner state is never presented as a
        // valid solution.
        let flow = FlowProblem::new(self.params, compliances)
            .solve(Some(self.flow_guess), &self.flow_config)?;

        let converged = outer.converged && flow.converged;
        if !converged {
            warn!(
                outer_converged = outer.converged,
                inner_converged = flow.converged,
                residual = outer.residual_norm,
                "compliance solve did not converge"
            );
        }

        Ok(ComplianceSolution {
            compliances,
            flow,
            residual_norm: outer.residual_norm,
            iterations: outer.iterations,
            converged,
            inner_failures: self.inner_failures.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residual_matches_target_equation() {
        // At the standard guess the first residual is P_sa - target by
        // construction, whatever the inner solve returns for P_sa.
        let problem = ComplianceProblem::new(CircuitParams::new(60.0, 40.0, 10.0, 150.0), 75.0);
        let r = problem.residuals(&Compliances::initial_guess()).unwrap();
        assert_eq!(r.len(), 5);

        let flow = FlowProblem::new(problem.params, Compliances::initial_guess())
            .solve(Some(problem.flow_guess), &problem.flow_config)
            .unwrap();
        assert!((r[0] - (flow.state.p_sa - 75.0)).abs() < 1e-9);
    }

    #[test]
    fn inner_guess_is_overridable() {
        let mut problem =
            ComplianceProblem::new(CircuitParams::new(60.0, 40.0, 10.0, 150.0), 75.0);
        problem.flow_guess = FlowState {
            p_sa: 80.0,
            ..FlowState::initial_guess()
        };

        // The inner system has a unique root for these compliances, so a
        // nearby starting point must not change the residual materially.
        let r_moved = problem.residuals(&Compliances::initial_guess()).unwrap();
        let reference = ComplianceProblem::new(problem.params, 75.0);
        let r_std = reference.residuals(&Compliances::initial_guess()).unwrap();
        for i in 0..5 {
            assert!((r_moved[i] - r_std[i]).abs() < 1e-5);
        }
    }
}
