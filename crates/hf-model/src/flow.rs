//! Inner solve: cycle-averaged flows and pressures for fixed compliances.

use crate::error::ModelResult;
use crate::params::CircuitParams;
use crate::state::{Compliances, FlowState};
use hf_solver::{NewtonConfig, SolverResult, solve_system};
use nalgebra::DVector;

/// Forward flow problem: fixed resistances, heart rate, and compliances.
#[derive(Clone, Copy, Debug)]
pub struct FlowProblem {
    pub params: CircuitParams,
    pub compliances: Compliances,
}

/// Converged (or best-effort) circulatory state with solver diagnostics.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlowSolution {
    pub state: FlowState,
    /// Residual norm at the returned point
    pub residual_norm: f64,
    /// Newton iterations used
    pub iterations: usize,
    /// False means `state` is a best-effort point, not a root
    pub converged: bool,
}

impl FlowProblem {
    pub fn new(params: CircuitParams, compliances: Compliances) -> Self {
        Self {
            params,
            compliances,
        }
    }

    /// The seven balance laws of the circuit, as residuals.
    ///
    /// All zero at a steady-state root:
    /// 1. stroke-volume relation: Q_v = HR * (C_d*P_pv - C_s*P_sa)
    /// 2. systemic continuity: Q_u + Q_l = Q_v
    /// 3. closed-loop continuity: Q_p = Q_v
    /// 4. pulmonary pressure drop: PVR*Q_p = P_pa - P_pv
    /// 5. upper-body pressure drop: UVR*Q_u = P_sa - P_pa
    /// 6. lower-body pressure drop: LVR*Q_l = P_sa - P_pa
    /// 7. elastance closure: C_sa*P_sa + C_pv*P_pv + C_pa*P_pa = 1
    pub fn residuals(&self, s: &FlowState) -> DVector<f64> {
        let p = &self.params;
        let c = &self.compliances;

        DVector::from_column_slice(&[
            s.q_v - p.hr * (c.c_d * s.p_pv - c.c_s * s.p_sa),
            s.q_u + s.q_l - s.q_v,
            s.q_p - s.q_v,
            p.pvr * s.q_p - (s.p_pa - s.p_pv),
            p.uvr * s.q_u - (s.p_sa - s.p_pa),
            p.lvr * s.q_l - (s.p_sa - s.p_pa),
            1.0 - (c.c_sa * s.p_sa + c.c_pv * s.p_pv + c.c_pa * s.p_pa),
        ])
    }

    pub(crate) fn residual_vec(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        Ok(self.residuals(&FlowState::from_vector(x)))
    }

    /// Solve the flow system from `guess` (or the standard starting point).
    ///
    /// Non-convergence is reported through the solution's `converged` flag;
    /// `Err` is reserved for hard faults in the underlying solver.
    pub fn solve(
        &self,
        guess: Option<FlowState>,
        config: &NewtonConfig,
    ) -> ModelResult<FlowSolution> {
        let x0 = guess.unwrap_or_else(FlowState::initial_guess).to_vector();
        let result = solve_system(x0, |x| self.residual_vec(x), config)?;

        Ok(FlowSolution {
            state: FlowState::from_vector(&result.x),
            residual_norm: result.residual_norm,
            iterations: result.iterations,
            converged: result.converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> FlowProblem {
        FlowProblem::new(
            CircuitParams::new(60.0, 40.0, 10.0, 150.0),
            Compliances::initial_guess(),
        )
    }

    #[test]
    fn converges_from_standard_guess() {
        let problem = nominal();
        let solution = problem.solve(None, &NewtonConfig::default()).unwrap();

        assert!(solution.converged);
        assert!(solution.residual_norm < 1e-8);
    }

    #[test]
    fn residuals_vanish_at_solution() {
        let problem = nominal();
        let solution = problem.solve(None, &NewtonConfig::default()).unwrap();

        let r = problem.residuals(&solution.state);
        for i in 0..r.len() {
            assert!(
                r[i].abs() < 1e-6,
                "equation {} residual {} at converged state",
                i + 1,
                r[i]
            );
        }
    }

    #[test]
    fn solution_respects_continuity() {
        let problem = nominal();
        let s = problem.solve(None, &NewtonConfig::default()).unwrap().state;

        assert!((s.q_u + s.q_l - s.q_v).abs() < 1e-6);
        assert!((s.q_p - s.q_v).abs() < 1e-6);
    }
}
