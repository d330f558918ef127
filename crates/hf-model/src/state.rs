//! State vectors for the two solves: flows/pressures and compliances.

use nalgebra::DVector;

/// Cycle-averaged circulatory state: four flows and three pressures.
///
/// Packing order into a solver vector is fixed:
/// `[q_v, q_u, q_l, q_p, p_sa, p_pa, p_pv]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlowState {
    /// Venous return flow
    pub q_v: f64,
    /// Upper-body flow
    pub q_u: f64,
    /// Lower-body flow
    pub q_l: f64,
    /// Pulmonary flow
    pub q_p: f64,
    /// Systemic arterial pressure
    pub p_sa: f64,
    /// Pulmonary arterial pressure
    pub p_pa: f64,
    /// Pulmonary venous pressure
    pub p_pv: f64,
}

impl FlowState {
    /// Standard starting point for the flow solve.
    pub fn initial_guess() -> Self {
        Self {
            q_v: 3.1,
            q_u: 1.5,
            q_l: 1.5,
            q_p: 3.2,
            p_sa: 75.0,
            p_pa: 26.0,
            p_pv: 2.0,
        }
    }

    /// True when every flow and pressure is finite and strictly positive.
    ///
    /// A converged root with a negative flow or pressure is mathematically
    /// valid but physiologically meaningless; callers use this to tell the
    /// two apart.
    pub fn is_physical(&self) -> bool {
        self.to_vector().iter().all(|&v| v.is_finite() && v > 0.0)
    }

    pub(crate) fn to_vector(self) -> DVector<f64> {
        DVector::from_column_slice(&[
            self.q_v, self.q_u, self.q_l, self.q_p, self.p_sa, self.p_pa, self.p_pv,
        ])
    }

    pub(crate) fn from_vector(x: &DVector<f64>) -> Self {
        Self {
            q_v: x[0],
            q_u: x[1],
            q_l: x[2],
            q_p: x[3],
            p_sa: x[4],
            p_pa: x[5],
            p_pv: x[6],
        }
    }
}

/// Compliance vector: the unknowns of the outer solve.
///
/// Packing order: `[c_d, c_s, c_sa, c_pv, c_pa]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Compliances {
    /// Diastolic ventricular compliance
    pub c_d: f64,
    /// Systolic ventricular compliance
    pub c_s: f64,
    /// Systemic arterial compliance
    pub c_sa: f64,
    /// Pulmonary venous compliance
    pub c_pv: f64,
    /// Pulmonary arterial compliance
    pub c_pa: f64,
}

impl Compliances {
    /// Standard starting point for the compliance solve.
    ///
    /// The arterial compliances are seeded so the elastance closure
    /// C_sa*P_sa + C_pv*P_pv + C_pa*P_pa = 1 roughly holds at the nominal
    /// pressures of the flow guess.
    pub fn initial_guess() -> Self {
        Self {
            c_d: 0.02,
            c_s: 0.0001,
            c_sa: 1.0 / 135.0,
            c_pv: 30.0 / 135.0,
            c_pa: 2.0 / 135.0,
        }
    }

    /// True when every compliance is finite and strictly positive.
    pub fn is_physical(&self) -> bool {
        self.to_vector().iter().all(|&v| v.is_finite() && v > 0.0)
    }

    pub(crate) fn to_vector(self) -> DVector<f64> {
        DVector::from_column_slice(&[self.c_d, self.c_s, self.c_sa, self.c_pv, self.c_pa])
    }

    pub(crate) fn from_vector(x: &DVector<f64>) -> Self {
        Self {
            c_d: x[0],
            c_s: x[1],
            c_sa: x[2],
            c_pv: x[3],
            c_pa: x[4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_state_round_trips_through_vector() {
        let state = FlowState::initial_guess();
        let back = FlowState::from_vector(&state.to_vector());
        assert_eq!(state, back);
    }

    #[test]
    fn compliances_round_trip_through_vector() {
        let c = Compliances::initial_guess();
        let back = Compliances::from_vector(&c.to_vector());
        assert_eq!(c, back);
    }

    #[test]
    fn negative_compliance_is_not_physical() {
        let mut c = Compliances::initial_guess();
        assert!(c.is_physical());
        c.c_s = -1e-4;
        assert!(!c.is_physical());
    }

    #[test]
    fn nan_pressure_is_not_physical() {
        let mut state = FlowState::initial_guess();
        assert!(state.is_physical());
        state.p_pv = f64::NAN;
        assert!(!state.is_physical());
    }
}
