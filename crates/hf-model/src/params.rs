//! Fixed circuit parameters.

/// Fixed resistances and heart rate for one run.
///
/// All values are expected to be strictly positive in normalized
/// physiological units (pressure drop per unit flow for the resistances,
/// beats per minute for the heart rate). The solves do not validate this:
/// non-positive values are a known limitation and show up as a failed or
/// non-physical solve, not as an upfront error.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CircuitParams {
    /// Upper-body vascular resistance
    pub uvr: f64,
    /// Lower-body vascular resistance
    pub lvr: f64,
    /// Pulmonary vascular resistance
    pub pvr: f64,
    /// Heart rate
    pub hr: f64,
}

impl CircuitParams {
    pub fn new(uvr: f64, lvr: f64, pvr: f64, hr: f64) -> Self {
        Self { uvr, lvr, pvr, hr }
    }
}
