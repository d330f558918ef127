use crate::HfError;

/// Floating point type used throughout the system.
pub type Real = f64;

/// Absolute + relative tolerance pair for comparing converged values.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-6,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HfError::NonFinite { what, value: v })
    }
}

/// Checks a whole slice; reports the first non-finite entry.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), HfError> {
    for &v in values {
        ensure_finite(v, what)?;
    }
    Ok(())
}
