//! Closed-form reference values for the configuration variables.
//!
//! `equiprobable` is the equilibrium solution of the 2-D zigzag CVM for
//! x1 = x2 = 0.5 as a function of h. `random_mixing` is the uncorrelated
//! state for a given x1, where every pair and triplet probability is a
//! product of unit fractions.

use crate::config_vars::NormalizedVariables;
use crate::error::{CvmError, Result};
use crate::thermo::neg_entropy;

/// Equilibrium variables at x1 = 0.5 for interaction parameter `h`.
pub fn equiprobable(h: f64) -> Result<NormalizedVariables> {
    if !(h > 0.0) || !h.is_finite() {
        return Err(CvmError::numeric(format!("h must be positive, got {h}")));
    }
    let h2 = h * h;
    let denom = 8.0 * (h2 * h2 - 6.0 * h2 + 1.0);
    if denom.abs() < 1e-12 || (h2 - 3.0).abs() < 1e-12 {
        return Err(CvmError::numeric(format!("analytic solution singular at h = {h}")));
    }

    let z3 = (h2 - 3.0) * (h2 + 1.0) / denom;
    let s = (1.0 - 3.0 * h2) / (h2 - 3.0);
    let z1 = s * z3;
    let z2 = (0.5 - z1 - z3) / 2.0;
    let (z4, z5, z6) = (z3, z2, z1);

    let y1 = z1 + z2;
    let y3 = z5 + z6;
    let y2 = (1.0 - 2.0 * z1 + 2.0 * z3) / 4.0;

    let w1 = z1 + z3;
    let w3 = z6 + z4;
    let w2 = (1.0 - w1 - w3) / 2.0;

    Ok(NormalizedVariables {
        x1: 0.5, x2: 0.5,
        y1, y2, y3,
        w1, w2, w3,
        z1, z2, z3, z4, z5, z6,
    })
}

/// Uncorrelated variables for a unit fraction `x1`.
pub fn random_mixing(x1: f64) -> Result<NormalizedVariables> {
    if !(x1 > 0.0 && x1 < 1.0) {
        return Err(CvmError::invalid(format!("x1 must lie in (0, 1), got {x1}")));
    }
    let x2 = 1.0 - x1;
    Ok(NormalizedVariables {
        x1, x2,
        y1: x1 * x1, y2: x1 * x2, y3: x2 * x2,
        w1: x1 * x1, w2: x1 * x2, w3: x2 * x2,
        z1: x1 * x1 * x1,
        z2: x1 * x1 * x2,
        z3: x1 * x2 * x1,
        z4: x2 * x1 * x2,
        z5: x2 * x2 * x1,
        z6: x2 * x2 * x2,
    })
}

/// Negative entropy of the uncorrelated state at `x1`.
pub fn random_mixing_neg_entropy(x1: f64) -> Result<f64> {
    neg_entropy(&random_mixing(x1)?)
}
