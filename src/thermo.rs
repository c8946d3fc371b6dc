// thermo.rs - Entropy, enthalpy and free energy from configuration variables

use crate::config_vars::{ConfigurationVariables, NormalizedVariables};
use crate::error::{CvmError, Result};

/// Lf(v) = v ln v − v, defined for v > 0.
#[inline(always)]
pub fn lf(v: f64) -> f64 {
    v * v.ln() - v
}

/// Interaction energy ε1 = 4 ln h.
pub fn epsilon1(h: f64) -> Result<f64> {
    if !(h > 0.0) || !h.is_finite() {
        return Err(CvmError::numeric(format!("ln(h) undefined for h = {h}")));
    }
    Ok(4.0 * h.ln())
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThermodynamicSummary {
    pub neg_entropy: f64,
    pub enthalpy0:   f64,
    pub enthalpy1:   f64,
    pub free_energy: f64,
}

/// Negative entropy of a set of normalised variables,
/// −(2 Lfy + Lfw − Lfx − 2 Lfz).
///
/// Every variable must be strictly positive.
pub fn neg_entropy(v: &NormalizedVariables) -> Result<f64> {
    if let Some((name, val)) = v.entries().into_iter().find(|&(_, val)| !(val > 0.0)) {
        return Err(CvmError::numeric(format!(
            "Lf undefined: {name} = {val} (some pattern never occurs)"
        )));
    }
    let lfx = lf(v.x1) + lf(v.x2);
    let lfy = lf(v.y1) + 2.0 * lf(v.y2) + lf(v.y3);
    let lfw = lf(v.w1) + 2.0 * lf(v.w2) + lf(v.w3);
    let lfz = lf(v.z1) + 2.0 * lf(v.z2) + lf(v.z3) + lf(v.z4) + 2.0 * lf(v.z5) + lf(v.z6);
    Ok(-(2.0 * lfy + lfw - lfx - 2.0 * lfz))
}

/// Thermodynamic summary for normalised variables at interaction parameter `h`.
pub fn evaluate_normalized(h: f64, v: &NormalizedVariables) -> Result<ThermodynamicSummary> {
    let eps1 = epsilon1(h)?;
    let neg_entropy = neg_entropy(v)?;
    // single-unit term switched off
    let enthalpy0 = 0.0;
    let enthalpy1 = eps1 * (2.0 * v.y2 - v.y1 - v.y3);
    Ok(ThermodynamicSummary {
        neg_entropy,
        enthalpy0,
        enthalpy1,
        free_energy: enthalpy0 + enthalpy1 + neg_entropy,
    })
}

/// Thermodynamic summary for raw counts at interaction parameter `h`.
pub fn evaluate(h: f64, config_vars: &ConfigurationVariables) -> Result<ThermodynamicSummary> {
    evaluate_normalized(h, &config_vars.normalized())
}
