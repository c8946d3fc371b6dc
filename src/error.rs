//! Error types for the zigzag CVM core.

use thiserror::Error;

/// Unified error type for lattice construction, evaluation and the run driver.
#[derive(Error, Debug)]
pub enum CvmError {
    /// Bad dimensions, out-of-range parameters or a uniform lattice
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// ln(≤0) or Lf(0) would be evaluated
    #[error("Numeric domain error: {0}")]
    NumericDomain(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CvmError {
    /// Creates an invalid-configuration error.
    pub fn invalid(message: impl Into<String>) -> Self {
        CvmError::InvalidConfiguration(message.into())
    }

    /// Creates a numeric-domain error.
    pub fn numeric(message: impl Into<String>) -> Self {
        CvmError::NumericDomain(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CvmError>;

/// Soft failure: a bounded loop ran out of budget before reaching its goal.
///
/// Returned inside outcomes and logged, never propagated as an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("budget of {budget} exhausted while {what}")]
pub struct BudgetExhausted {
    pub budget: usize,
    pub what: &'static str,
}
