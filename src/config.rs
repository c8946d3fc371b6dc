// config.rs - Run parameters for the zigzag CVM experiments

use crate::error::{CvmError, Result};

/// How much a component reports about its own progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum Verbosity {
    /// No component logging at all
    Quiet,
    /// Start/end summaries and budget shortfalls
    #[default]
    Summary,
    /// Per-step and per-trial detail at debug level
    Detailed,
}

impl Verbosity {
    #[inline(always)]
    pub fn summary(self) -> bool {
        self >= Verbosity::Summary
    }

    #[inline(always)]
    pub fn detailed(self) -> bool {
        self >= Verbosity::Detailed
    }
}

/// Run-time configuration (single source of truth).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub layers:               usize,
    pub columns:              usize,
    pub x1_target:            f64,
    pub max_x_difference:     f64,
    pub adjust_max_steps:     usize,
    pub h:                    f64,
    pub total_trials:         usize,
    pub max_candidate_search: usize,
    pub perturb_fraction:     f64,
    /// 0 means "seed from entropy"
    pub seed:                 u64,
    pub verbosity:            Verbosity,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            layers:               16,
            columns:              16,
            x1_target:            0.35,
            max_x_difference:     0.01,
            adjust_max_steps:     200,
            h:                    1.4,
            total_trials:         200,
            max_candidate_search: 30,
            perturb_fraction:     0.1,
            seed:                 0,
            verbosity:            Verbosity::Summary,
        }
    }
}

impl RunConfig {
    /// Reject parameter combinations the core cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.layers < 2 || self.layers % 2 != 0 {
            return Err(CvmError::invalid(format!(
                "layer count must be even and at least 2, got {}",
                self.layers
            )));
        }
        if self.columns < 2 {
            return Err(CvmError::invalid(format!(
                "column count must be at least 2, got {}",
                self.columns
            )));
        }
        if !(self.x1_target > 0.0 && self.x1_target < 1.0) {
            return Err(CvmError::invalid(format!(
                "x1 target must lie in (0, 1), got {}",
                self.x1_target
            )));
        }
        if !(self.max_x_difference >= 0.0) {
            return Err(CvmError::invalid(format!(
                "max x difference must be non-negative, got {}",
                self.max_x_difference
            )));
        }
        if !(self.h > 0.0) || !self.h.is_finite() {
            return Err(CvmError::invalid(format!("h must be positive, got {}", self.h)));
        }
        if !(0.0..=1.0).contains(&self.perturb_fraction) {
            return Err(CvmError::invalid(format!(
                "perturbation fraction must lie in [0, 1], got {}",
                self.perturb_fraction
            )));
        }
        Ok(())
    }

    /// Total number of cells N = L × M.
    pub fn n_cells(&self) -> usize {
        self.layers * self.columns
    }
}
