// adjust.rs - Bring a lattice's A fraction to a target with single-cell flips

use crate::config::{RunConfig, Verbosity};
use crate::error::{BudgetExhausted, CvmError, Result};
use crate::lattice::{Lattice, A, B};
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct AdjustParams {
    pub target_fraction: f64,
    pub max_difference:  f64,
    pub max_steps:       usize,
    pub verbosity:       Verbosity,
}

impl AdjustParams {
    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            target_fraction: cfg.x1_target,
            max_difference:  cfg.max_x_difference,
            max_steps:       cfg.adjust_max_steps,
            verbosity:       cfg.verbosity,
        }
    }
}

/// Result of an adjustment run; `shortfall` is set when the step budget ran
/// out before the fraction came within tolerance.
#[derive(Debug, Clone)]
pub struct AdjustOutcome {
    pub lattice:   Lattice,
    pub steps:     usize,
    pub flips:     usize,
    pub fraction:  f64,
    pub shortfall: Option<BudgetExhausted>,
}

impl AdjustOutcome {
    pub fn within_tolerance(&self) -> bool {
        self.shortfall.is_none()
    }
}

/// Flip randomly chosen cells toward the target A fraction.
///
/// Each step draws one cell uniformly; if x1 is too high and the cell is A
/// it becomes B, if x1 is too low and the cell is B it becomes A, otherwise
/// the step is a no-op. Stops once |x1 − target| ≤ max_difference or after
/// `max_steps` attempts.
pub fn adjust_to_target_fraction(
    mut lattice: Lattice,
    params: &AdjustParams,
    rng: &mut impl Rng,
) -> Result<AdjustOutcome> {
    let target = params.target_fraction;
    if !(target > 0.0 && target < 1.0) {
        return Err(CvmError::invalid(format!(
            "target fraction must lie in (0, 1), got {target}"
        )));
    }

    let mut fraction = lattice.fraction_a();
    let start = fraction;
    let mut steps = 0;
    let mut flips = 0;

    while (fraction - target).abs() > params.max_difference && steps < params.max_steps {
        let row = rng.gen_range(0..lattice.layers());
        let col = rng.gen_range(0..lattice.columns());
        let wanted = if fraction > target { A } else { B };

        if lattice.get(row, col) == wanted {
            lattice.flip(row, col);
            flips += 1;
            if params.verbosity.detailed() {
                log::debug!("adjust step {steps}: flipped ({row}, {col}) to {}", A - wanted);
            }
        }
        steps += 1;
        fraction = lattice.fraction_a();
    }

    let shortfall = ((fraction - target).abs() > params.max_difference).then_some(BudgetExhausted {
        budget: params.max_steps,
        what: "adjusting the A fraction",
    });

    if let Some(s) = &shortfall {
        if params.verbosity.summary() {
            log::warn!("{s}: x1 = {fraction:.4}, target {target:.4} ± {}", params.max_difference);
        }
    } else if params.verbosity.summary() {
        log::info!("adjusted x1 {start:.4} -> {fraction:.4} in {steps} steps ({flips} flips)");
    }

    Ok(AdjustOutcome { lattice, steps, flips, fraction, shortfall })
}
