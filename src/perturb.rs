// perturb.rs - Random Bernoulli flips of an equilibrated lattice

use crate::config::Verbosity;
use crate::error::{CvmError, Result};
use crate::lattice::Lattice;
use rand::Rng;
use rand_distr::Bernoulli;

#[derive(Debug, Clone)]
pub struct PerturbOutcome {
    pub lattice:        Lattice,
    pub flips:          usize,
    /// ⌊flip_fraction × N⌋
    pub expected_flips: usize,
}

/// Flip every cell independently with probability `flip_fraction`.
///
/// The input is left untouched; the returned lattice is a fresh copy. The A
/// count is not preserved.
pub fn perturb(
    lattice: &Lattice,
    flip_fraction: f64,
    verbosity: Verbosity,
    rng: &mut impl Rng,
) -> Result<PerturbOutcome> {
    let coin = Bernoulli::new(flip_fraction).map_err(|_| {
        CvmError::invalid(format!("flip fraction must lie in [0, 1], got {flip_fraction}"))
    })?;

    let mut perturbed = lattice.clone();
    let mut flips = 0;
    for i in 0..perturbed.layers() {
        for j in 0..perturbed.columns() {
            if rng.sample(coin) {
                perturbed.flip(i, j);
                flips += 1;
            }
        }
    }

    let expected_flips = (flip_fraction * lattice.n_cells() as f64) as usize;
    if verbosity.summary() {
        log::info!("perturbation flipped {flips} cells (expected {expected_flips})");
    }

    Ok(PerturbOutcome { lattice: perturbed, flips, expected_flips })
}
