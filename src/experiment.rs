//! Perturbation experiment: equilibrate a random lattice, perturb it, and
//! let it relax again, recording what changed at each stage.

use crate::adjust::{adjust_to_target_fraction, AdjustOutcome, AdjustParams};
use crate::config::RunConfig;
use crate::config_vars::{count_config_vars, NormalizedVariables};
use crate::error::Result;
use crate::lattice::{Lattice, LatticeDiff};
use crate::minimize::{minimize_free_energy, MinimizationRun, MinimizeParams};
use crate::perturb::perturb;
use crate::thermo::{evaluate, ThermodynamicSummary};
use rand::Rng;

/// A lattice snapshot with its variables and thermodynamics.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub lattice:   Lattice,
    pub variables: NormalizedVariables,
    pub summary:   ThermodynamicSummary,
}

impl Snapshot {
    pub fn of(lattice: Lattice, h: f64) -> Result<Self> {
        let cv = count_config_vars(&lattice);
        let summary = evaluate(h, &cv)?;
        Ok(Self { lattice, variables: cv.normalized(), summary })
    }
}

#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub adjust:          AdjustOutcome,
    pub equilibration:   MinimizationRun,
    pub equilibrated:    Snapshot,
    pub perturbed:       Snapshot,
    pub flips:           usize,
    pub expected_flips:  usize,
    pub relaxation:      MinimizationRun,
    pub reequilibrated:  Snapshot,
    /// equilibrated vs perturbed
    pub perturbation_diff: LatticeDiff,
    /// perturbed vs re-equilibrated
    pub relaxation_diff:   LatticeDiff,
    /// equilibrated vs re-equilibrated
    pub net_diff:          LatticeDiff,
}

/// Random lattice → adjusted to x1 target → minimized, the common start of
/// every experiment and sweep replica.
pub fn equilibrate(cfg: &RunConfig, rng: &mut impl Rng) -> Result<(AdjustOutcome, MinimizationRun)> {
    cfg.validate()?;
    let fresh = Lattice::random_with(rng, cfg.layers, cfg.columns, cfg.x1_target)?;
    let adjusted = adjust_to_target_fraction(fresh, &AdjustParams::from_config(cfg), rng)?;
    let run = minimize_free_energy(
        adjusted.lattice.clone(),
        &MinimizeParams::from_config(cfg),
        rng,
    )?;
    Ok((adjusted, run))
}

pub fn run_experiment(cfg: &RunConfig, rng: &mut impl Rng) -> Result<ExperimentReport> {
    let (adjust, equilibration) = equilibrate(cfg, rng)?;
    let equilibrated = Snapshot::of(equilibration.lattice.clone(), cfg.h)?;
    if cfg.verbosity.summary() {
        log::info!(
            "equilibrium: x1 = {:.4}, F = {:.6}",
            equilibrated.variables.x1, equilibrated.summary.free_energy
        );
    }

    let kicked = perturb(&equilibrated.lattice, cfg.perturb_fraction, cfg.verbosity, rng)?;
    let perturbed = Snapshot::of(kicked.lattice, cfg.h)?;

    let relaxation = minimize_free_energy(
        perturbed.lattice.clone(),
        &MinimizeParams::from_config(cfg),
        rng,
    )?;
    let reequilibrated = Snapshot::of(relaxation.lattice.clone(), cfg.h)?;

    let perturbation_diff = equilibrated.lattice.diff(&perturbed.lattice)?;
    let relaxation_diff = perturbed.lattice.diff(&reequilibrated.lattice)?;
    let net_diff = equilibrated.lattice.diff(&reequilibrated.lattice)?;

    if cfg.verbosity.summary() {
        log::info!(
            "after re-equilibration: F = {:.6}; {} cells differ from the first equilibrium",
            reequilibrated.summary.free_energy, net_diff.total
        );
    }

    Ok(ExperimentReport {
        adjust,
        equilibration,
        equilibrated,
        perturbed,
        flips: kicked.flips,
        expected_flips: kicked.expected_flips,
        relaxation,
        reequilibrated,
        perturbation_diff,
        relaxation_diff,
        net_diff,
    })
}
