//! Ensemble averages over independent replicas and the (x1, h) parameter scan.

use crate::analytic::random_mixing_neg_entropy;
use crate::config::RunConfig;
use crate::config_vars::NormalizedVariables;
use crate::error::Result;
use crate::experiment::equilibrate;
use crate::utils::rng::task_rng;
use indicatif::ProgressBar;
use rayon::prelude::*;

/// Welford online stats.
#[derive(Debug, Default, Clone, Copy)]
pub struct OnlineStats {
    n:    u64,
    mean: f64,
    m2:   f64,
}

impl OnlineStats {
    pub fn push(&mut self, x: f64) {
        self.n += 1;
        let delta  = x - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = x - self.mean;
        self.m2   += delta * delta2;
    }
    pub fn count(&self) -> u64 { self.n }
    pub fn mean(&self) -> f64 { self.mean }
    pub fn var(&self)  -> f64 { if self.n > 1 { self.m2 / (self.n - 1) as f64 } else { 0.0 } }
    pub fn std(&self)  -> f64 { self.var().sqrt() }
}

/// One (x1 target, h) grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub x1_target: f64,
    pub h:         f64,
}

/// Replica-averaged results for one grid point.
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub point:           SweepPoint,
    pub replicas:        usize,
    pub failed_replicas: usize,
    /// Mean normalised variables; `None` when no replica could be evaluated
    pub variables:       Option<NormalizedVariables>,
    pub neg_entropy:     OnlineStats,
    pub enthalpy1:       OnlineStats,
    pub free_energy:     OnlineStats,
    pub accepted_swaps:  OnlineStats,
    /// Negative entropy of the uncorrelated state at the target x1
    pub random_mixing_neg_entropy: f64,
    pub effective_h:     Option<f64>,
}

#[derive(Default)]
struct VariableStats([OnlineStats; 14]);

impl VariableStats {
    fn push(&mut self, v: &NormalizedVariables) {
        for (stat, (_, val)) in self.0.iter_mut().zip(v.entries()) {
            stat.push(val);
        }
    }

    fn means(&self) -> NormalizedVariables {
        let m: Vec<f64> = self.0.iter().map(|s| s.mean()).collect();
        NormalizedVariables {
            x1: m[0], x2: m[1],
            y1: m[2], y2: m[3], y3: m[4],
            w1: m[5], w2: m[6], w3: m[7],
            z1: m[8], z2: m[9], z3: m[10], z4: m[11], z5: m[12], z6: m[13],
        }
    }
}

/// Average `replicas` independently equilibrated lattices at one grid point.
///
/// Replicas run serially from per-replica streams derived from
/// `(master_seed, point_id)`, so the result does not depend on scheduling.
/// A replica that cannot be evaluated is skipped and counted; if none
/// succeed the row carries no variables and empty statistics.
pub fn run_point(
    base: &RunConfig,
    point: SweepPoint,
    replicas: usize,
    master_seed: u64,
    point_id: usize,
) -> Result<SweepRow> {
    let cfg = RunConfig { x1_target: point.x1_target, h: point.h, ..base.clone() };
    cfg.validate()?;

    let mut vars = VariableStats::default();
    let mut neg_entropy = OnlineStats::default();
    let mut enthalpy1 = OnlineStats::default();
    let mut free_energy = OnlineStats::default();
    let mut accepted_swaps = OnlineStats::default();
    let mut failed_replicas = 0;

    for rep in 0..replicas {
        let mut rng = task_rng(master_seed ^ ((point_id as u64) << 32), rep);
        match equilibrate(&cfg, &mut rng) {
            Ok((_, run)) => {
                vars.push(&run.variables);
                neg_entropy.push(run.summary.neg_entropy);
                enthalpy1.push(run.summary.enthalpy1);
                free_energy.push(run.summary.free_energy);
                accepted_swaps.push(run.accepted as f64);
            }
            Err(e) => {
                failed_replicas += 1;
                if cfg.verbosity.summary() {
                    log::warn!(
                        "x1 = {}, h = {}: replica {rep} skipped, {e}",
                        point.x1_target, point.h
                    );
                }
            }
        }
    }

    let variables = (failed_replicas < replicas).then(|| vars.means());
    if variables.is_none() && cfg.verbosity.summary() {
        log::warn!(
            "x1 = {}, h = {}: no replica could be evaluated",
            point.x1_target, point.h
        );
    }
    Ok(SweepRow {
        point,
        replicas,
        failed_replicas,
        variables,
        neg_entropy,
        enthalpy1,
        free_energy,
        accepted_swaps,
        random_mixing_neg_entropy: random_mixing_neg_entropy(point.x1_target)?,
        effective_h: variables.and_then(|v| v.effective_h()),
    })
}

/// Cartesian grid of x1 targets and h values.
pub fn grid(x1_targets: &[f64], h_values: &[f64]) -> Vec<SweepPoint> {
    x1_targets
        .iter()
        .flat_map(|&x1_target| h_values.iter().map(move |&h| SweepPoint { x1_target, h }))
        .collect()
}

/// Evaluate every grid point in parallel; rows come back sorted by (x1, h).
pub fn run_sweep(
    base: &RunConfig,
    points: &[SweepPoint],
    replicas: usize,
    master_seed: u64,
    progress: &ProgressBar,
) -> Result<Vec<SweepRow>> {
    let mut rows = points
        .par_iter()
        .enumerate()
        .map(|(id, &point)| {
            let row = run_point(base, point, replicas, master_seed, id);
            progress.inc(1);
            row
        })
        .collect::<Result<Vec<_>>>()?;

    rows.sort_by(|a, b| {
        a.point.x1_target.total_cmp(&b.point.x1_target)
            .then(a.point.h.total_cmp(&b.point.h))
    });
    Ok(rows)
}
