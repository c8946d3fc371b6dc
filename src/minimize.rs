// minimize.rs - Free-energy descent by count-preserving A/B swaps

use crate::config::{RunConfig, Verbosity};
use crate::config_vars::{count_config_vars, NormalizedVariables};
use crate::error::{BudgetExhausted, Result};
use crate::lattice::{Lattice, A, B};
use crate::thermo::{evaluate, ThermodynamicSummary};
use crate::topology::Site;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct MinimizeParams {
    pub h:                    f64,
    pub total_trials:         usize,
    pub max_candidate_search: usize,
    pub verbosity:            Verbosity,
}

impl MinimizeParams {
    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            h:                    cfg.h,
            total_trials:         cfg.total_trials,
            max_candidate_search: cfg.max_candidate_search,
            verbosity:            cfg.verbosity,
        }
    }
}

/// How a single trial ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialOutcome {
    /// Swap committed; free energy strictly decreased
    Accepted,
    /// Swap evaluated and discarded
    Rejected,
    /// Rejection sampling found no A and/or no B cell within budget
    NoCandidate(BudgetExhausted),
}

/// Trajectory entry: the working lattice's state after trial `index`.
#[derive(Debug, Clone, Copy)]
pub struct TrialRecord {
    pub index:       usize,
    pub outcome:     TrialOutcome,
    /// Free energy of the proposed lattice, when one was evaluated
    pub candidate_free_energy: Option<f64>,
    pub x1:          f64,
    pub y2:          f64,
    pub z1:          f64,
    pub z3:          f64,
    pub neg_entropy: f64,
    pub enthalpy1:   f64,
    pub free_energy: f64,
}

#[derive(Debug, Clone)]
pub struct MinimizationRun {
    pub lattice:      Lattice,
    pub initial:      ThermodynamicSummary,
    pub summary:      ThermodynamicSummary,
    pub variables:    NormalizedVariables,
    pub trials:       Vec<TrialRecord>,
    pub accepted:     usize,
    pub rejected:     usize,
    pub no_candidate: usize,
}

impl MinimizationRun {
    /// Free energies of the accepted swaps, in order.
    pub fn accepted_free_energies(&self) -> Vec<f64> {
        self.trials
            .iter()
            .filter(|t| t.outcome == TrialOutcome::Accepted)
            .map(|t| t.free_energy)
            .collect()
    }
}

/// A proposed swap and its evaluation, alive only until the accept/reject decision.
#[derive(Debug)]
struct SearchTrial {
    off:       Site,
    on:        Site,
    candidate: Lattice,
}

enum Phase {
    SearchCandidates,
    ProposeSwap { off: Site, on: Site },
    Evaluate { trial: SearchTrial },
    AcceptOrReject {
        trial:     SearchTrial,
        evaluated: Option<(NormalizedVariables, ThermodynamicSummary)>,
    },
    Done(TrialOutcome),
}

/// Rejection-sample a cell holding `unit`, up to `max_search` draws.
fn find_candidate(
    lattice: &Lattice,
    unit: u8,
    max_search: usize,
    rng: &mut impl Rng,
) -> Option<Site> {
    (0..max_search).find_map(|_| {
        let row = rng.gen_range(0..lattice.layers());
        let col = rng.gen_range(0..lattice.columns());
        (lattice.get(row, col) == unit).then_some((row, col))
    })
}

/// Run `total_trials` swap trials, keeping each swap only if it strictly
/// lowers the free energy. The A count never changes.
pub fn minimize_free_energy(
    lattice: Lattice,
    params: &MinimizeParams,
    rng: &mut impl Rng,
) -> Result<MinimizationRun> {
    lattice.ensure_mixed()?;

    let mut working = lattice;
    let start_vars = count_config_vars(&working);
    let initial = evaluate(params.h, &start_vars)?;
    let mut variables = start_vars.normalized();
    let mut current = initial;

    let mut trials = Vec::with_capacity(params.total_trials);
    let (mut accepted, mut rejected, mut no_candidate) = (0, 0, 0);

    for index in 0..params.total_trials {
        let mut candidate_free_energy = None;
        let mut phase = Phase::SearchCandidates;

        let outcome = loop {
            phase = match phase {
                Phase::SearchCandidates => {
                    let off = find_candidate(&working, A, params.max_candidate_search, rng);
                    let on = find_candidate(&working, B, params.max_candidate_search, rng);
                    match (off, on) {
                        (Some(off), Some(on)) => Phase::ProposeSwap { off, on },
                        (off, _) => {
                            let what = if off.is_none() {
                                "searching for an A cell to switch off"
                            } else {
                                "searching for a B cell to switch on"
                            };
                            Phase::Done(TrialOutcome::NoCandidate(BudgetExhausted {
                                budget: params.max_candidate_search,
                                what,
                            }))
                        }
                    }
                }
                Phase::ProposeSwap { off, on } => {
                    let mut candidate = working.clone();
                    candidate.flip(off.0, off.1);
                    candidate.flip(on.0, on.1);
                    Phase::Evaluate { trial: SearchTrial { off, on, candidate } }
                }
                Phase::Evaluate { trial } => {
                    let cv = count_config_vars(&trial.candidate);
                    let evaluated = match evaluate(params.h, &cv) {
                        Ok(summary) => Some((cv.normalized(), summary)),
                        Err(e) => {
                            if params.verbosity.detailed() {
                                log::debug!("trial {index}: candidate rejected, {e}");
                            }
                            None
                        }
                    };
                    Phase::AcceptOrReject { trial, evaluated }
                }
                Phase::AcceptOrReject { trial, evaluated } => match evaluated {
                    Some((vars, summary)) => {
                        candidate_free_energy = Some(summary.free_energy);
                        if summary.free_energy < current.free_energy {
                            if params.verbosity.detailed() {
                                log::debug!(
                                    "trial {index}: swap {:?} off / {:?} on, F {:.6} -> {:.6}",
                                    trial.off, trial.on, current.free_energy, summary.free_energy
                                );
                            }
                            working = trial.candidate;
                            variables = vars;
                            current = summary;
                            Phase::Done(TrialOutcome::Accepted)
                        } else {
                            Phase::Done(TrialOutcome::Rejected)
                        }
                    }
                    None => Phase::Done(TrialOutcome::Rejected),
                },
                Phase::Done(outcome) => break outcome,
            };
        };

        match outcome {
            TrialOutcome::Accepted => accepted += 1,
            TrialOutcome::Rejected => rejected += 1,
            TrialOutcome::NoCandidate(shortfall) => {
                no_candidate += 1;
                if params.verbosity.summary() {
                    log::warn!("trial {index}: no candidate found, {shortfall}");
                }
            }
        }

        trials.push(TrialRecord {
            index,
            outcome,
            candidate_free_energy,
            x1: variables.x1,
            y2: variables.y2,
            z1: variables.z1,
            z3: variables.z3,
            neg_entropy: current.neg_entropy,
            enthalpy1: current.enthalpy1,
            free_energy: current.free_energy,
        });
    }

    if params.verbosity.summary() {
        log::info!(
            "minimized over {} trials: {accepted} accepted, {rejected} rejected, \
             {no_candidate} without candidates; F {:.6} -> {:.6}",
            params.total_trials, initial.free_energy, current.free_energy
        );
    }

    Ok(MinimizationRun {
        lattice: working,
        initial,
        summary: current,
        variables,
        trials,
        accepted,
        rejected,
        no_candidate,
    })
}
