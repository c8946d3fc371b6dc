use indicatif::ProgressBar;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use zigzag_cvm::config::{RunConfig, Verbosity};
use zigzag_cvm::error::CvmError;
use zigzag_cvm::experiment::{equilibrate, run_experiment};
use zigzag_cvm::sweep::{grid, run_point, run_sweep, OnlineStats, SweepPoint};

fn small_config() -> RunConfig {
    RunConfig {
        layers: 12,
        columns: 12,
        x1_target: 0.4,
        adjust_max_steps: 1000,
        h: 1.2,
        total_trials: 150,
        perturb_fraction: 0.1,
        seed: 99,
        verbosity: Verbosity::Quiet,
        ..RunConfig::default()
    }
}

#[test]
fn default_config_is_valid() {
    let cfg = RunConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.n_cells(), 256);
}

#[test]
fn invalid_configs_are_rejected() {
    let bad = [
        RunConfig { layers: 5, ..small_config() },
        RunConfig { columns: 1, ..small_config() },
        RunConfig { x1_target: 1.0, ..small_config() },
        RunConfig { h: 0.0, ..small_config() },
        RunConfig { perturb_fraction: 2.0, ..small_config() },
    ];
    for cfg in bad {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(matches!(
            run_experiment(&cfg, &mut rng),
            Err(CvmError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn equilibration_keeps_adjusted_composition() {
    let cfg = small_config();
    let mut rng = ChaCha20Rng::seed_from_u64(cfg.seed);
    let (adjust, run) = equilibrate(&cfg, &mut rng).unwrap();
    assert!(adjust.within_tolerance());
    assert_eq!(run.lattice.count_a(), adjust.lattice.count_a());
    assert!(run.summary.free_energy <= run.initial.free_energy);
}

#[test]
fn experiment_report_is_consistent() {
    let cfg = small_config();
    let mut rng = ChaCha20Rng::seed_from_u64(cfg.seed);
    let r = run_experiment(&cfg, &mut rng).unwrap();

    assert_eq!(r.equilibrated.lattice, r.equilibration.lattice);
    assert_eq!(r.equilibrated.summary, r.equilibration.summary);
    assert_eq!(r.perturbation_diff.total, r.flips);
    assert_eq!(r.expected_flips, 14);

    // relaxation swaps only, so composition after the kick is kept
    assert_eq!(r.reequilibrated.lattice.count_a(), r.perturbed.lattice.count_a());
    assert!(r.reequilibrated.summary.free_energy <= r.perturbed.summary.free_energy);
    assert_eq!(r.relaxation_diff.turned_on, r.relaxation_diff.turned_off);

    let net = r.net_diff.turned_on as i64 - r.net_diff.turned_off as i64;
    let shift = r.reequilibrated.lattice.count_a() as i64 - r.equilibrated.lattice.count_a() as i64;
    assert_eq!(net, shift);

    assert_eq!(r.equilibration.trials.len(), cfg.total_trials);
    assert_eq!(r.relaxation.trials.len(), cfg.total_trials);
}

#[test]
fn experiment_is_reproducible_from_seed() {
    let cfg = small_config();
    let a = run_experiment(&cfg, &mut ChaCha20Rng::seed_from_u64(cfg.seed)).unwrap();
    let b = run_experiment(&cfg, &mut ChaCha20Rng::seed_from_u64(cfg.seed)).unwrap();
    assert_eq!(a.reequilibrated.lattice, b.reequilibrated.lattice);
    assert_eq!(a.net_diff, b.net_diff);
    assert_eq!(a.reequilibrated.summary, b.reequilibrated.summary);
}

#[test]
fn online_stats_match_two_pass() {
    let xs = [1.0, 2.0, 3.0, 4.0];
    let mut s = OnlineStats::default();
    for x in xs {
        s.push(x);
    }
    assert_eq!(s.count(), 4);
    assert!((s.mean() - 2.5).abs() < 1e-12);
    assert!((s.var() - 5.0 / 3.0).abs() < 1e-12);

    let mut one = OnlineStats::default();
    one.push(7.0);
    assert_eq!(one.var(), 0.0);
}

#[test]
fn grid_is_cartesian() {
    let points = grid(&[0.3, 0.5], &[1.0, 1.2, 1.4]);
    assert_eq!(points.len(), 6);
    assert_eq!(points[0], SweepPoint { x1_target: 0.3, h: 1.0 });
    assert_eq!(points[5], SweepPoint { x1_target: 0.5, h: 1.4 });
}

#[test]
fn point_averages_are_normalised_and_reproducible() {
    let base = RunConfig { total_trials: 60, ..small_config() };
    let point = SweepPoint { x1_target: 0.45, h: 1.3 };
    let row = run_point(&base, point, 3, 123, 0).unwrap();
    assert_eq!(row.replicas, 3);
    assert_eq!(row.failed_replicas, 0);
    assert_eq!(row.free_energy.count(), 3);
    assert!(row.random_mixing_neg_entropy < 0.0);
    let vars = row.variables.unwrap();
    assert!((vars.sum_y() - 1.0).abs() < 1e-9);
    assert!((vars.sum_z() - 1.0).abs() < 1e-9);
    assert!((vars.x1 - 0.45).abs() <= base.max_x_difference + 1e-12);

    let again = run_point(&base, point, 3, 123, 0).unwrap();
    assert_eq!(row.free_energy.mean(), again.free_energy.mean());
    assert_eq!(row.variables, again.variables);
}

#[test]
fn point_with_no_evaluable_replica_reports_no_variables() {
    // a 2x2 lattice always leaves some pattern unoccupied
    let base = RunConfig { layers: 2, columns: 2, total_trials: 5, ..small_config() };
    let row = run_point(&base, SweepPoint { x1_target: 0.5, h: 1.4 }, 3, 11, 0).unwrap();
    assert_eq!(row.failed_replicas, 3);
    assert!(row.variables.is_none());
    assert!(row.effective_h.is_none());
    assert_eq!(row.free_energy.count(), 0);
}

#[test]
fn sweep_rows_are_sorted_and_match_points() {
    let base = RunConfig { total_trials: 40, ..small_config() };
    let points = grid(&[0.5, 0.4], &[1.4, 1.2]);
    let rows = run_sweep(&base, &points, 2, 7, &ProgressBar::hidden()).unwrap();
    assert_eq!(rows.len(), 4);
    for w in rows.windows(2) {
        let (a, b) = (w[0].point, w[1].point);
        assert!(a.x1_target < b.x1_target || (a.x1_target == b.x1_target && a.h < b.h));
    }

    for (id, &p) in points.iter().enumerate() {
        let row = rows.iter().find(|r| r.point == p).unwrap();
        let direct = run_point(&base, p, 2, 7, id).unwrap();
        assert_eq!(row.free_energy.mean(), direct.free_energy.mean());
    }
}
