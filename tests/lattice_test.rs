use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use zigzag_cvm::error::CvmError;
use zigzag_cvm::lattice::{Lattice, A, B};

#[test]
fn rejects_bad_dimensions_and_values() {
    assert!(matches!(Lattice::new(3, 4), Err(CvmError::InvalidConfiguration(_))));
    assert!(matches!(Lattice::new(0, 4), Err(CvmError::InvalidConfiguration(_))));
    assert!(matches!(Lattice::new(4, 1), Err(CvmError::InvalidConfiguration(_))));

    let ragged = vec![vec![A, B, A], vec![A, B]];
    assert!(matches!(Lattice::from_rows(&ragged), Err(CvmError::InvalidConfiguration(_))));

    let non_binary = vec![vec![A, 2], vec![B, B]];
    assert!(matches!(Lattice::from_rows(&non_binary), Err(CvmError::InvalidConfiguration(_))));
}

#[test]
fn new_lattice_is_all_b_and_uniform() {
    let lattice = Lattice::new(4, 6).unwrap();
    assert_eq!(lattice.n_cells(), 24);
    assert_eq!(lattice.pairs(), 2);
    assert_eq!(lattice.count_a(), 0);
    assert!(lattice.ensure_mixed().is_err());
}

#[test]
fn set_flip_and_rows() {
    let mut lattice = Lattice::new(2, 3).unwrap();
    lattice.set(0, 1, 7);
    assert!(lattice.is_a(0, 1));
    lattice.flip(1, 2);
    lattice.flip(0, 1);
    assert_eq!(lattice.to_rows(), vec![vec![B, B, B], vec![B, B, A]]);
    assert!(lattice.ensure_mixed().is_ok());
    assert!((lattice.fraction_a() - 1.0 / 6.0).abs() < 1e-12);
}

#[test]
fn diff_splits_on_and_off() {
    let before = Lattice::from_rows(&[vec![A, A, B], vec![B, B, A]]).unwrap();
    let after = Lattice::from_rows(&[vec![A, B, A], vec![A, B, A]]).unwrap();
    let d = before.diff(&after).unwrap();
    assert_eq!(d.turned_on, 2);
    assert_eq!(d.turned_off, 1);
    assert_eq!(d.total, 3);
    assert_eq!(before.diff_count(&before).unwrap(), 0);

    let other = Lattice::new(2, 4).unwrap();
    assert!(matches!(before.diff(&other), Err(CvmError::InvalidConfiguration(_))));
}

#[test]
fn random_lattice_tracks_target_fraction() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let lattice = Lattice::random_with(&mut rng, 64, 64, 0.3).unwrap();
    assert!((lattice.fraction_a() - 0.3).abs() < 0.03);

    assert!(Lattice::random_with(&mut rng, 4, 4, 1.5).is_err());
    assert!(Lattice::random_with(&mut rng, 5, 4, 0.5).is_err());
}

#[test]
fn same_seed_same_lattice() {
    let a = Lattice::random_with(&mut ChaCha20Rng::seed_from_u64(5), 8, 8, 0.5).unwrap();
    let b = Lattice::random_with(&mut ChaCha20Rng::seed_from_u64(5), 8, 8, 0.5).unwrap();
    assert_eq!(a, b);
}

#[test]
fn chain_orientation_follows_row_parity() {
    let lattice = Lattice::new(4, 4).unwrap();
    let tops: Vec<_> = lattice.chains().map(|c| (c.top, c.next)).collect();
    assert_eq!(tops, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
}
