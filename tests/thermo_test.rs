use zigzag_cvm::analytic::{equiprobable, random_mixing, random_mixing_neg_entropy};
use zigzag_cvm::config_vars::count_config_vars;
use zigzag_cvm::error::CvmError;
use zigzag_cvm::lattice::{Lattice, A, B};
use zigzag_cvm::thermo::{epsilon1, evaluate, evaluate_normalized, lf, neg_entropy};

const EPS: f64 = 1e-10;

/// 4x4 lattice in which every pair and triplet pattern occurs.
fn mixed_4x4() -> Lattice {
    Lattice::from_rows(&[
        vec![A, A, A, B],
        vec![B, A, B, B],
        vec![A, A, B, B],
        vec![B, A, A, B],
    ])
    .unwrap()
}

#[test]
fn lf_values() {
    assert!((lf(1.0) + 1.0).abs() < EPS);
    assert!((lf(0.5) - (0.5 * 0.5f64.ln() - 0.5)).abs() < EPS);
    assert!(lf(0.0).is_nan());
}

#[test]
fn mixed_lattice_reference_values() {
    let cv = count_config_vars(&mixed_4x4());
    assert_eq!((cv.y1, cv.y2, cv.y3), (7, 18, 7));
    assert_eq!((cv.z1, cv.z2, cv.z3, cv.z4, cv.z5, cv.z6), (3, 8, 5, 5, 8, 3));

    let s = evaluate(1.4, &cv).unwrap();
    assert!((s.neg_entropy - (-0.7088131271269189)).abs() < 1e-9);
    assert!((s.enthalpy1 - 0.16823611831060645).abs() < 1e-9);
    assert!((s.free_energy - (-0.5405770088163124)).abs() < 1e-9);
    assert_eq!(s.enthalpy0, 0.0);
    assert!((s.free_energy - (s.enthalpy0 + s.enthalpy1 + s.neg_entropy)).abs() < EPS);
}

#[test]
fn neutral_interaction_has_no_enthalpy() {
    let cv = count_config_vars(&mixed_4x4());
    let s = evaluate(1.0, &cv).unwrap();
    assert_eq!(s.enthalpy1, 0.0);
    assert!((s.free_energy - s.neg_entropy).abs() < EPS);
}

#[test]
fn enthalpy_scales_with_epsilon() {
    let cv = count_config_vars(&mixed_4x4());
    let v = cv.normalized();
    for h in [0.5, 1.2, 2.0, 3.0] {
        let s = evaluate(h, &cv).unwrap();
        let expected = epsilon1(h).unwrap() * (2.0 * v.y2 - v.y1 - v.y3);
        assert!((s.enthalpy1 - expected).abs() < EPS, "h = {h}");
    }
}

#[test]
fn non_positive_h_is_a_domain_error() {
    let cv = count_config_vars(&mixed_4x4());
    assert!(matches!(evaluate(0.0, &cv), Err(CvmError::NumericDomain(_))));
    assert!(matches!(evaluate(-1.0, &cv), Err(CvmError::NumericDomain(_))));
    assert!(matches!(evaluate(f64::NAN, &cv), Err(CvmError::NumericDomain(_))));
}

#[test]
fn missing_pattern_is_a_domain_error() {
    let mut rows = vec![vec![A; 4]; 4];
    rows[0][0] = B;
    let cv = count_config_vars(&Lattice::from_rows(&rows).unwrap());
    assert_eq!(cv.y3, 0);
    assert!(matches!(evaluate(1.4, &cv), Err(CvmError::NumericDomain(_))));
}

#[test]
fn equiprobable_at_neutral_h_is_uniform() {
    let v = equiprobable(1.0).unwrap();
    for z in [v.z1, v.z2, v.z3, v.z4, v.z5, v.z6] {
        assert!((z - 0.125).abs() < EPS);
    }
    for y in [v.y1, v.y2, v.y3, v.w1, v.w2, v.w3] {
        assert!((y - 0.25).abs() < EPS);
    }
    for sum in [v.sum_x(), v.sum_y(), v.sum_w(), v.sum_z()] {
        assert!((sum - 1.0).abs() < EPS);
    }
    assert!((v.effective_h().unwrap() - 1.0).abs() < EPS);
}

#[test]
fn equiprobable_sums_hold_away_from_neutral() {
    for h in [0.8, 1.2, 1.4, 1.6] {
        let v = equiprobable(h).unwrap();
        assert!((v.sum_z() - 1.0).abs() < 1e-9, "h = {h}");
        assert!((v.sum_y() - 1.0).abs() < 1e-9, "h = {h}");
        assert!(evaluate_normalized(h, &v).is_ok());
        assert!((v.effective_h().unwrap() - h).abs() < 1e-9, "h = {h}");
    }
    assert!(equiprobable(3f64.sqrt()).is_err());
    assert!(equiprobable(0.0).is_err());
}

#[test]
fn random_mixing_entropy_is_ideal_mixing() {
    for x in [0.1, 0.3, 0.5, 0.75] {
        let v = random_mixing(x).unwrap();
        assert!((v.sum_y() - 1.0).abs() < EPS);
        assert!((v.sum_z() - 1.0).abs() < EPS);
        let ideal = x * x.ln() + (1.0 - x) * (1.0 - x).ln();
        assert!((random_mixing_neg_entropy(x).unwrap() - ideal).abs() < 1e-9, "x1 = {x}");
        assert!((neg_entropy(&v).unwrap() - ideal).abs() < 1e-9);
    }
    assert!(random_mixing(0.0).is_err());
    assert!(random_mixing(1.0).is_err());
}

#[test]
fn uncorrelated_state_has_neutral_effective_h() {
    let v = random_mixing(0.3).unwrap();
    assert!((v.effective_h().unwrap() - 1.0).abs() < EPS);
}
