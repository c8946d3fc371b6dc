// config_vars.rs - Pair and triplet occurrence counts over the zigzag lattice

use crate::lattice::Lattice;
use crate::topology::next_nearest_pairs;

/// Any value above this threshold counts as an "A" unit.
pub const A_THRESHOLD: f64 = 0.1;

#[inline(always)]
fn is_a(v: f64) -> bool {
    v > A_THRESHOLD
}

/// Ordered pair pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairClass {
    AA,
    AB,
    BA,
    BB,
}

/// Ordered triplet pattern (U, NN, NNN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripletClass {
    AAA,
    AAB,
    BAA,
    ABA,
    BAB,
    BBA,
    ABB,
    BBB,
}

pub fn classify_pair(u: f64, nn: f64) -> PairClass {
    match (is_a(u), is_a(nn)) {
        (true, true) => PairClass::AA,
        (true, false) => PairClass::AB,
        (false, true) => PairClass::BA,
        (false, false) => PairClass::BB,
    }
}

pub fn classify_triplet(u: f64, nn: f64, nnn: f64) -> TripletClass {
    match (is_a(u), is_a(nn), is_a(nnn)) {
        (true, true, true) => TripletClass::AAA,
        (true, true, false) => TripletClass::AAB,
        (false, true, true) => TripletClass::BAA,
        (true, false, true) => TripletClass::ABA,
        (false, true, false) => TripletClass::BAB,
        (false, false, true) => TripletClass::BBA,
        (true, false, false) => TripletClass::ABB,
        (false, false, false) => TripletClass::BBB,
    }
}

/// Raw (unnormalised) occurrence counts for one lattice state.
///
/// Mixed buckets hold both orientations: `y2 = AB + BA`, `z2 = AAB + BAA`,
/// `z5 = BBA + ABB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigurationVariables {
    /// total cells N
    pub n: u64,
    pub x1: u64,
    pub x2: u64,
    pub y1: u64,
    pub y2: u64,
    pub y3: u64,
    pub w1: u64,
    pub w2: u64,
    pub w3: u64,
    pub z1: u64,
    pub z2: u64,
    pub z3: u64,
    pub z4: u64,
    pub z5: u64,
    pub z6: u64,
}

/// Configuration variables scaled to fractions.
///
/// With this scaling `x1 + x2`, `y1 + 2 y2 + y3`, `w1 + 2 w2 + w3` and
/// `z1 + 2 z2 + z3 + z4 + 2 z5 + z6` all equal 1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedVariables {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub y3: f64,
    pub w1: f64,
    pub w2: f64,
    pub w3: f64,
    pub z1: f64,
    pub z2: f64,
    pub z3: f64,
    pub z4: f64,
    pub z5: f64,
    pub z6: f64,
}

impl ConfigurationVariables {
    fn add_pair_y(&mut self, class: PairClass) {
        match class {
            PairClass::AA => self.y1 += 1,
            PairClass::AB | PairClass::BA => self.y2 += 1,
            PairClass::BB => self.y3 += 1,
        }
    }

    fn add_pair_w(&mut self, class: PairClass) {
        match class {
            PairClass::AA => self.w1 += 1,
            PairClass::AB | PairClass::BA => self.w2 += 1,
            PairClass::BB => self.w3 += 1,
        }
    }

    fn add_triplet(&mut self, class: TripletClass) {
        match class {
            TripletClass::AAA => self.z1 += 1,
            TripletClass::AAB | TripletClass::BAA => self.z2 += 1,
            TripletClass::ABA => self.z3 += 1,
            TripletClass::BAB => self.z4 += 1,
            TripletClass::BBA | TripletClass::ABB => self.z5 += 1,
            TripletClass::BBB => self.z6 += 1,
        }
    }

    /// Σ raw y buckets; 2N for a well-formed lattice.
    pub fn y_total(&self) -> u64 {
        self.y1 + self.y2 + self.y3
    }

    /// Σ raw w buckets; 2N for a well-formed lattice.
    pub fn w_total(&self) -> u64 {
        self.w1 + self.w2 + self.w3
    }

    /// Σ raw z buckets; 2N for a well-formed lattice.
    pub fn z_total(&self) -> u64 {
        self.z1 + self.z2 + self.z3 + self.z4 + self.z5 + self.z6
    }

    /// Scale to fractions: x by N, like-unit pairs/triplets by 2N, mixed
    /// buckets by 4N (2N per orientation).
    pub fn normalized(&self) -> NormalizedVariables {
        let n = self.n as f64;
        let two_n = 2.0 * n;
        let four_n = 4.0 * n;
        NormalizedVariables {
            x1: self.x1 as f64 / n,
            x2: self.x2 as f64 / n,
            y1: self.y1 as f64 / two_n,
            y2: self.y2 as f64 / four_n,
            y3: self.y3 as f64 / two_n,
            w1: self.w1 as f64 / two_n,
            w2: self.w2 as f64 / four_n,
            w3: self.w3 as f64 / two_n,
            z1: self.z1 as f64 / two_n,
            z2: self.z2 as f64 / four_n,
            z3: self.z3 as f64 / two_n,
            z4: self.z4 as f64 / two_n,
            z5: self.z5 as f64 / four_n,
            z6: self.z6 as f64 / two_n,
        }
    }
}

impl NormalizedVariables {
    pub fn sum_x(&self) -> f64 {
        self.x1 + self.x2
    }

    pub fn sum_y(&self) -> f64 {
        self.y1 + 2.0 * self.y2 + self.y3
    }

    pub fn sum_w(&self) -> f64 {
        self.w1 + 2.0 * self.w2 + self.w3
    }

    pub fn sum_z(&self) -> f64 {
        self.z1 + 2.0 * self.z2 + self.z3 + self.z4 + 2.0 * self.z5 + self.z6
    }

    /// Interaction parameter implied by the pair/triplet balance,
    /// h = sqrt(z1 y2 / (z3 y1)). `None` when undefined.
    pub fn effective_h(&self) -> Option<f64> {
        let denom = self.z3 * self.y1;
        let ratio = self.z1 * self.y2 / denom;
        (denom > 0.0 && ratio > 0.0 && ratio.is_finite()).then(|| ratio.sqrt())
    }

    /// Named (label, value) view, in x, y, w, z order.
    pub fn entries(&self) -> [(&'static str, f64); 14] {
        [
            ("x1", self.x1), ("x2", self.x2),
            ("y1", self.y1), ("y2", self.y2), ("y3", self.y3),
            ("w1", self.w1), ("w2", self.w2), ("w3", self.w3),
            ("z1", self.z1), ("z2", self.z2), ("z3", self.z3),
            ("z4", self.z4), ("z5", self.z5), ("z6", self.z6),
        ]
    }
}

#[inline(always)]
fn value(lattice: &Lattice, (row, col): (usize, usize)) -> f64 {
    f64::from(lattice.get(row, col))
}

/// Count every configuration variable from scratch. Pure, O(L × M).
pub fn count_config_vars(lattice: &Lattice) -> ConfigurationVariables {
    let mut cv = ConfigurationVariables {
        n: lattice.n_cells() as u64,
        ..Default::default()
    };

    // x: unary
    for i in 0..lattice.layers() {
        for j in 0..lattice.columns() {
            if is_a(value(lattice, (i, j))) {
                cv.x1 += 1;
            } else {
                cv.x2 += 1;
            }
        }
    }

    // y and z: every row starts one chain, alternating orientation
    for chain in lattice.chains() {
        for (u, nn) in chain.bonds() {
            cv.add_pair_y(classify_pair(value(lattice, u), value(lattice, nn)));
        }
        for (u, nn, nnn) in chain.triplets() {
            cv.add_triplet(classify_triplet(
                value(lattice, u),
                value(lattice, nn),
                value(lattice, nnn),
            ));
        }
    }

    // w: horizontal then vertical next-nearest neighbours
    for (u, nnn) in next_nearest_pairs(lattice.layers(), lattice.columns()) {
        cv.add_pair_w(classify_pair(value(lattice, u), value(lattice, nnn)));
    }

    cv
}
