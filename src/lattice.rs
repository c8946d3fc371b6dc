// lattice.rs - L x M binary grid of A (1) / B (0) units

use crate::error::{CvmError, Result};
use crate::topology::{ChainOrientation, ZigzagChain};
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::Bernoulli;

/// Cell value of an "A" (on) unit.
pub const A: u8 = 1;
/// Cell value of a "B" (off) unit.
pub const B: u8 = 0;

/// Binary grid organised as `layers / 2` pairs of interleaved rows.
///
/// Rows are indexed `0..layers`, columns `0..columns`. Both directions wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    cells: DMatrix<u8>,
}

/// Cell-by-cell comparison of two lattices with identical dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatticeDiff {
    /// B -> A changes
    pub turned_on: usize,
    /// A -> B changes
    pub turned_off: usize,
    pub total: usize,
}

fn check_dimensions(layers: usize, columns: usize) -> Result<()> {
    if layers < 2 || layers % 2 != 0 {
        return Err(CvmError::invalid(format!(
            "lattice needs an even number of layers (at least 2), got {layers}"
        )));
    }
    if columns < 2 {
        return Err(CvmError::invalid(format!(
            "lattice needs at least 2 columns, got {columns}"
        )));
    }
    Ok(())
}

impl Lattice {
    /// All-B lattice of the given size.
    pub fn new(layers: usize, columns: usize) -> Result<Self> {
        check_dimensions(layers, columns)?;
        Ok(Self { cells: DMatrix::from_element(layers, columns, B) })
    }

    /// Build from explicit rows; every row must have the same length and hold only 0/1.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let layers = rows.len();
        let columns = rows.first().map_or(0, |r| r.len());
        check_dimensions(layers, columns)?;

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(CvmError::invalid(format!(
                    "row {i} has {} columns, expected {columns}",
                    row.len()
                )));
            }
            if let Some(&v) = row.iter().find(|&&v| v > A) {
                return Err(CvmError::invalid(format!(
                    "row {i} holds non-binary value {v}"
                )));
            }
        }

        let cells = DMatrix::from_fn(layers, columns, |i, j| rows[i][j]);
        Ok(Self { cells })
    }

    /// Random lattice where each cell is A with probability `x1_target`,
    /// using a caller-supplied RNG (preferred for reproducibility).
    pub fn random_with(
        rng: &mut impl Rng,
        layers: usize,
        columns: usize,
        x1_target: f64,
    ) -> Result<Self> {
        check_dimensions(layers, columns)?;
        let coin = Bernoulli::new(x1_target).map_err(|_| {
            CvmError::invalid(format!("x1 target must lie in [0, 1], got {x1_target}"))
        })?;
        let cells = DMatrix::from_fn(layers, columns, |_, _| if rng.sample(coin) { A } else { B });
        Ok(Self { cells })
    }

    /// Number of rows L.
    #[inline(always)]
    pub fn layers(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns M.
    #[inline(always)]
    pub fn columns(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of zigzag row pairs, L / 2.
    #[inline(always)]
    pub fn pairs(&self) -> usize {
        self.layers() / 2
    }

    /// Total number of cells N.
    #[inline(always)]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[(row, col)]
    }

    #[inline(always)]
    pub fn is_a(&self, row: usize, col: usize) -> bool {
        self.cells[(row, col)] == A
    }

    /// Set a cell; any non-zero value is stored as A.
    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[(row, col)] = if value > B { A } else { B };
    }

    #[inline(always)]
    pub fn flip(&mut self, row: usize, col: usize) {
        let v = self.cells[(row, col)];
        self.cells[(row, col)] = A - v;
    }

    /// Number of A cells.
    pub fn count_a(&self) -> usize {
        self.cells.iter().filter(|&&v| v == A).count()
    }

    /// Fraction of A cells, x1 = count_a / N.
    pub fn fraction_a(&self) -> f64 {
        self.count_a() as f64 / self.n_cells() as f64
    }

    /// Fails when every cell holds the same unit; such a lattice zeroes
    /// occurrence counts that feed the entropy functional.
    pub fn ensure_mixed(&self) -> Result<()> {
        let a = self.count_a();
        if a == 0 || a == self.n_cells() {
            return Err(CvmError::invalid(format!(
                "uniform lattice ({a} A cells of {}) has zero pair occurrences",
                self.n_cells()
            )));
        }
        Ok(())
    }

    /// Row-major copy of the cells.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.layers())
            .map(|i| (0..self.columns()).map(|j| self.get(i, j)).collect())
            .collect()
    }

    /// Compare against another lattice of the same size.
    pub fn diff(&self, other: &Lattice) -> Result<LatticeDiff> {
        if self.cells.shape() != other.cells.shape() {
            return Err(CvmError::invalid(format!(
                "cannot compare a {:?} lattice with a {:?} lattice",
                self.cells.shape(),
                other.cells.shape()
            )));
        }
        let mut diff = LatticeDiff::default();
        for (&before, &after) in self.cells.iter().zip(other.cells.iter()) {
            match (before, after) {
                (B, A) => diff.turned_on += 1,
                (A, B) => diff.turned_off += 1,
                _ => {}
            }
        }
        diff.total = diff.turned_on + diff.turned_off;
        Ok(diff)
    }

    /// Number of cells whose state differs between `self` and `other`.
    pub fn diff_count(&self, other: &Lattice) -> Result<usize> {
        Ok(self.diff(other)?.total)
    }

    /// The zigzag chain whose upper row is `top_row`.
    ///
    /// Even rows start an even-oriented chain, odd rows an odd-oriented one
    /// that wraps onto row 0 from the last layer.
    pub fn chain(&self, top_row: usize) -> ZigzagChain {
        let orientation = if top_row % 2 == 0 {
            ChainOrientation::Even
        } else {
            ChainOrientation::Odd
        };
        ZigzagChain::new(top_row, orientation, self.layers(), self.columns())
    }

    /// Iterate over all L chains: for each pair, the even-start then the odd-start chain.
    pub fn chains(&self) -> impl Iterator<Item = ZigzagChain> + '_ {
        (0..self.pairs()).flat_map(move |p| [self.chain(2 * p), self.chain(2 * p + 1)])
    }
}
