// topology.rs - Zigzag chain rings and next-nearest-neighbour adjacency

/// Which row of a chain's row pair holds the ring's even positions.
///
/// An even-start chain (top row even) begins on the top row, so bonds run
/// down-right from `(top, j)` to `(next, j)`. An odd-start chain begins on
/// the lower row, so bonds run from `(top, j)` to `(next, j + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainOrientation {
    Even,
    Odd,
}

/// `(row, column)` coordinate in a lattice.
pub type Site = (usize, usize);

/// One zigzag chain: a ring of `2 * columns` cells woven through rows
/// `top` and `next = (top + 1) mod layers`.
///
/// Ring position `k` maps to a site as follows (j = k / 2):
///
/// | orientation | k even      | k odd       |
/// |-------------|-------------|-------------|
/// | Even        | (top, j)    | (next, j)   |
/// | Odd         | (next, j)   | (top, j)    |
///
/// Bonds are `(c_k, c_k+1)` and triplets `(c_k, c_k+1, c_k+2)`, positions mod `2 * columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZigzagChain {
    pub top: usize,
    pub next: usize,
    pub orientation: ChainOrientation,
    columns: usize,
}

impl ZigzagChain {
    pub fn new(top: usize, orientation: ChainOrientation, layers: usize, columns: usize) -> Self {
        let next = if top + 1 >= layers { 0 } else { top + 1 };
        Self { top, next, orientation, columns }
    }

    /// Ring length, 2M.
    #[inline(always)]
    pub fn len(&self) -> usize {
        2 * self.columns
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.columns == 0
    }

    /// Site at ring position `k` (taken mod the ring length).
    #[inline(always)]
    pub fn site(&self, k: usize) -> Site {
        let k = k % self.len();
        let col = k / 2;
        let on_top = match self.orientation {
            ChainOrientation::Even => k % 2 == 0,
            ChainOrientation::Odd => k % 2 == 1,
        };
        if on_top { (self.top, col) } else { (self.next, col) }
    }

    /// All 2M nearest-neighbour bonds of the ring, wrap bond included.
    pub fn bonds(&self) -> impl Iterator<Item = (Site, Site)> + '_ {
        (0..self.len()).map(move |k| (self.site(k), self.site(k + 1)))
    }

    /// All 2M consecutive triplets of the ring, both wrap triplets included.
    pub fn triplets(&self) -> impl Iterator<Item = (Site, Site, Site)> + '_ {
        (0..self.len()).map(move |k| (self.site(k), self.site(k + 1), self.site(k + 2)))
    }
}

/// Next-nearest-neighbour pairs: each cell with its right-hand neighbour in
/// the same row (column wrap) and with the cell two rows below (row wrap).
///
/// Yields exactly `2 * layers * columns` pairs.
pub fn next_nearest_pairs(layers: usize, columns: usize) -> impl Iterator<Item = (Site, Site)> {
    let horizontal = (0..layers).flat_map(move |i| {
        (0..columns).map(move |j| ((i, j), (i, (j + 1) % columns)))
    });
    let vertical = (0..layers).flat_map(move |i| {
        (0..columns).map(move |j| ((i, j), ((i + 2) % layers, j)))
    });
    horizontal.chain(vertical)
}
