//! Critical pairs of basis elements.

use crate::monomial::PackedMonomial;

/// A pair of basis indices whose S-polynomial is still to be reduced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CriticalPair {
    /// The smaller basis index.
    pub i: usize,
    /// The larger basis index.
    pub j: usize,
    /// lcm of the two leading monomials.
    pub lcm: PackedMonomial,
    /// Sugar degree of the S-polynomial.
    pub sugar: u32,
}

impl CriticalPair {
    /// Creates the pair for basis elements `i` and `j`.
    ///
    /// `sugar_i` and `sugar_j` are the sugar degrees of the two elements.
    #[must_use]
    pub fn new(
        i: usize,
        j: usize,
        lm_i: &PackedMonomial,
        lm_j: &PackedMonomial,
        sugar_i: u32,
        sugar_j: u32,
    ) -> Self {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let lcm = lm_i.lcm(lm_j);
        let deg = lcm.total_degree();
        let sugar = (sugar_i + deg - lm_i.total_degree()).max(sugar_j + deg - lm_j.total_degree());
        Self { i, j, lcm, sugar }
    }

    /// Returns the normalized `(min, max)` key of this pair.
    #[must_use]
    pub fn key(&self) -> (usize, usize) {
        (self.i, self.j)
    }
}

/// Returns the normalized key for an unordered index pair.
#[must_use]
pub fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
