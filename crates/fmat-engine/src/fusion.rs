//! Fusion rules: the basis, fusion multiplicities and R-matrix scalars.

use std::fmt;

use fmat_rings::{Ring, Q};
use rustc_hash::FxHashMap;

/// Largest rank whose labels all fit an [`Anyon`].
pub const MAX_RANK: usize = 1 << 16;

/// A basis element (simple object) of a fusion ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Anyon(pub u16);

impl Anyon {
    /// Returns the label as a `usize`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Anyon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// The fusion data the engine reads.
///
/// Basis elements are `Anyon(0)..Anyon(rank - 1)`.
pub trait FusionRules: Send + Sync + fmt::Debug {
    /// Number of basis elements.
    fn rank(&self) -> usize;

    /// The unit object.
    fn unit(&self) -> Anyon;

    /// Fusion multiplicity `N_{ab}^c`.
    fn multiplicity(&self, a: Anyon, b: Anyon, c: Anyon) -> u32;

    /// R-matrix scalar `R^{ab}_c`; zero when `c` is not in `a ⊗ b`.
    fn r_matrix(&self, a: Anyon, b: Anyon, c: Anyon) -> Q;

    /// The basis in label order, up to [`MAX_RANK`] labels.
    fn basis(&self) -> Vec<Anyon> {
        (0..self.rank())
            .map_while(|i| u16::try_from(i).ok())
            .map(Anyon)
            .collect()
    }

    /// Returns true if `c` occurs in `a ⊗ b`.
    fn fuses(&self, a: Anyon, b: Anyon, c: Anyon) -> bool {
        self.multiplicity(a, b, c) > 0
    }
}

/// Table-driven fusion rules.
///
/// Unit fusions are filled in by [`FusionTable::new`]. R-matrix scalars
/// default to 1 on admissible triples.
#[derive(Clone, Debug)]
pub struct FusionTable {
    rank: usize,
    unit: Anyon,
    /// `N_{ab}^c` at `(a * rank + b) * rank + c`.
    mult: Vec<u32>,
    r: FxHashMap<(Anyon, Anyon, Anyon), Q>,
}

impl FusionTable {
    /// Creates a table with only the unit fusions `1 ⊗ a = a ⊗ 1 = a`.
    #[must_use]
    pub fn new(rank: usize, unit: Anyon) -> Self {
        let mut table = Self {
            rank,
            unit,
            mult: vec![0; rank * rank * rank],
            r: FxHashMap::default(),
        };
        for a in table.basis() {
            table.set_multiplicity(unit, a, a, 1);
            table.set_multiplicity(a, unit, a, 1);
        }
        table
    }

    /// The cyclic group `Z_n` with unit `0` and trivial braiding.
    #[must_use]
    pub fn cyclic(n: usize) -> Self {
        let mut table = Self::new(n, Anyon(0));
        for a in table.basis() {
            for b in table.basis() {
                let c = (a.index() + b.index()) % n;
                if let Ok(c) = u16::try_from(c) {
                    table.set_multiplicity(a, b, Anyon(c), 1);
                }
            }
        }
        table
    }

    /// The one-element fusion ring.
    #[must_use]
    pub fn trivial() -> Self {
        Self::cyclic(1)
    }

    /// Adds the fusion channel `c ∈ a ⊗ b` with multiplicity `n`.
    #[must_use]
    pub fn with_fusion(mut self, a: Anyon, b: Anyon, c: Anyon, n: u32) -> Self {
        self.set_multiplicity(a, b, c, n);
        self
    }

    /// Sets the R-matrix scalar `R^{ab}_c`.
    #[must_use]
    pub fn with_r_matrix(mut self, a: Anyon, b: Anyon, c: Anyon, value: Q) -> Self {
        self.r.insert((a, b, c), value);
        self
    }

    fn slot(&self, a: Anyon, b: Anyon, c: Anyon) -> Option<usize> {
        let n = self.rank;
        (a.index() < n && b.index() < n && c.index() < n)
            .then(|| (a.index() * n + b.index()) * n + c.index())
    }

    fn set_multiplicity(&mut self, a: Anyon, b: Anyon, c: Anyon, n: u32) {
        if let Some(i) = self.slot(a, b, c) {
            self.mult[i] = n;
        }
    }
}

impl FusionRules for FusionTable {
    fn rank(&self) -> usize {
        self.rank
    }

    fn unit(&self) -> Anyon {
        self.unit
    }

    fn multiplicity(&self, a: Anyon, b: Anyon, c: Anyon) -> u32 {
        self.slot(a, b, c).map_or(0, |i| self.mult[i])
    }

    fn r_matrix(&self, a: Anyon, b: Anyon, c: Anyon) -> Q {
        if !self.fuses(a, b, c) {
            return Q::zero();
        }
        self.r.get(&(a, b, c)).cloned().unwrap_or_else(Q::one)
    }
}
