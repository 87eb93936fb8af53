//! Local Gröbner bases over the variables a batch actually uses.
//!
//! A batch is moved into a compact ring whose variables are exactly the
//! ones that occur in it, solved there, and moved back. The remap keeps
//! the relative order of variables, so monomial orders and canonical term
//! order survive the round trip.

use std::collections::BTreeSet;

use fmat_groebner::GroebnerSolver;
use fmat_poly::{MonomialOrder, SparsePoly, Var};
use fmat_rings::Q;
use rustc_hash::FxHashMap;

/// A bijection between the variables of a batch and `0..len`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableRemap {
    /// Compact index to full variable, ascending.
    full: Vec<Var>,
    compact: FxHashMap<Var, Var>,
}

impl VariableRemap {
    /// Builds the remap of the variables occurring in `equations`.
    #[must_use]
    pub fn from_equations(equations: &[SparsePoly<Q>]) -> Self {
        let used: BTreeSet<Var> = equations.iter().flat_map(SparsePoly::variables).collect();
        let full: Vec<Var> = used.into_iter().collect();
        let compact = full
            .iter()
            .zip(0u32..)
            .map(|(&v, i)| (v, Var(i)))
            .collect();
        Self { full, compact }
    }

    /// Number of variables in the compact ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.full.len()
    }

    /// Returns true if the batch uses no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    /// The full variables in compact order.
    #[must_use]
    pub fn variables(&self) -> &[Var] {
        &self.full
    }

    /// Moves an equation into the compact ring.
    ///
    /// Returns `None` if it uses a variable outside the batch.
    #[must_use]
    pub fn to_compact(&self, eq: &SparsePoly<Q>) -> Option<SparsePoly<Q>> {
        if !eq.variables().iter().all(|v| self.compact.contains_key(v)) {
            return None;
        }
        Some(eq.rename(|v| self.compact.get(&v).copied().unwrap_or(v)))
    }

    /// Moves an equation from the compact ring back to full variables.
    #[must_use]
    pub fn to_full(&self, eq: &SparsePoly<Q>) -> SparsePoly<Q> {
        eq.rename(|v| self.full.get(v.index()).copied().unwrap_or(v))
    }
}

/// Computes the reduced Gröbner basis of a batch in its compact ring and
/// returns it in full variables.
#[must_use]
pub fn compute_basis(
    equations: &[SparsePoly<Q>],
    order: MonomialOrder,
    solver: &dyn GroebnerSolver<Q>,
) -> Vec<SparsePoly<Q>> {
    let remap = VariableRemap::from_equations(equations);
    let compact: Vec<SparsePoly<Q>> = equations
        .iter()
        .filter_map(|eq| remap.to_compact(eq))
        .collect();

    solver
        .basis(&compact, order)
        .iter()
        .map(|g| remap.to_full(g))
        .collect()
}

/// Union-find over variable indices.
struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let (px, py) = (self.find(x), self.find(y));
        if px == py {
            return;
        }
        match self.rank[px].cmp(&self.rank[py]) {
            std::cmp::Ordering::Less => self.parent[px] = py,
            std::cmp::Ordering::Greater => self.parent[py] = px,
            std::cmp::Ordering::Equal => {
                self.parent[py] = px;
                self.rank[px] += 1;
            }
        }
    }
}

/// Splits equations into batches that share no variables.
///
/// Batches come out in order of their first equation, and equations keep
/// their relative order inside a batch. Zero equations are dropped; each
/// nonzero constant forms its own batch.
#[must_use]
pub fn partition_equations(equations: &[SparsePoly<Q>]) -> Vec<Vec<SparsePoly<Q>>> {
    let n = equations
        .iter()
        .flat_map(SparsePoly::variables)
        .map(|v| v.index() + 1)
        .max()
        .unwrap_or(0);
    let mut sets = DisjointSets::new(n);

    for eq in equations {
        let vars = eq.variables();
        if let Some((first, rest)) = vars.split_first() {
            for v in rest {
                sets.union(first.index(), v.index());
            }
        }
    }

    let mut batches: Vec<Vec<SparsePoly<Q>>> = Vec::new();
    let mut batch_of_root: FxHashMap<usize, usize> = FxHashMap::default();
    for eq in equations.iter().filter(|eq| !eq.is_zero()) {
        let slot = match eq.variables().first() {
            Some(v) => {
                let root = sets.find(v.index());
                *batch_of_root.entry(root).or_insert_with(|| {
                    batches.push(Vec::new());
                    batches.len() - 1
                })
            }
            None => {
                batches.push(Vec::new());
                batches.len() - 1
            }
        };
        batches[slot].push(eq.clone());
    }
    batches
}
