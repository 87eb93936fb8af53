//! The factory: F-symbol variables and what is known about them.
//!
//! Every admissible F-symbol `F(a,b,c,d,x,y)` with no unit among `a, b, c`
//! gets one polynomial variable, numbered in lexicographic order of the
//! six labels. The factory records the current value of each F-symbol
//! (`fvars`), which variables are solved, known to be nonzero, or have a
//! known square, plus degree metadata. Three caches derived from that state
//! are rebuilt after every change.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use fmat_groebner::{BuchbergerSolver, GroebnerSolver};
use fmat_poly::{SparsePoly, Var};
use fmat_rings::{Ring, Q};
use rustc_hash::{FxHashMap, FxHashSet, FxHasher};

use crate::error::{EngineError, Result};
use crate::fusion::{Anyon, FusionRules, FusionTable, MAX_RANK};

/// The six labels `(a, b, c, d, x, y)` of an F-symbol.
pub type FSymbol = [Anyon; 6];

/// Outcome of the F-symbol lookup before any polynomial is touched.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Lookup<'a> {
    Zero,
    One,
    Stored(&'a SparsePoly<Q>),
}

/// The broadcast payload: the mutable state of a factory.
#[derive(Clone, Debug, PartialEq)]
pub struct StateUpdate {
    /// Current value of every F-symbol variable.
    pub fvars: FxHashMap<FSymbol, SparsePoly<Q>>,
    /// Solved flag per variable.
    pub solved: Vec<bool>,
    /// Known-nonzero flag per variable.
    pub known_nonzero: Vec<bool>,
    /// Known squares `x^2 = s`.
    pub known_squares: FxHashMap<Var, Q>,
    /// Degree bound per variable.
    pub var_degrees: Vec<u32>,
}

/// A compact summary of factory state, comparable across workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateDigest {
    /// Number of variables.
    pub num_vars: usize,
    /// Number of solved variables.
    pub solved: usize,
    /// Number of known-nonzero variables.
    pub known_nonzero: usize,
    /// Number of known squares.
    pub known_squares: usize,
    /// Hash over the full mutable state.
    pub state_hash: u64,
}

/// The shared structure every worker holds a copy of.
#[derive(Clone)]
pub struct Factory {
    rules: Arc<dyn FusionRules>,
    solver: Arc<dyn GroebnerSolver<Q>>,
    basis: Vec<Anyon>,
    unit: Anyon,
    /// Variable index to F-symbol.
    symbols: Vec<FSymbol>,
    /// F-symbol to variable index.
    index: FxHashMap<FSymbol, Var>,
    fvars: FxHashMap<FSymbol, SparsePoly<Q>>,
    solved: Vec<bool>,
    known_nonzero: Vec<bool>,
    known_squares: FxHashMap<Var, Q>,
    var_degrees: Vec<u32>,
    // Derived from the fields above by `refresh_caches`.
    nonzero_index: FxHashSet<Var>,
    known_powers: FxHashMap<Var, Vec<Q>>,
    solved_values: FxHashMap<Var, SparsePoly<Q>>,
}

impl Factory {
    /// Creates a factory with one unsolved variable per admissible F-symbol.
    ///
    /// # Errors
    ///
    /// Returns `RankTooLarge` if some basis label does not fit an [`Anyon`].
    pub fn new(rules: Arc<dyn FusionRules>, solver: Arc<dyn GroebnerSolver<Q>>) -> Result<Self> {
        let rank = rules.rank();
        if rank > MAX_RANK {
            return Err(EngineError::RankTooLarge { rank, max: MAX_RANK });
        }
        let basis = rules.basis();
        let unit = rules.unit();

        let mut symbols = Vec::new();
        for &a in basis.iter().filter(|&&a| a != unit) {
            for &b in basis.iter().filter(|&&b| b != unit) {
                for &c in basis.iter().filter(|&&c| c != unit) {
                    for &d in &basis {
                        for &x in &basis {
                            if !rules.fuses(a, b, x) || !rules.fuses(x, c, d) {
                                continue;
                            }
                            for &y in &basis {
                                if rules.fuses(b, c, y) && rules.fuses(a, y, d) {
                                    symbols.push([a, b, c, d, x, y]);
                                }
                            }
                        }
                    }
                }
            }
        }

        let vars = (0..symbols.len()).map_while(|i| u32::try_from(i).ok().map(Var));
        let index: FxHashMap<FSymbol, Var> = symbols.iter().copied().zip(vars).collect();
        let fvars = index
            .iter()
            .map(|(&s, &v)| (s, SparsePoly::var(v)))
            .collect();

        let n = symbols.len();
        let mut factory = Self {
            rules,
            solver,
            basis,
            unit,
            symbols,
            index,
            fvars,
            solved: vec![false; n],
            known_nonzero: vec![false; n],
            known_squares: FxHashMap::default(),
            var_degrees: vec![1; n],
            nonzero_index: FxHashSet::default(),
            known_powers: FxHashMap::default(),
            solved_values: FxHashMap::default(),
        };
        factory.refresh_caches();
        Ok(factory)
    }

    /// Creates a factory over a fusion table with the built-in solver.
    ///
    /// # Errors
    ///
    /// Returns `RankTooLarge` if the table's labels do not fit an [`Anyon`].
    pub fn from_table(table: FusionTable) -> Result<Self> {
        Self::new(Arc::new(table), Arc::new(BuchbergerSolver::default()))
    }

    /// Returns the fusion rules.
    #[must_use]
    pub fn rules(&self) -> &dyn FusionRules {
        self.rules.as_ref()
    }

    /// Returns the Gröbner basis back end.
    #[must_use]
    pub fn solver(&self) -> &dyn GroebnerSolver<Q> {
        self.solver.as_ref()
    }

    /// Returns the basis.
    #[must_use]
    pub fn basis(&self) -> &[Anyon] {
        &self.basis
    }

    /// Returns the unit object.
    #[must_use]
    pub fn unit(&self) -> Anyon {
        self.unit
    }

    /// Returns the number of F-symbol variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the F-symbols in variable order.
    #[must_use]
    pub fn symbols(&self) -> &[FSymbol] {
        &self.symbols
    }

    /// Returns the F-symbol of a variable.
    #[must_use]
    pub fn symbol(&self, v: Var) -> Option<FSymbol> {
        self.symbols.get(v.index()).copied()
    }

    /// Returns the variable of an F-symbol.
    #[must_use]
    pub fn var(&self, symbol: &FSymbol) -> Option<Var> {
        self.index.get(symbol).copied()
    }

    /// Returns the current value of an F-symbol variable.
    #[must_use]
    pub fn fvar(&self, symbol: &FSymbol) -> Option<&SparsePoly<Q>> {
        self.fvars.get(symbol)
    }

    /// Returns true if `v` is solved.
    #[must_use]
    pub fn is_solved(&self, v: Var) -> bool {
        self.solved.get(v.index()).copied().unwrap_or(false)
    }

    /// Returns true if `v` is known to be nonzero.
    #[must_use]
    pub fn is_nonzero(&self, v: Var) -> bool {
        self.nonzero_index.contains(&v)
    }

    /// Returns the known-nonzero variables.
    #[must_use]
    pub fn nonzero_index(&self) -> &FxHashSet<Var> {
        &self.nonzero_index
    }

    /// Returns the known squares.
    #[must_use]
    pub fn known_squares(&self) -> &FxHashMap<Var, Q> {
        &self.known_squares
    }

    /// Returns the power tables `[1, v, v^2, ...]` of constant solved variables.
    #[must_use]
    pub fn known_powers(&self) -> &FxHashMap<Var, Vec<Q>> {
        &self.known_powers
    }

    /// Returns the non-constant values of solved variables.
    #[must_use]
    pub fn solved_values(&self) -> &FxHashMap<Var, SparsePoly<Q>> {
        &self.solved_values
    }

    /// Returns the degree bound of `v`.
    #[must_use]
    pub fn var_degree(&self, v: Var) -> u32 {
        self.var_degrees.get(v.index()).copied().unwrap_or(0)
    }

    /// Returns the constant value of a solved variable, if it has one.
    #[must_use]
    pub fn known_value(&self, v: Var) -> Option<Q> {
        self.known_powers.get(&v).and_then(|p| p.get(1)).cloned()
    }

    /// R-matrix scalar `R^{ab}_c`.
    #[must_use]
    pub fn r_matrix(&self, a: Anyon, b: Anyon, c: Anyon) -> Q {
        self.rules.r_matrix(a, b, c)
    }

    /// Classifies `F(a,b,c,d,x,y)` without cloning anything.
    pub(crate) fn lookup(&self, s: FSymbol) -> Lookup<'_> {
        let [a, b, c, d, x, y] = s;
        let rules = self.rules.as_ref();
        if !(rules.fuses(a, b, x)
            && rules.fuses(x, c, d)
            && rules.fuses(b, c, y)
            && rules.fuses(a, y, d))
        {
            return Lookup::Zero;
        }

        let fixed = if a == self.unit {
            Some(x == b && y == d)
        } else if b == self.unit {
            Some(x == a && y == c)
        } else if c == self.unit {
            Some(x == d && y == b)
        } else {
            None
        };

        match fixed {
            Some(true) => Lookup::One,
            Some(false) => Lookup::Zero,
            None => self.fvars.get(&s).map_or(Lookup::Zero, Lookup::Stored),
        }
    }

    /// The F-symbol `F(a,b,c,d,x,y)`.
    ///
    /// Inadmissible labels give 0 and labels involving the unit give a
    /// fixed 0 or 1, both without touching the value table.
    #[must_use]
    pub fn fmat(&self, a: Anyon, b: Anyon, c: Anyon, d: Anyon, x: Anyon, y: Anyon) -> Cow<'_, SparsePoly<Q>> {
        match self.lookup([a, b, c, d, x, y]) {
            Lookup::Zero => Cow::Owned(SparsePoly::zero()),
            Lookup::One => Cow::Owned(SparsePoly::one()),
            Lookup::Stored(p) => Cow::Borrowed(p),
        }
    }

    fn check_var(&self, v: Var) -> Result<usize> {
        let i = v.index();
        if i < self.num_vars() {
            Ok(i)
        } else {
            Err(EngineError::UnknownVariable {
                var: v,
                count: self.num_vars(),
            })
        }
    }

    /// Records `v = value` and marks `v` solved.
    ///
    /// # Errors
    ///
    /// Returns `UnknownVariable` if `v` is not a variable of this factory.
    pub fn solve_variable(&mut self, v: Var, value: SparsePoly<Q>) -> Result<()> {
        let i = self.check_var(v)?;
        self.fvars.insert(self.symbols[i], value);
        self.solved[i] = true;
        self.refresh_caches();
        Ok(())
    }

    /// Records that `v` is nonzero.
    ///
    /// # Errors
    ///
    /// Returns `UnknownVariable` if `v` is not a variable of this factory.
    pub fn mark_nonzero(&mut self, v: Var) -> Result<()> {
        let i = self.check_var(v)?;
        self.known_nonzero[i] = true;
        self.refresh_caches();
        Ok(())
    }

    /// Records the known square `v^2 = square`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownVariable` if `v` is not a variable of this factory.
    pub fn set_known_square(&mut self, v: Var, square: Q) -> Result<()> {
        self.check_var(v)?;
        self.known_squares.insert(v, square);
        Ok(())
    }

    /// Sets the degree bound of `v`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownVariable` if `v` is not a variable of this factory.
    pub fn set_var_degree(&mut self, v: Var, degree: u32) -> Result<()> {
        let i = self.check_var(v)?;
        self.var_degrees[i] = degree;
        self.refresh_caches();
        Ok(())
    }

    /// Learns known squares from equations of the form `c1*v^2 + c0`.
    ///
    /// Returns the number of squares recorded.
    pub fn learn_known_squares<'a, I>(&mut self, equations: I) -> usize
    where
        I: IntoIterator<Item = &'a SparsePoly<Q>>,
    {
        let mut learned = 0;
        for eq in equations {
            if let Some((v, square)) = crate::reduce::fixes_square(eq) {
                if v.index() < self.num_vars() {
                    self.known_squares.insert(v, square);
                    learned += 1;
                }
            }
        }
        learned
    }

    /// Snapshots the mutable state for a broadcast.
    #[must_use]
    pub fn state_update(&self) -> StateUpdate {
        StateUpdate {
            fvars: self.fvars.clone(),
            solved: self.solved.clone(),
            known_nonzero: self.known_nonzero.clone(),
            known_squares: self.known_squares.clone(),
            var_degrees: self.var_degrees.clone(),
        }
    }

    /// Overwrites the mutable state and rebuilds the derived caches.
    ///
    /// # Errors
    ///
    /// Returns `InconsistentUpdate` if a per-variable vector has the wrong
    /// length; the factory is left unchanged in that case.
    pub fn apply_update(&mut self, update: &StateUpdate) -> Result<()> {
        let expected = self.num_vars();
        for found in [
            update.solved.len(),
            update.known_nonzero.len(),
            update.var_degrees.len(),
        ] {
            if found != expected {
                return Err(EngineError::InconsistentUpdate { expected, found });
            }
        }

        self.fvars.clone_from(&update.fvars);
        self.solved.clone_from(&update.solved);
        self.known_nonzero.clone_from(&update.known_nonzero);
        self.known_squares.clone_from(&update.known_squares);
        self.var_degrees.clone_from(&update.var_degrees);
        self.refresh_caches();
        Ok(())
    }

    /// Rebuilds the nonzero index, the known-power tables and the
    /// polynomial values of solved variables.
    fn refresh_caches(&mut self) {
        self.nonzero_index = self
            .known_nonzero
            .iter()
            .zip(0u32..)
            .filter(|(nz, _)| **nz)
            .map(|(_, i)| Var(i))
            .collect();

        self.known_powers.clear();
        self.solved_values.clear();
        for (i, sym) in self.symbols.iter().enumerate() {
            if !self.solved[i] {
                continue;
            }
            let (Some(poly), Ok(i)) = (self.fvars.get(sym), u32::try_from(i)) else {
                continue;
            };
            let Some(value) = poly.as_constant() else {
                self.solved_values.insert(Var(i), poly.clone());
                continue;
            };
            let degree = self.var_degrees[i as usize].max(1);
            let mut powers = Vec::with_capacity(degree as usize + 1);
            let mut acc = Q::one();
            for _ in 0..=degree {
                powers.push(acc.clone());
                acc = acc * value.clone();
            }
            self.known_powers.insert(Var(i), powers);
        }
    }

    /// Summarizes the mutable state.
    #[must_use]
    pub fn digest(&self) -> StateDigest {
        let mut hasher = FxHasher::default();
        for sym in &self.symbols {
            self.fvars.get(sym).hash(&mut hasher);
        }
        self.solved.hash(&mut hasher);
        self.known_nonzero.hash(&mut hasher);
        self.var_degrees.hash(&mut hasher);

        let mut squares: Vec<_> = self.known_squares.iter().collect();
        squares.sort();
        squares.hash(&mut hasher);

        StateDigest {
            num_vars: self.num_vars(),
            solved: self.solved.iter().filter(|&&s| s).count(),
            known_nonzero: self.nonzero_index.len(),
            known_squares: self.known_squares.len(),
            state_hash: hasher.finish(),
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("rank", &self.basis.len())
            .field("num_vars", &self.num_vars())
            .field("solved", &self.solved.iter().filter(|&&s| s).count())
            .field("known_nonzero", &self.nonzero_index.len())
            .field("solver", &self.solver.name())
            .finish_non_exhaustive()
    }
}
