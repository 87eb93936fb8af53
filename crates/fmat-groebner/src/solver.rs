//! Pluggable Gröbner basis back ends.

use std::fmt;

use fmat_poly::{MonomialOrder, SparsePoly};
use fmat_rings::Field;

use crate::buchberger::{groebner_basis, GroebnerConfig};

/// A Gröbner basis back end.
///
/// Implementations must return the reduced basis: monic, minimal and
/// interreduced, so equal ideals give equal outputs.
pub trait GroebnerSolver<R: Field>: Send + Sync + fmt::Debug {
    /// Computes the reduced Gröbner basis of `generators` under `order`.
    fn basis(&self, generators: &[SparsePoly<R>], order: MonomialOrder) -> Vec<SparsePoly<R>>;

    /// Returns a short name for logging.
    fn name(&self) -> &'static str;
}

/// The built-in Buchberger back end.
#[derive(Clone, Debug, Default)]
pub struct BuchbergerSolver {
    config: GroebnerConfig,
}

impl BuchbergerSolver {
    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn new(config: GroebnerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GroebnerConfig {
        &self.config
    }
}

impl<R: Field + Send + Sync> GroebnerSolver<R> for BuchbergerSolver {
    fn basis(&self, generators: &[SparsePoly<R>], order: MonomialOrder) -> Vec<SparsePoly<R>> {
        groebner_basis(generators, order, &self.config)
    }

    fn name(&self) -> &'static str {
        "buchberger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmat_poly::Var;
    use fmat_rings::Q;
    use std::sync::Arc;

    #[test]
    fn test_solver_behind_trait_object() {
        let solver: Arc<dyn GroebnerSolver<Q>> = Arc::new(BuchbergerSolver::default());
        let x = SparsePoly::<Q>::var(Var(0));
        let one = SparsePoly::<Q>::one();

        // 2x - 2 gives x - 1
        let gens = [x.scale(&Q::from_integer(2)).sub(&one.scale(&Q::from_integer(2)))];
        let basis = solver.basis(&gens, MonomialOrder::Grevlex);
        assert_eq!(basis, vec![x.sub(&one)]);
        assert_eq!(solver.name(), "buchberger");
    }
}
