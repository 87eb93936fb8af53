//! Buchberger's algorithm with batched, parallel S-polynomial reduction.
//!
//! Pairs are selected in batches of equal sugar degree. Each batch is
//! filtered by the chain criterion sequentially, then all surviving
//! S-polynomials are reduced against the current basis in parallel.
//! Remainders are re-reduced and added one at a time, so the result does
//! not depend on thread scheduling.

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use fmat_poly::{MonomialOrder, SparsePoly};
use fmat_rings::Field;

use crate::criteria::{chain_criterion, fifo_selection, product_criterion, sugar_selection};
use crate::monomial::PackedMonomial;
use crate::pair::CriticalPair;
use crate::poly::GroebnerPoly;

/// Configuration for Buchberger's algorithm.
#[derive(Clone, Debug)]
pub struct GroebnerConfig {
    /// Maximum lcm degree of pairs to process (0 = no limit).
    ///
    /// A non-zero limit truncates the computation, so the result is only
    /// a Gröbner basis up to that degree.
    pub max_degree: u32,
    /// Whether to use the sugar selection strategy.
    pub use_sugar: bool,
    /// Whether to use Buchberger's chain criterion.
    pub use_chain_criterion: bool,
    /// Maximum number of pairs to process per iteration.
    pub batch_size: usize,
}

impl Default for GroebnerConfig {
    fn default() -> Self {
        Self {
            max_degree: 0,
            use_sugar: true,
            use_chain_criterion: true,
            batch_size: 64,
        }
    }
}

/// State of one Gröbner basis computation.
#[derive(Debug)]
pub struct Buchberger<R> {
    /// Current basis, every element monic.
    basis: Vec<GroebnerPoly<R>>,
    /// Leading monomials of `basis`, index-aligned.
    leading: Vec<PackedMonomial>,
    /// Pairs still to be processed.
    pairs: Vec<CriticalPair>,
    /// Keys of `pairs`.
    pending: FxHashSet<(usize, usize)>,
    config: GroebnerConfig,
    order: MonomialOrder,
}

impl<R: Field + Send + Sync> Buchberger<R> {
    /// Creates a new instance from generators.
    ///
    /// Zero generators are ignored.
    #[must_use]
    pub fn new(generators: Vec<GroebnerPoly<R>>, order: MonomialOrder, config: GroebnerConfig) -> Self {
        let mut gb = Self {
            basis: Vec::new(),
            leading: Vec::new(),
            pairs: Vec::new(),
            pending: FxHashSet::default(),
            config,
            order,
        };

        for g in generators {
            if !g.is_zero() {
                gb.add_to_basis(g.make_monic());
            }
        }
        gb
    }

    /// Computes the reduced Gröbner basis.
    ///
    /// The result is monic and sorted by descending leading monomial.
    #[must_use]
    pub fn compute(mut self) -> Vec<GroebnerPoly<R>> {
        while !self.pairs.is_empty() {
            self.step();
        }
        self.into_reduced()
    }

    /// Performs one step of the algorithm.
    fn step(&mut self) {
        let selected = if self.config.use_sugar {
            sugar_selection(&mut self.pairs, self.config.batch_size)
        } else {
            fifo_selection(&mut self.pairs, self.config.batch_size)
        };

        let mut kept = Vec::with_capacity(selected.len());
        for pair in selected {
            self.pending.remove(&pair.key());
            if self.config.use_chain_criterion
                && chain_criterion(&pair, &self.leading, &self.pending)
            {
                continue;
            }
            kept.push(pair);
        }

        let remainders: Vec<GroebnerPoly<R>> = kept
            .par_iter()
            .map(|pair| reduce_full(self.spoly(pair), &self.basis))
            .filter(|r| !r.is_zero())
            .collect();

        for r in remainders {
            // Earlier remainders of this batch may reduce it further
            let r = reduce_full(r, &self.basis);
            if !r.is_zero() {
                self.add_to_basis(r.make_monic());
            }
        }
    }

    /// Computes the S-polynomial for a pair of monic basis elements.
    fn spoly(&self, pair: &CriticalPair) -> GroebnerPoly<R> {
        let (f, g) = (&self.basis[pair.i], &self.basis[pair.j]);
        let (lm_f, lm_g) = (&self.leading[pair.i], &self.leading[pair.j]);

        let zero = GroebnerPoly::zero(self.order);
        match (pair.lcm.div(lm_f), pair.lcm.div(lm_g)) {
            // S(f, g) = (lcm / lm_f) * f - (lcm / lm_g) * g
            (Some(mult_f), Some(mult_g)) => zero
                .sub_mul(&-R::one(), &mult_f, f)
                .sub_mul(&R::one(), &mult_g, g),
            _ => zero,
        }
    }

    /// Adds a monic polynomial to the basis and generates new pairs.
    fn add_to_basis(&mut self, poly: GroebnerPoly<R>) {
        let Some(lm_new) = poly.leading_monomial().cloned() else {
            return;
        };

        if lm_new.is_one() {
            // The ideal is the whole ring
            self.basis = vec![poly];
            self.leading = vec![lm_new];
            self.pairs.clear();
            self.pending.clear();
            return;
        }

        let new_idx = self.basis.len();
        for (i, lm_i) in self.leading.iter().enumerate() {
            // Skip if coprime
            if product_criterion(lm_i, &lm_new) {
                continue;
            }

            let pair = CriticalPair::new(i, new_idx, lm_i, &lm_new, self.basis[i].sugar, poly.sugar);

            // Check degree limit
            if self.config.max_degree > 0 && pair.lcm.total_degree() > self.config.max_degree {
                continue;
            }

            self.pending.insert(pair.key());
            self.pairs.push(pair);
        }

        self.basis.push(poly);
        self.leading.push(lm_new);
    }

    /// Minimalizes and interreduces the basis.
    fn into_reduced(self) -> Vec<GroebnerPoly<R>> {
        let order = self.order;
        let mut polys: Vec<(PackedMonomial, GroebnerPoly<R>)> =
            self.leading.into_iter().zip(self.basis).collect();

        // A divisor never sorts after its multiple
        polys.sort_by(|a, b| a.0.cmp_by(&b.0, order));

        let mut minimal: Vec<GroebnerPoly<R>> = Vec::with_capacity(polys.len());
        let mut minimal_lms: Vec<PackedMonomial> = Vec::with_capacity(polys.len());
        for (lm, g) in polys {
            if !minimal_lms.iter().any(|h| lm.is_divisible_by(h)) {
                minimal_lms.push(lm);
                minimal.push(g);
            }
        }

        let mut reduced: Vec<GroebnerPoly<R>> = (0..minimal.len())
            .into_par_iter()
            .map(|k| {
                let others: Vec<GroebnerPoly<R>> = minimal
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != k)
                    .map(|(_, g)| g.clone())
                    .collect();
                reduce_full(minimal[k].clone(), &others).make_monic()
            })
            .collect();

        reduced.sort_by(|a, b| match (a.leading_monomial(), b.leading_monomial()) {
            (Some(x), Some(y)) => y.cmp_by(x, order),
            _ => std::cmp::Ordering::Equal,
        });
        reduced
    }
}

/// Fully reduces `p` by `basis` (leading and tail terms).
#[must_use]
pub fn reduce_full<R: Field>(mut p: GroebnerPoly<R>, basis: &[GroebnerPoly<R>]) -> GroebnerPoly<R> {
    let order = p.order();
    let mut remainder = Vec::new();

    while let Some(lm) = p.leading_monomial().cloned() {
        let reducer = basis.iter().find_map(|g| {
            let mult = lm.div(g.leading_monomial()?)?;
            let inv = g.leading_coeff().and_then(Field::inv)?;
            Some((g, mult, inv))
        });

        match reducer {
            Some((g, mult, inv)) => {
                let ratio = match p.leading_coeff() {
                    Some(lc) => lc.clone() * inv,
                    None => break,
                };
                p = p.sub_mul(&ratio, &mult, g);
            }
            None => {
                if let Some(term) = p.pop_leading() {
                    remainder.push(term);
                }
            }
        }
    }

    let mut result = GroebnerPoly::new(remainder, order);
    result.sugar = result.sugar.max(p.sugar);
    result
}

/// Computes the reduced Gröbner basis of sparse generators.
///
/// Variables are packed densely up to the largest index that occurs, so
/// callers with scattered indices should remap them first.
#[must_use]
pub fn groebner_basis<R>(
    generators: &[SparsePoly<R>],
    order: MonomialOrder,
    config: &GroebnerConfig,
) -> Vec<SparsePoly<R>>
where
    R: Field + Send + Sync,
{
    let num_vars = generators
        .iter()
        .flat_map(SparsePoly::variables)
        .map(|v| v.index() + 1)
        .max()
        .unwrap_or(0);

    // num_vars covers every occurring variable, so no conversion fails
    let packed: Vec<GroebnerPoly<R>> = generators
        .iter()
        .filter_map(|g| GroebnerPoly::from_sparse(g, num_vars, order))
        .collect();

    Buchberger::new(packed, order, config.clone())
        .compute()
        .iter()
        .map(GroebnerPoly::to_sparse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmat_poly::Var;
    use fmat_rings::{Ring, Q};

    type P = SparsePoly<Q>;

    fn x() -> P {
        P::var(Var(0))
    }

    fn y() -> P {
        P::var(Var(1))
    }

    fn z() -> P {
        P::var(Var(2))
    }

    fn c(n: i64) -> P {
        P::constant(Q::from_integer(n))
    }

    fn gb(gens: &[P], order: MonomialOrder) -> Vec<P> {
        let mut basis = groebner_basis(gens, order, &GroebnerConfig::default());
        basis.sort();
        basis
    }

    fn sorted(mut polys: Vec<P>) -> Vec<P> {
        polys.sort();
        polys
    }

    #[test]
    fn test_simple_grevlex() {
        // x^2 - y, xy - 1
        let gens = [x().mul(&x()).sub(&y()), x().mul(&y()).sub(&c(1))];
        let expected = sorted(vec![
            x().mul(&x()).sub(&y()),
            x().mul(&y()).sub(&c(1)),
            y().mul(&y()).sub(&x()),
        ]);
        assert_eq!(gb(&gens, MonomialOrder::Grevlex), expected);
    }

    #[test]
    fn test_simple_lex() {
        let gens = [x().mul(&x()).sub(&y()), x().mul(&y()).sub(&c(1))];
        let expected = sorted(vec![x().sub(&y().pow(2)), y().pow(3).sub(&c(1))]);
        assert_eq!(gb(&gens, MonomialOrder::Lex), expected);
    }

    #[test]
    fn test_quadratic_with_linear() {
        // x^2 - 1, y - x
        let gens = [x().mul(&x()).sub(&c(1)), y().sub(&x())];
        let expected = sorted(vec![y().mul(&y()).sub(&c(1)), x().sub(&y())]);
        assert_eq!(gb(&gens, MonomialOrder::Grevlex), expected);
        assert_eq!(gb(&gens, MonomialOrder::Lex), expected);
    }

    #[test]
    fn test_linear() {
        // x + y - 1, x - y - 1 gives x - 1, y
        let gens = [x().add(&y()).sub(&c(1)), x().sub(&y()).sub(&c(1))];
        let expected = sorted(vec![x().sub(&c(1)), y()]);
        assert_eq!(gb(&gens, MonomialOrder::Grevlex), expected);
    }

    #[test]
    fn test_cyclic_three_grevlex() {
        // xy - z, yz - x, xz - y
        let gens = [
            x().mul(&y()).sub(&z()),
            y().mul(&z()).sub(&x()),
            x().mul(&z()).sub(&y()),
        ];
        let z2 = z().pow(2);
        let expected = sorted(vec![
            z().pow(3).sub(&z()),
            x().pow(2).sub(&z2),
            x().mul(&y()).sub(&z()),
            y().pow(2).sub(&z2),
            x().mul(&z()).sub(&y()),
            y().mul(&z()).sub(&x()),
        ]);
        assert_eq!(gb(&gens, MonomialOrder::Grevlex), expected);
    }

    #[test]
    fn test_cyclic_three_lex() {
        let gens = [
            x().mul(&y()).sub(&z()),
            y().mul(&z()).sub(&x()),
            x().mul(&z()).sub(&y()),
        ];
        let expected = sorted(vec![
            x().sub(&y().mul(&z())),
            y().pow(2).sub(&z().pow(2)),
            y().mul(&z().pow(2)).sub(&y()),
            z().pow(3).sub(&z()),
        ]);
        assert_eq!(gb(&gens, MonomialOrder::Lex), expected);
    }

    #[test]
    fn test_unit_ideal() {
        let gens = [x(), x().sub(&c(1))];
        assert_eq!(gb(&gens, MonomialOrder::Grevlex), vec![c(1)]);
    }

    #[test]
    fn test_empty_and_zero_generators() {
        assert!(gb(&[], MonomialOrder::Grevlex).is_empty());
        assert!(gb(&[P::zero()], MonomialOrder::Grevlex).is_empty());
    }

    #[test]
    fn test_already_groebner() {
        let gens = [x(), y()];
        assert_eq!(gb(&gens, MonomialOrder::Grevlex), sorted(vec![x(), y()]));
    }

    #[test]
    fn test_criteria_do_not_change_result() {
        let gens = [
            x().mul(&y()).sub(&z()),
            y().mul(&z()).sub(&x()),
            x().mul(&z()).sub(&y()),
        ];
        let reference = gb(&gens, MonomialOrder::Grevlex);

        let plain = GroebnerConfig {
            use_sugar: false,
            use_chain_criterion: false,
            batch_size: 1,
            ..GroebnerConfig::default()
        };
        let mut basis = groebner_basis(&gens, MonomialOrder::Grevlex, &plain);
        basis.sort();
        assert_eq!(basis, reference);
    }

    #[test]
    fn test_result_is_monic_in_its_order() {
        let gens = [x().scale(&Q::from_integer(3)).sub(&y().mul(&y()).scale(&Q::from_integer(6)))];
        for order in [MonomialOrder::Lex, MonomialOrder::Grevlex] {
            let packed: Vec<_> = gens
                .iter()
                .filter_map(|g| GroebnerPoly::from_sparse(g, 2, order))
                .collect();
            let basis = Buchberger::new(packed, order, GroebnerConfig::default()).compute();
            assert_eq!(basis.len(), 1);
            assert!(basis[0].leading_coeff().is_some_and(Ring::is_one));
        }
    }
}
