//! Canonical reduction of raw equations.
//!
//! The steps run in a fixed order:
//!
//! 1. substitute polynomial values of solved variables, then constant
//!    values, then known squares (`x^e` becomes `s^(e/2) x^(e%2)`);
//! 2. if the result is `c1*v^2 + c0`, return `v^2 + c0/c1` directly;
//! 3. otherwise divide out the largest monomial in known-nonzero variables
//!    that divides every term, and make the result monic.
//!
//! The zero polynomial is the canonical "no information" result.

use fmat_poly::{Monomial, SparsePoly, Var};
use fmat_rings::{Field, Ring, Q};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{EngineError, Result};
use crate::factory::Factory;

/// The factory state a reduction reads.
#[derive(Clone, Copy, Debug)]
pub struct ReductionParams<'a> {
    /// Variables known to be nonzero.
    pub nonzero: &'a FxHashSet<Var>,
    /// Power tables `[1, v, v^2, ...]` of constant solved variables.
    pub known_powers: &'a FxHashMap<Var, Vec<Q>>,
    /// Known squares `v^2 = s`.
    pub known_squares: &'a FxHashMap<Var, Q>,
    /// Non-constant values of solved variables.
    pub solved_values: &'a FxHashMap<Var, SparsePoly<Q>>,
}

impl<'a> ReductionParams<'a> {
    /// Reads the parameters off a factory.
    #[must_use]
    pub fn from_factory(factory: &'a Factory) -> Self {
        Self {
            nonzero: factory.nonzero_index(),
            known_powers: factory.known_powers(),
            known_squares: factory.known_squares(),
            solved_values: factory.solved_values(),
        }
    }
}

/// Which step produced a reduced equation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReductionPath {
    /// The equation reduced to zero.
    Vanished,
    /// The monic-square fast path.
    SquareFix,
    /// Nonzero-factor stripping and monic normalization.
    Generic,
}

/// A reduced equation together with the path that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reduced {
    /// The canonical equation.
    pub poly: SparsePoly<Q>,
    /// How it was reached.
    pub path: ReductionPath,
}

impl Reduced {
    /// Returns true if the equation carries no information.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.poly.is_zero()
    }
}

/// Returns `(v, s)` if `eq` has the shape `c1*v^2 + c0` with `c0 != 0`,
/// meaning `v^2 = s = -c0/c1`.
#[must_use]
pub fn fixes_square(eq: &SparsePoly<Q>) -> Option<(Var, Q)> {
    let [(high, c1), (low, c0)] = eq.terms() else {
        return None;
    };
    match high.as_power() {
        Some((v, 2)) if low.is_one() => Some((v, -c0.field_div(c1))),
        _ => None,
    }
}

/// Replaces solved variables by their polynomial values until none is left.
///
/// Values may mention other solved variables; a cycle stops after one pass
/// per solved variable.
fn substitute_solved(eq: &SparsePoly<Q>, values: &FxHashMap<Var, SparsePoly<Q>>) -> SparsePoly<Q> {
    let mut current = eq.clone();
    for _ in 0..values.len() {
        if !values.keys().any(|&v| current.degree_in(v) > 0) {
            break;
        }
        current = current.substitute(|v| values.get(&v).cloned());
    }
    current
}

/// Step 1: polynomial values, then constant values, then known squares.
fn substitute_known(eq: &SparsePoly<Q>, params: &ReductionParams<'_>) -> SparsePoly<Q> {
    let eq = if params.solved_values.is_empty() {
        eq.clone()
    } else {
        substitute_solved(eq, params.solved_values)
    };
    if params.known_powers.is_empty() && params.known_squares.is_empty() {
        return eq;
    }

    let terms = eq
        .terms()
        .iter()
        .map(|(m, c)| {
            let mut coeff = c.clone();
            let mut factors = Vec::with_capacity(m.factors().len());
            for &(v, e) in m.factors() {
                if let Some(powers) = params.known_powers.get(&v) {
                    let power = match powers.get(e as usize) {
                        Some(p) => p.clone(),
                        None => powers.get(1).map_or_else(Q::zero, |x| x.pow(e)),
                    };
                    coeff = coeff * power;
                } else if let Some(square) = params.known_squares.get(&v) {
                    coeff = coeff * square.pow(e / 2);
                    factors.push((v, e % 2));
                } else {
                    factors.push((v, e));
                }
            }
            (Monomial::from_factors(factors), coeff)
        })
        .collect();
    SparsePoly::new(terms)
}

/// Step 3: divides out the common factor in known-nonzero variables.
fn strip_nonzero_factor(eq: &SparsePoly<Q>, nonzero: &FxHashSet<Var>) -> SparsePoly<Q> {
    if nonzero.is_empty() {
        return eq.clone();
    }
    let Some((first, rest)) = eq.terms().split_first() else {
        return eq.clone();
    };

    let common = rest
        .iter()
        .fold(first.0.restrict(|v| nonzero.contains(&v)), |acc, (m, _)| acc.gcd(m));
    if common.is_one() {
        return eq.clone();
    }

    let terms = eq
        .terms()
        .iter()
        .filter_map(|(m, c)| Some((m.div(&common)?, c.clone())))
        .collect();
    SparsePoly::new(terms)
}

/// Reduces a raw equation to canonical form.
#[must_use]
pub fn reduce(eq: &SparsePoly<Q>, params: &ReductionParams<'_>) -> Reduced {
    let substituted = substitute_known(eq, params);
    if substituted.is_zero() {
        return Reduced {
            poly: substituted,
            path: ReductionPath::Vanished,
        };
    }

    if fixes_square(&substituted).is_some() {
        return Reduced {
            poly: substituted.make_monic(),
            path: ReductionPath::SquareFix,
        };
    }

    Reduced {
        poly: strip_nonzero_factor(&substituted, params.nonzero).make_monic(),
        path: ReductionPath::Generic,
    }
}

/// Reduces an equation and checks that a second pass leaves it unchanged.
///
/// # Errors
///
/// Returns `ReductionAmbiguity` if reducing the result changes it again.
pub fn reduce_checked(eq: &SparsePoly<Q>, params: &ReductionParams<'_>) -> Result<Reduced> {
    let first = reduce(eq, params);
    let second = reduce(&first.poly, params);
    if second.poly != first.poly {
        return Err(EngineError::ReductionAmbiguity {
            equation: eq.to_string(),
            first: first.poly.to_string(),
            second: second.poly.to_string(),
        });
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::{Anyon, FusionTable};

    fn x(i: u32) -> SparsePoly<Q> {
        SparsePoly::var(Var(i))
    }

    fn c(n: i64) -> SparsePoly<Q> {
        SparsePoly::constant(Q::from_integer(n))
    }

    fn fib() -> Factory {
        let t = Anyon(1);
        Factory::from_table(
            FusionTable::new(2, Anyon(0))
                .with_fusion(t, t, Anyon(0), 1)
                .with_fusion(t, t, t, 1),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_vanishes() {
        let z2 = Factory::from_table(FusionTable::cyclic(2)).unwrap();
        let params = ReductionParams::from_factory(&z2);
        let r = reduce(&SparsePoly::zero(), &params);
        assert_eq!(r.path, ReductionPath::Vanished);
        assert!(r.is_zero());
    }

    #[test]
    fn test_generic_makes_monic() {
        let z2 = Factory::from_table(FusionTable::cyclic(2)).unwrap();
        let params = ReductionParams::from_factory(&z2);
        // x0 - x0^2 without nonzero info keeps the factor x0
        let eq = x(0).sub(&x(0).mul(&x(0)));
        let r = reduce(&eq, &params);
        assert_eq!(r.path, ReductionPath::Generic);
        assert_eq!(r.poly, x(0).mul(&x(0)).sub(&x(0)));
    }

    #[test]
    fn test_nonzero_factor_is_stripped() {
        let mut z2 = Factory::from_table(FusionTable::cyclic(2)).unwrap();
        z2.mark_nonzero(Var(0)).unwrap();
        let params = ReductionParams::from_factory(&z2);
        let eq = x(0).sub(&x(0).mul(&x(0)));
        let r = reduce(&eq, &params);
        assert_eq!(r.path, ReductionPath::Generic);
        assert_eq!(r.poly, x(0).sub(&c(1)));
    }

    #[test]
    fn test_square_fix_fast_path() {
        let mut f = fib();
        f.set_known_square(Var(0), Q::one()).unwrap();
        let params = ReductionParams::from_factory(&f);

        // 2 x0^2 x2^2 - 4 becomes x2^2 - 2
        let eq = c(2).mul(&x(0).pow(2)).mul(&x(2).pow(2)).sub(&c(4));
        let r = reduce(&eq, &params);
        assert_eq!(r.path, ReductionPath::SquareFix);
        assert_eq!(r.poly, x(2).pow(2).sub(&c(2)));
        assert_eq!(fixes_square(&r.poly), Some((Var(2), Q::from_integer(2))));
    }

    #[test]
    fn test_known_powers_substitute() {
        let mut z3 = Factory::from_table(FusionTable::cyclic(3)).unwrap();
        z3.set_var_degree(Var(1), 2).unwrap();
        z3.solve_variable(Var(1), c(-1)).unwrap();
        let params = ReductionParams::from_factory(&z3);

        // x1^3 x2 + x2 = (-1 + 1) x2
        let eq = x(1).pow(3).mul(&x(2)).add(&x(2));
        assert_eq!(reduce(&eq, &params).path, ReductionPath::Vanished);

        // 3 x1^2 x2 - 3 = 3 x2 - 3
        let eq = c(3).mul(&x(1).pow(2)).mul(&x(2)).sub(&c(3));
        assert_eq!(reduce(&eq, &params).poly, x(2).sub(&c(1)));
    }

    #[test]
    fn test_polynomial_values_substitute_in_chains() {
        let mut z3 = Factory::from_table(FusionTable::cyclic(3)).unwrap();
        z3.solve_variable(Var(1), x(0).mul(&x(2))).unwrap();
        z3.solve_variable(Var(2), x(3).add(&c(1))).unwrap();
        assert_eq!(z3.solved_values().len(), 2);
        let params = ReductionParams::from_factory(&z3);

        // x1 - x0 = x0 x3 + x0 - x0
        let r = reduce(&x(1).sub(&x(0)), &params);
        assert_eq!(r.poly, x(0).mul(&x(3)));
        assert_eq!(reduce(&r.poly, &params).poly, r.poly);
    }

    #[test]
    fn test_odd_powers_keep_one_factor() {
        let mut z3 = Factory::from_table(FusionTable::cyclic(3)).unwrap();
        z3.set_known_square(Var(0), Q::from_integer(3)).unwrap();
        let params = ReductionParams::from_factory(&z3);

        // x0^3 x1 - x1 = 3 x0 x1 - x1, monic x0 x1 - 1/3 x1
        let eq = x(0).pow(3).mul(&x(1)).sub(&x(1));
        let r = reduce(&eq, &params);
        let expected = x(0).mul(&x(1)).sub(&x(1).scale(&Q::new(1, 3)));
        assert_eq!(r.poly, expected);
    }

    #[test]
    fn test_reduce_checked_accepts_stable_results() {
        let mut f = fib();
        f.mark_nonzero(Var(1)).unwrap();
        f.set_known_square(Var(0), Q::one()).unwrap();
        let params = ReductionParams::from_factory(&f);

        let eq = c(2).mul(&x(0).pow(2)).mul(&x(1)).mul(&x(2).pow(2)).sub(&c(4).mul(&x(1)));
        let r = reduce_checked(&eq, &params).unwrap();
        assert_eq!(r.path, ReductionPath::Generic);
        assert_eq!(r.poly, x(2).pow(2).sub(&c(2)));
    }

    #[test]
    fn test_fixes_square_shapes() {
        assert_eq!(fixes_square(&x(3).pow(2).sub(&c(5))), Some((Var(3), Q::from_integer(5))));
        assert_eq!(fixes_square(&x(3).pow(2)), None);
        assert_eq!(fixes_square(&x(3).sub(&c(5))), None);
        assert_eq!(fixes_square(&x(3).pow(2).sub(&x(1))), None);
    }
}
