//! Hexagon and pentagon equations.
//!
//! Both generators only read the factory. F-symbols go through the
//! factory's lookup so that inadmissible labels and labels involving the
//! unit never reach the value table.

use fmat_poly::SparsePoly;
use fmat_rings::{Ring, Q};
use rustc_hash::FxHashMap;

use crate::factory::{FSymbol, Factory, Lookup};
use crate::fusion::Anyon;

/// Index tuple of a hexagon equation `(a, b, c, d, e, g)`.
pub type HexagonTuple = [Anyon; 6];

/// Index tuple of a pentagon equation `(a, b, c, d, e, f, g, k, l)`.
pub type PentagonTuple = [Anyon; 9];

/// Multiplies looked-up F-symbols and a scalar; `None` when any factor is 0.
fn product(factors: &[Lookup<'_>], scalar: &Q) -> Option<SparsePoly<Q>> {
    if scalar.is_zero() {
        return None;
    }
    let mut acc = SparsePoly::constant(scalar.clone());
    for f in factors {
        match f {
            Lookup::Zero => return None,
            Lookup::One => {}
            Lookup::Stored(p) => acc = acc.mul(p),
        }
    }
    (!acc.is_zero()).then_some(acc)
}

/// The hexagon equation `H(a,b,c,d,e,g)` as `lhs - rhs`, where
///
/// ```text
/// lhs = R(a,c,e) F(a,c,b,d,e,g) R(b,c,g)
/// rhs = sum_f F(c,a,b,d,e,f) R(f,c,d) F(a,b,c,d,f,g)
/// ```
#[must_use]
pub fn hexagon(factory: &Factory, [a, b, c, d, e, g]: HexagonTuple) -> SparsePoly<Q> {
    let r_scalar = factory.r_matrix(a, c, e) * factory.r_matrix(b, c, g);
    let mut eq = product(&[factory.lookup([a, c, b, d, e, g])], &r_scalar).unwrap_or_default();

    for &f in factory.basis() {
        let first = factory.lookup([c, a, b, d, e, f]);
        if matches!(first, Lookup::Zero) {
            continue;
        }
        let r = factory.r_matrix(f, c, d);
        if let Some(term) = product(&[first, factory.lookup([a, b, c, d, f, g])], &r) {
            eq = eq.sub(&term);
        }
    }
    eq
}

/// The pentagon equation `P(a,b,c,d,e,f,g,k,l)` as `lhs - rhs`, where
///
/// ```text
/// lhs = F(f,c,d,e,g,l) F(a,b,l,e,f,k)
/// rhs = sum_h F(a,b,c,g,f,h) F(a,h,d,e,g,k) F(b,c,d,k,h,l)
/// ```
///
/// With `prune` set, an equation whose `lhs` vanishes is returned as 0.
#[must_use]
pub fn pentagon(factory: &Factory, [a, b, c, d, e, f, g, k, l]: PentagonTuple, prune: bool) -> SparsePoly<Q> {
    let one = Q::one();
    let lhs = product(
        &[factory.lookup([f, c, d, e, g, l]), factory.lookup([a, b, l, e, f, k])],
        &one,
    );
    if prune && lhs.is_none() {
        return SparsePoly::zero();
    }

    let mut eq = lhs.unwrap_or_default();
    for &h in factory.basis() {
        let first = factory.lookup([a, b, c, g, f, h]);
        if matches!(first, Lookup::Zero) {
            continue;
        }
        let factors = [
            first,
            factory.lookup([a, h, d, e, g, k]),
            factory.lookup([b, c, d, k, h, l]),
        ];
        if let Some(term) = product(&factors, &one) {
            eq = eq.sub(&term);
        }
    }
    eq
}

/// Floating-point values of every stored F-symbol.
///
/// A variable without a constant value evaluates to NaN, and so does every
/// F-symbol that depends on one.
#[derive(Clone, Debug)]
pub struct NumericFvars<'a> {
    factory: &'a Factory,
    values: FxHashMap<FSymbol, f64>,
}

impl<'a> NumericFvars<'a> {
    /// Evaluates the factory's current F-symbol values.
    #[must_use]
    pub fn new(factory: &'a Factory) -> Self {
        let values = factory
            .symbols()
            .iter()
            .map(|sym| {
                let value = factory.fvar(sym).map_or(f64::NAN, |p| {
                    p.eval_f64(|v| factory.known_value(v).map_or(f64::NAN, |q| q.to_f64()))
                });
                (*sym, value)
            })
            .collect();
        Self { factory, values }
    }

    /// Numeric `F(a,b,c,d,x,y)`.
    #[must_use]
    pub fn fmat(&self, symbol: FSymbol) -> f64 {
        match self.factory.lookup(symbol) {
            Lookup::Zero => 0.0,
            Lookup::One => 1.0,
            Lookup::Stored(_) => self.values.get(&symbol).copied().unwrap_or(f64::NAN),
        }
    }

    /// `lhs - rhs` of the pentagon equation, evaluated numerically.
    #[must_use]
    pub fn pentagon_residual(&self, [a, b, c, d, e, f, g, k, l]: PentagonTuple) -> f64 {
        let lhs = self.fmat([f, c, d, e, g, l]) * self.fmat([a, b, l, e, f, k]);
        let rhs: f64 = self
            .factory
            .basis()
            .iter()
            .filter(|&&h| !matches!(self.factory.lookup([a, b, c, g, f, h]), Lookup::Zero))
            .map(|&h| {
                self.fmat([a, b, c, g, f, h]) * self.fmat([a, h, d, e, g, k]) * self.fmat([b, c, d, k, h, l])
            })
            .sum();
        lhs - rhs
    }
}
