//! Sparse multivariate polynomials.
//!
//! A [`SparsePoly`] is canonical: terms are sorted by descending grevlex,
//! like terms are combined and zero coefficients are dropped. Two
//! polynomials are therefore equal exactly when their term vectors are
//! equal, which lets them serve directly as set and map keys.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use fmat_rings::{Field, Ring, Q};

use crate::monomial::{cmp_grevlex, Monomial, Var};

/// A sparse multivariate polynomial in canonical form.
///
/// The derived `Ord` compares term vectors and is only meant for
/// deterministic set ordering.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SparsePoly<R: Ring> {
    /// Terms in descending grevlex order, no zero coefficients.
    terms: Vec<(Monomial, R)>,
}

impl<R: Ring> Default for SparsePoly<R> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<R: Ring> SparsePoly<R> {
    /// Creates a new polynomial from terms.
    ///
    /// Terms are automatically sorted and combined.
    #[must_use]
    pub fn new(terms: Vec<(Monomial, R)>) -> Self {
        let mut poly = Self { terms };
        poly.normalize();
        poly
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one() -> Self {
        Self::constant(R::one())
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: R) -> Self {
        Self::term(Monomial::one(), c)
    }

    /// Creates a single term `c * m`.
    #[must_use]
    pub fn term(m: Monomial, c: R) -> Self {
        if c.is_zero() {
            Self::zero()
        } else {
            Self { terms: vec![(m, c)] }
        }
    }

    /// Creates the polynomial `v`.
    #[must_use]
    pub fn var(v: Var) -> Self {
        Self::term(Monomial::var(v), R::one())
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the constant value if the polynomial has no variables.
    #[must_use]
    pub fn as_constant(&self) -> Option<R> {
        match self.terms.as_slice() {
            [] => Some(R::zero()),
            [(m, c)] if m.is_one() => Some(c.clone()),
            _ => None,
        }
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the terms.
    #[must_use]
    pub fn terms(&self) -> &[(Monomial, R)] {
        &self.terms
    }

    /// Returns the leading monomial.
    #[must_use]
    pub fn leading_monomial(&self) -> Option<&Monomial> {
        self.terms.first().map(|(m, _)| m)
    }

    /// Returns the leading coefficient.
    #[must_use]
    pub fn leading_coeff(&self) -> Option<&R> {
        self.terms.first().map(|(_, c)| c)
    }

    /// Returns the leading term (monomial, coefficient).
    #[must_use]
    pub fn leading_term(&self) -> Option<&(Monomial, R)> {
        self.terms.first()
    }

    /// Returns the sorted, deduplicated variables that occur.
    #[must_use]
    pub fn variables(&self) -> Vec<Var> {
        let mut vars: Vec<Var> = self.terms.iter().flat_map(|(m, _)| m.vars()).collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// Returns the largest exponent of `v` over all terms.
    #[must_use]
    pub fn degree_in(&self, v: Var) -> u32 {
        self.terms.iter().map(|(m, _)| m.exponent(v)).max().unwrap_or(0)
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|(m, _)| m.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Sorts terms and combines like terms.
    fn normalize(&mut self) {
        // Descending so the leading term comes first
        self.terms.sort_by(|a, b| cmp_grevlex(&b.0, &a.0));

        let mut combined: Vec<(Monomial, R)> = Vec::with_capacity(self.terms.len());
        for (m, c) in self.terms.drain(..) {
            match combined.last_mut() {
                Some((last, acc)) if *last == m => *acc = acc.clone() + c,
                _ => {
                    if combined.last().is_some_and(|(_, acc)| acc.is_zero()) {
                        combined.pop();
                    }
                    combined.push((m, c));
                }
            }
        }
        if combined.last().is_some_and(|(_, acc)| acc.is_zero()) {
            combined.pop();
        }

        self.terms = combined;
    }

    /// Merges two sorted term lists, negating `other` when asked.
    fn merge(&self, other: &Self, negate_other: bool) -> Self {
        let (a, b) = (&self.terms, &other.terms);
        let mut terms = Vec::with_capacity(a.len() + b.len());
        let rhs = |c: &R| if negate_other { -c.clone() } else { c.clone() };
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            match cmp_grevlex(&a[i].0, &b[j].0) {
                Ordering::Greater => {
                    terms.push(a[i].clone());
                    i += 1;
                }
                Ordering::Less => {
                    terms.push((b[j].0.clone(), rhs(&b[j].1)));
                    j += 1;
                }
                Ordering::Equal => {
                    let c = a[i].1.clone() + rhs(&b[j].1);
                    if !c.is_zero() {
                        terms.push((a[i].0.clone(), c));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        terms.extend(a[i..].iter().cloned());
        terms.extend(b[j..].iter().map(|(m, c)| (m.clone(), rhs(c))));

        Self { terms }
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        self.merge(other, false)
    }

    /// Subtracts two polynomials.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.merge(other, true)
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c.clone())).collect(),
        }
    }

    /// Multiplies two polynomials (schoolbook algorithm).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }

        let mut terms = Vec::with_capacity(self.len() * other.len());
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                terms.push((m1.mul(m2), c1.clone() * c2.clone()));
            }
        }

        Self::new(terms)
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero();
        }

        Self {
            terms: self.terms.iter().map(|(m, x)| (m.clone(), x.clone() * c.clone())).collect(),
        }
    }

    /// Multiplies by the term `c * m`.
    #[must_use]
    pub fn mul_monomial(&self, m: &Monomial, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero();
        }

        // Multiplying by a monomial preserves the order
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m2, c2)| (m.mul(m2), c2.clone() * c.clone()))
                .collect(),
        }
    }

    /// Computes `self^n` by repeated squaring.
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;

        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul(&base);
            }
            exp >>= 1;
            if exp > 0 {
                base = base.mul(&base);
            }
        }

        result
    }

    /// Replaces variables by polynomials.
    ///
    /// `value` returns the replacement for a variable, or `None` to keep it.
    #[must_use]
    pub fn substitute<F>(&self, mut value: F) -> Self
    where
        F: FnMut(Var) -> Option<Self>,
    {
        let mut acc = Self::zero();
        for (m, c) in &self.terms {
            let mut kept = Vec::new();
            let mut term = Self::one();
            for &(v, e) in m.factors() {
                match value(v) {
                    Some(p) => term = term.mul(&p.pow(e)),
                    None => kept.push((v, e)),
                }
            }
            acc = acc.add(&term.mul_monomial(&Monomial::from_factors(kept), c));
        }
        acc
    }

    /// Renames every variable through `map`.
    #[must_use]
    pub fn rename<F: Fn(Var) -> Var>(&self, map: F) -> Self {
        Self::new(
            self.terms
                .iter()
                .map(|(m, c)| (m.rename(&map), c.clone()))
                .collect(),
        )
    }

    /// Evaluates the polynomial exactly.
    ///
    /// Returns `None` as soon as `value` has no value for an occurring variable.
    pub fn eval<F>(&self, mut value: F) -> Option<R>
    where
        F: FnMut(Var) -> Option<R>,
    {
        let mut acc = R::zero();
        for (m, c) in &self.terms {
            let mut t = c.clone();
            for &(v, e) in m.factors() {
                t = t * value(v)?.pow(e);
            }
            acc = acc + t;
        }
        Some(acc)
    }
}

impl<R: Field> SparsePoly<R> {
    /// Scales the polynomial so its leading coefficient is 1.
    ///
    /// The zero polynomial is returned unchanged.
    #[must_use]
    pub fn make_monic(&self) -> Self {
        match self.leading_coeff().and_then(Field::inv) {
            Some(inv) if !inv.is_one() => self.scale(&inv),
            _ => self.clone(),
        }
    }
}

impl SparsePoly<Q> {
    /// Evaluates the polynomial in floating point.
    ///
    /// Non-finite values propagate, so a `NaN` input yields a `NaN` result.
    pub fn eval_f64<F>(&self, mut value: F) -> f64
    where
        F: FnMut(Var) -> f64,
    {
        self.terms
            .iter()
            .map(|(m, c)| {
                m.factors().iter().fold(c.to_f64(), |t, &(v, e)| {
                    t * value(v).powi(i32::try_from(e).unwrap_or(i32::MAX))
                })
            })
            .sum()
    }
}

impl<R: Ring> Add for &SparsePoly<R> {
    type Output = SparsePoly<R>;

    fn add(self, rhs: Self) -> Self::Output {
        SparsePoly::add(self, rhs)
    }
}

impl<R: Ring> Sub for &SparsePoly<R> {
    type Output = SparsePoly<R>;

    fn sub(self, rhs: Self) -> Self::Output {
        SparsePoly::sub(self, rhs)
    }
}

impl<R: Ring> Mul for &SparsePoly<R> {
    type Output = SparsePoly<R>;

    fn mul(self, rhs: Self) -> Self::Output {
        SparsePoly::mul(self, rhs)
    }
}

impl<R: Ring> Neg for &SparsePoly<R> {
    type Output = SparsePoly<R>;

    fn neg(self) -> Self::Output {
        SparsePoly::neg(self)
    }
}

impl<R: Ring + fmt::Display> fmt::Display for SparsePoly<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let terms: Vec<_> = self
            .terms
            .iter()
            .map(|(m, c)| {
                if m.is_one() {
                    format!("{c}")
                } else if c.is_one() {
                    format!("{m}")
                } else {
                    format!("{c}*{m}")
                }
            })
            .collect();

        write!(f, "{}", terms.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(i: u32) -> SparsePoly<Q> {
        SparsePoly::var(Var(i))
    }

    fn c(n: i64) -> SparsePoly<Q> {
        SparsePoly::constant(Q::from_integer(n))
    }

    #[test]
    fn test_sparse_basic() {
        let sum = x(0).add(&x(1));
        assert_eq!(sum.len(), 2);
        assert_eq!(sum.leading_monomial(), Some(&Monomial::var(Var(0))));
        assert!(sum.sub(&sum).is_zero());
    }

    #[test]
    fn test_sparse_mul() {
        // (x + 1)^2 = x^2 + 2x + 1
        let xp1 = x(0).add(&c(1));
        let sq = xp1.mul(&xp1);
        assert_eq!(sq.len(), 3);
        assert_eq!(sq, xp1.pow(2));
        assert_eq!(sq.leading_coeff(), Some(&Q::one()));
        assert_eq!(sq.as_constant(), None);
    }

    #[test]
    fn test_canonical_form_is_order_independent() {
        let a = SparsePoly::new(vec![
            (Monomial::one(), Q::from_integer(-1)),
            (Monomial::power(Var(2), 2), Q::one()),
            (Monomial::var(Var(0)), Q::from_integer(3)),
            (Monomial::one(), Q::from_integer(1)),
        ]);
        let b = x(2).mul(&x(2)).add(&x(0).scale(&Q::from_integer(3)));
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_make_monic() {
        let p = x(0).scale(&Q::from_integer(2)).sub(&c(4));
        let monic = p.make_monic();
        assert_eq!(monic, x(0).sub(&c(2)));
        assert!(SparsePoly::<Q>::zero().make_monic().is_zero());
    }

    #[test]
    fn test_substitute_and_eval() {
        // x0^2 - x1 with x1 := x0^2 vanishes
        let p = x(0).mul(&x(0)).sub(&x(1));
        let q = p.substitute(|v| (v == Var(1)).then(|| x(0).mul(&x(0))));
        assert!(q.is_zero());

        let val = p.eval(|v| Some(Q::from_integer(i64::from(v.0) + 2)));
        assert_eq!(val, Some(Q::from_integer(1)));
        assert_eq!(p.eval(|_| None), None);
    }

    #[test]
    fn test_eval_f64_propagates_nan() {
        let p = x(0).sub(&c(1));
        assert!((p.eval_f64(|_| 3.0) - 2.0).abs() < 1e-12);
        assert!(p.eval_f64(|_| f64::NAN).is_nan());
    }

    #[test]
    fn test_display() {
        let p = x(0).mul(&x(0)).sub(&c(1));
        assert_eq!(p.to_string(), "x0^2 + -1");
        assert_eq!(SparsePoly::<Q>::zero().to_string(), "0");
    }
}
