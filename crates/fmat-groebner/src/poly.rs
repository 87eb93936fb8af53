//! Polynomials in the working representation of a basis computation.

use std::cmp::Ordering;

use fmat_poly::{MonomialOrder, SparsePoly};
use fmat_rings::{Field, Ring};

use crate::monomial::PackedMonomial;

/// A polynomial over packed monomials, sorted descending by its order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroebnerPoly<R> {
    /// Terms as (coefficient, monomial), leading term first.
    terms: Vec<(R, PackedMonomial)>,
    /// Sugar degree (for selection heuristics).
    pub sugar: u32,
    order: MonomialOrder,
}

impl<R: Field> GroebnerPoly<R> {
    /// Creates a polynomial from unsorted terms.
    ///
    /// Like terms are combined and zero coefficients dropped.
    #[must_use]
    pub fn new(mut terms: Vec<(R, PackedMonomial)>, order: MonomialOrder) -> Self {
        terms.sort_by(|a, b| b.1.cmp_by(&a.1, order));

        let mut combined: Vec<(R, PackedMonomial)> = Vec::with_capacity(terms.len());
        for (c, m) in terms {
            match combined.last_mut() {
                Some((acc, last)) if *last == m => *acc = acc.clone() + c,
                _ => combined.push((c, m)),
            }
        }
        combined.retain(|(c, _)| !c.is_zero());

        let sugar = combined.iter().map(|(_, m)| m.total_degree()).max().unwrap_or(0);
        Self {
            terms: combined,
            sugar,
            order,
        }
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero(order: MonomialOrder) -> Self {
        Self {
            terms: Vec::new(),
            sugar: 0,
            order,
        }
    }

    /// Converts a sparse polynomial whose variables lie in `0..num_vars`.
    ///
    /// Returns `None` if a variable is out of range.
    #[must_use]
    pub fn from_sparse(p: &SparsePoly<R>, num_vars: usize, order: MonomialOrder) -> Option<Self> {
        let terms = p
            .terms()
            .iter()
            .map(|(m, c)| Some((c.clone(), PackedMonomial::from_sparse(m, num_vars)?)))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(terms, order))
    }

    /// Converts back to a canonical sparse polynomial.
    #[must_use]
    pub fn to_sparse(&self) -> SparsePoly<R> {
        SparsePoly::new(
            self.terms
                .iter()
                .map(|(c, m)| (m.to_sparse(), c.clone()))
                .collect(),
        )
    }

    /// Returns the terms of the polynomial.
    #[must_use]
    pub fn terms(&self) -> &[(R, PackedMonomial)] {
        &self.terms
    }

    /// Returns the monomial order the terms are sorted by.
    #[must_use]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    /// Returns the leading monomial, if non-zero.
    #[must_use]
    pub fn leading_monomial(&self) -> Option<&PackedMonomial> {
        self.terms.first().map(|(_, m)| m)
    }

    /// Returns the leading coefficient, if non-zero.
    #[must_use]
    pub fn leading_coeff(&self) -> Option<&R> {
        self.terms.first().map(|(c, _)| c)
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Removes and returns the leading term.
    pub fn pop_leading(&mut self) -> Option<(R, PackedMonomial)> {
        if self.terms.is_empty() {
            None
        } else {
            Some(self.terms.remove(0))
        }
    }

    /// Scales so that the leading coefficient is 1.
    #[must_use]
    pub fn make_monic(mut self) -> Self {
        if let Some(inv) = self.leading_coeff().and_then(Field::inv) {
            if !inv.is_one() {
                for (c, _) in &mut self.terms {
                    *c = c.clone() * inv.clone();
                }
            }
        }
        self
    }

    /// Computes `self - coeff * mult * other` by merging sorted term lists.
    #[must_use]
    pub fn sub_mul(&self, coeff: &R, mult: &PackedMonomial, other: &Self) -> Self {
        let a = &self.terms;
        // Multiplying by a monomial keeps the order, so b stays sorted
        let b: Vec<(R, PackedMonomial)> = other
            .terms
            .iter()
            .map(|(c, m)| (-(c.clone() * coeff.clone()), m.mul(mult)))
            .collect();
        let mut terms = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            match a[i].1.cmp_by(&b[j].1, self.order) {
                Ordering::Greater => {
                    terms.push(a[i].clone());
                    i += 1;
                }
                Ordering::Less => {
                    terms.push(b[j].clone());
                    j += 1;
                }
                Ordering::Equal => {
                    let sum = a[i].0.clone() + b[j].0.clone();
                    if !sum.is_zero() {
                        terms.push((sum, b[j].1.clone()));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        terms.extend(a[i..].iter().cloned());
        terms.extend(b[j..].iter().cloned());

        let shifted = other.sugar + mult.total_degree();
        Self {
            terms,
            sugar: self.sugar.max(shifted),
            order: self.order,
        }
    }
}
