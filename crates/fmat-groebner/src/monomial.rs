//! Packed monomial representation for Gröbner basis computation.
//!
//! Inside a basis computation the variables are remapped onto a dense
//! range `0..n`, so monomials are stored as exponent vectors of length
//! `n` with a cached total degree.

use std::cmp::Ordering;
use std::fmt;

use fmat_poly::{Monomial, MonomialOrder, Var};
use smallvec::SmallVec;

/// A dense monomial over `num_vars` variables.
///
/// Exponents are stored as `u16`; products saturate instead of wrapping.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PackedMonomial {
    /// Exponents for each variable (x_0, x_1, ..., x_{n-1}).
    exponents: SmallVec<[u16; 16]>,
    /// Cached total degree.
    total_degree: u32,
}

impl PackedMonomial {
    /// Creates a new monomial with the given exponents.
    #[must_use]
    pub fn new(exps: &[u16]) -> Self {
        Self {
            exponents: SmallVec::from_slice(exps),
            total_degree: exps.iter().map(|&e| u32::from(e)).sum(),
        }
    }

    /// Creates the identity monomial (1).
    #[must_use]
    pub fn one(num_vars: usize) -> Self {
        Self {
            exponents: SmallVec::from_elem(0, num_vars),
            total_degree: 0,
        }
    }

    /// Creates a monomial for a single variable: x_i.
    #[must_use]
    pub fn var(i: usize, num_vars: usize) -> Self {
        let mut m = Self::one(num_vars);
        if i < num_vars {
            m.exponents[i] = 1;
            m.total_degree = 1;
        }
        m
    }

    /// Packs a sparse monomial whose variables all lie in `0..num_vars`.
    ///
    /// Returns `None` if a variable is out of range.
    #[must_use]
    pub fn from_sparse(m: &Monomial, num_vars: usize) -> Option<Self> {
        let mut exponents: SmallVec<[u16; 16]> = SmallVec::from_elem(0, num_vars);
        for &(v, e) in m.factors() {
            let slot = exponents.get_mut(v.index())?;
            *slot = u16::try_from(e).unwrap_or(u16::MAX);
        }
        let total_degree = exponents.iter().map(|&e| u32::from(e)).sum();
        Some(Self {
            exponents,
            total_degree,
        })
    }

    /// Unpacks into a sparse monomial over `x0..x{n-1}`.
    #[must_use]
    pub fn to_sparse(&self) -> Monomial {
        Monomial::from_factors(self.exponents.iter().enumerate().filter_map(|(i, &e)| {
            let v = Var(u32::try_from(i).ok()?);
            Some((v, u32::from(e)))
        }))
    }

    /// Returns the exponent of variable i.
    #[must_use]
    pub fn exponent(&self, i: usize) -> u16 {
        self.exponents.get(i).copied().unwrap_or(0)
    }

    /// Returns the exponents as a slice.
    #[must_use]
    pub fn exponents(&self) -> &[u16] {
        &self.exponents
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.exponents.len()
    }

    /// Returns the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.total_degree
    }

    /// Checks if this is the identity monomial (1).
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.total_degree == 0
    }

    fn zip_with<F: Fn(u16, u16) -> u16>(&self, other: &Self, f: F) -> Self {
        let n = self.num_vars().max(other.num_vars());
        let exponents: SmallVec<[u16; 16]> =
            (0..n).map(|i| f(self.exponent(i), other.exponent(i))).collect();
        let total_degree = exponents.iter().map(|&e| u32::from(e)).sum();
        Self {
            exponents,
            total_degree,
        }
    }

    /// Multiplies two monomials.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        self.zip_with(other, u16::saturating_add)
    }

    /// Divides this monomial by another, if divisible.
    ///
    /// Returns `None` if `other` does not divide `self`.
    #[must_use]
    pub fn div(&self, other: &Self) -> Option<Self> {
        if !self.is_divisible_by(other) {
            return None;
        }
        Some(self.zip_with(other, |a, b| a - b))
    }

    /// Checks if `other` divides `self`.
    #[must_use]
    pub fn is_divisible_by(&self, other: &Self) -> bool {
        if other.total_degree > self.total_degree {
            return false;
        }
        let n = self.num_vars().max(other.num_vars());
        (0..n).all(|i| other.exponent(i) <= self.exponent(i))
    }

    /// Computes the least common multiple of two monomials.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        self.zip_with(other, u16::max)
    }

    /// Checks if two monomials are coprime (GCD = 1).
    #[must_use]
    pub fn is_coprime(&self, other: &Self) -> bool {
        self.exponents
            .iter()
            .zip(other.exponents.iter())
            .all(|(&a, &b)| a == 0 || b == 0)
    }

    /// Compares using lexicographic order.
    #[must_use]
    pub fn cmp_lex(&self, other: &Self) -> Ordering {
        let n = self.num_vars().max(other.num_vars());
        for i in 0..n {
            match self.exponent(i).cmp(&other.exponent(i)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }

    /// Compares using graded lexicographic order.
    #[must_use]
    pub fn cmp_grlex(&self, other: &Self) -> Ordering {
        self.total_degree
            .cmp(&other.total_degree)
            .then_with(|| self.cmp_lex(other))
    }

    /// Compares using graded reverse lexicographic order.
    #[must_use]
    pub fn cmp_grevlex(&self, other: &Self) -> Ordering {
        match self.total_degree.cmp(&other.total_degree) {
            Ordering::Equal => {}
            ord => return ord,
        }

        // Last variable first; the smaller exponent wins
        let n = self.num_vars().max(other.num_vars());
        for i in (0..n).rev() {
            match self.exponent(i).cmp(&other.exponent(i)) {
                Ordering::Equal => {}
                ord => return ord.reverse(),
            }
        }
        Ordering::Equal
    }

    /// Compares according to `order`.
    #[must_use]
    pub fn cmp_by(&self, other: &Self, order: MonomialOrder) -> Ordering {
        match order {
            MonomialOrder::Lex => self.cmp_lex(other),
            MonomialOrder::Grlex => self.cmp_grlex(other),
            MonomialOrder::Grevlex => self.cmp_grevlex(other),
        }
    }
}

impl fmt::Debug for PackedMonomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mono({})", self.to_sparse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_lcm() {
        let a = PackedMonomial::new(&[2, 1, 0]); // x^2 y
        let b = PackedMonomial::new(&[1, 0, 3]); // x z^3

        assert_eq!(a.mul(&b), PackedMonomial::new(&[3, 1, 3]));
        assert_eq!(a.lcm(&b), PackedMonomial::new(&[2, 1, 3]));
        assert_eq!(a.mul(&b).div(&b), Some(a.clone()));
        assert_eq!(a.div(&b), None);
        assert!(!a.is_coprime(&b));
        assert!(PackedMonomial::new(&[0, 1, 0]).is_coprime(&b));
    }

    #[test]
    fn test_orders_agree_with_sparse() {
        let mons = [
            PackedMonomial::new(&[2, 0, 0]),
            PackedMonomial::new(&[1, 0, 1]),
            PackedMonomial::new(&[0, 2, 0]),
            PackedMonomial::new(&[0, 1, 1]),
            PackedMonomial::new(&[1, 0, 0]),
            PackedMonomial::one(3),
        ];
        for order in [MonomialOrder::Lex, MonomialOrder::Grlex, MonomialOrder::Grevlex] {
            for a in &mons {
                for b in &mons {
                    assert_eq!(
                        a.cmp_by(b, order),
                        order.compare(&a.to_sparse(), &b.to_sparse()),
                        "{order}: {a:?} vs {b:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_sparse_roundtrip() {
        let sparse = Monomial::from_factors([(Var(0), 2), (Var(2), 1)]);
        let packed = PackedMonomial::from_sparse(&sparse, 3).unwrap();
        assert_eq!(packed.exponents(), &[2, 0, 1]);
        assert_eq!(packed.to_sparse(), sparse);
        assert!(PackedMonomial::from_sparse(&sparse, 2).is_none());
    }
}
