//! Sparse monomials over an unbounded variable set.
//!
//! F-symbol systems declare hundreds of variables while any single term
//! touches only a handful, so a monomial stores just its non-zero
//! `(variable, exponent)` factors, sorted by variable index.

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

/// A polynomial variable, identified by its index.
///
/// Lower indices are the "larger" variables in every monomial order
/// (`x0 > x1 > x2 > ...`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Var(pub u32);

impl Var {
    /// Returns the index as a `usize`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

type Factors = SmallVec<[(Var, u32); 4]>;

/// A monomial `x_i^a * x_j^b * ...` with strictly increasing variables and
/// positive exponents.
///
/// The derived `Ord` is a structural order for use as a set key; term
/// orders live in [`crate::MonomialOrder`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Monomial {
    factors: Factors,
}

impl Monomial {
    /// Creates the monomial 1.
    #[must_use]
    pub fn one() -> Self {
        Self::default()
    }

    /// Creates the monomial `v`.
    #[must_use]
    pub fn var(v: Var) -> Self {
        Self::power(v, 1)
    }

    /// Creates the monomial `v^e`.
    #[must_use]
    pub fn power(v: Var, e: u32) -> Self {
        let mut factors = Factors::new();
        if e > 0 {
            factors.push((v, e));
        }
        Self { factors }
    }

    /// Creates a monomial from arbitrary factors.
    ///
    /// Factors may be unsorted and repeated; zero exponents are dropped.
    #[must_use]
    pub fn from_factors<I: IntoIterator<Item = (Var, u32)>>(iter: I) -> Self {
        let mut factors: Factors = iter.into_iter().filter(|&(_, e)| e > 0).collect();
        factors.sort_unstable_by_key(|&(v, _)| v);

        let mut merged = Factors::with_capacity(factors.len());
        for (v, e) in factors {
            match merged.last_mut() {
                Some((last, acc)) if *last == v => *acc += e,
                _ => merged.push((v, e)),
            }
        }
        Self { factors: merged }
    }

    /// Returns the `(variable, exponent)` factors in increasing variable order.
    #[must_use]
    pub fn factors(&self) -> &[(Var, u32)] {
        &self.factors
    }

    /// Returns the variables of this monomial in increasing order.
    pub fn vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.factors.iter().map(|&(v, _)| v)
    }

    /// Returns the exponent of `v`.
    #[must_use]
    pub fn exponent(&self, v: Var) -> u32 {
        self.factors
            .binary_search_by_key(&v, |&(w, _)| w)
            .map_or(0, |i| self.factors[i].1)
    }

    /// Returns the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.factors.iter().map(|&(_, e)| e).sum()
    }

    /// Returns true if this is the monomial 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.factors.is_empty()
    }

    /// Returns `Some(v)` if this monomial is `v^e` for a single variable.
    #[must_use]
    pub fn as_power(&self) -> Option<(Var, u32)> {
        match self.factors.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Multiplies two monomials.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let (a, b) = (&self.factors, &other.factors);
        let mut factors = Factors::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                Ordering::Less => {
                    factors.push(a[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    factors.push(b[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    factors.push((a[i].0, a[i].1 + b[j].1));
                    i += 1;
                    j += 1;
                }
            }
        }
        factors.extend_from_slice(&a[i..]);
        factors.extend_from_slice(&b[j..]);

        Self { factors }
    }

    /// Divides this monomial by another, if divisible.
    ///
    /// Returns `None` if `other` does not divide `self`.
    #[must_use]
    pub fn div(&self, other: &Self) -> Option<Self> {
        let mut factors = Factors::with_capacity(self.factors.len());
        let mut rest = other.factors.iter().peekable();

        for &(v, e) in &self.factors {
            match rest.peek() {
                Some(&&(w, d)) if w == v => {
                    rest.next();
                    if d > e {
                        return None;
                    }
                    if d < e {
                        factors.push((v, e - d));
                    }
                }
                Some(&&(w, _)) if w < v => return None,
                _ => factors.push((v, e)),
            }
        }

        if rest.next().is_some() {
            return None;
        }
        Some(Self { factors })
    }

    /// Returns true if `self` divides `other`.
    #[must_use]
    pub fn divides(&self, other: &Self) -> bool {
        self.factors.iter().all(|&(v, e)| other.exponent(v) >= e)
    }

    /// Computes the greatest common divisor of two monomials.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        let factors = self
            .factors
            .iter()
            .filter_map(|&(v, e)| {
                let m = e.min(other.exponent(v));
                (m > 0).then_some((v, m))
            })
            .collect();
        Self { factors }
    }

    /// Keeps only the factors whose variable satisfies `keep`.
    #[must_use]
    pub fn restrict<F: Fn(Var) -> bool>(&self, keep: F) -> Self {
        let factors = self.factors.iter().copied().filter(|&(v, _)| keep(v)).collect();
        Self { factors }
    }

    /// Renames every variable through `map`.
    ///
    /// The result is re-sorted, so `map` need not be monotone.
    #[must_use]
    pub fn rename<F: Fn(Var) -> Var>(&self, map: F) -> Self {
        Self::from_factors(self.factors.iter().map(|&(v, e)| (map(v), e)))
    }
}

impl fmt::Debug for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mono({self})")
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_empty() {
            return write!(f, "1");
        }
        for (i, &(v, e)) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            if e == 1 {
                write!(f, "{v}")?;
            } else {
                write!(f, "{v}^{e}")?;
            }
        }
        Ok(())
    }
}

/// Compares two monomials lexicographically.
pub fn cmp_lex(a: &Monomial, b: &Monomial) -> Ordering {
    let (fa, fb) = (a.factors(), b.factors());
    let (mut i, mut j) = (0, 0);

    loop {
        match (fa.get(i), fb.get(j)) {
            (Some(&(va, ea)), Some(&(vb, eb))) => match va.cmp(&vb) {
                // b has exponent 0 in va
                Ordering::Less => return Ordering::Greater,
                Ordering::Greater => return Ordering::Less,
                Ordering::Equal => {
                    if ea != eb {
                        return ea.cmp(&eb);
                    }
                    i += 1;
                    j += 1;
                }
            },
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Compares two monomials by graded lexicographic order.
pub fn cmp_grlex(a: &Monomial, b: &Monomial) -> Ordering {
    a.total_degree()
        .cmp(&b.total_degree())
        .then_with(|| cmp_lex(a, b))
}

/// Compares two monomials by graded reverse lexicographic order.
pub fn cmp_grevlex(a: &Monomial, b: &Monomial) -> Ordering {
    match a.total_degree().cmp(&b.total_degree()) {
        Ordering::Equal => {}
        ord => return ord,
    }

    // Walk from the last variable; the first difference decides, reversed.
    let (fa, fb) = (a.factors(), b.factors());
    let (mut i, mut j) = (fa.len(), fb.len());

    while i > 0 && j > 0 {
        let (va, ea) = fa[i - 1];
        let (vb, eb) = fb[j - 1];
        match va.cmp(&vb) {
            // a has exponent 0 in vb
            Ordering::Less => return Ordering::Greater,
            Ordering::Greater => return Ordering::Less,
            Ordering::Equal => {
                if ea != eb {
                    return eb.cmp(&ea);
                }
                i -= 1;
                j -= 1;
            }
        }
    }

    // Equal total degree and one side exhausted means both are.
    Ordering::Equal
}
