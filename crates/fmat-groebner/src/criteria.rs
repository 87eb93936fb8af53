//! Criteria for detecting useless S-polynomials, and pair selection.
//!
//! These criteria allow early rejection of pairs that would reduce to zero.

use rustc_hash::FxHashSet;

use crate::monomial::PackedMonomial;
use crate::pair::{pair_key, CriticalPair};

/// Checks Buchberger's first criterion (product criterion).
///
/// If lcm(lm(f), lm(g)) = lm(f) * lm(g) (i.e., leading monomials are coprime),
/// then S(f, g) reduces to zero.
#[must_use]
pub fn product_criterion(lm_f: &PackedMonomial, lm_g: &PackedMonomial) -> bool {
    lm_f.is_coprime(lm_g)
}

/// Checks the chain criterion (Buchberger's second criterion).
///
/// The pair (f, g) is redundant if some other basis element h has lm(h)
/// dividing lcm(lm(f), lm(g)) while neither (f, h) nor (g, h) is pending.
///
/// `pending` must not contain the pair under test. Callers decide pairs one
/// at a time and remove each decided pair from `pending`, so no two pairs
/// can discard each other.
#[must_use]
pub fn chain_criterion(
    pair: &CriticalPair,
    leading: &[PackedMonomial],
    pending: &FxHashSet<(usize, usize)>,
) -> bool {
    leading.iter().enumerate().any(|(k, lm_h)| {
        k != pair.i
            && k != pair.j
            && pair.lcm.is_divisible_by(lm_h)
            && !pending.contains(&pair_key(pair.i, k))
            && !pending.contains(&pair_key(pair.j, k))
    })
}

/// Selects pairs to process using the "sugar" strategy.
///
/// Removes and returns up to `batch_size` pairs of minimal sugar degree,
/// ties broken by lcm degree and then by index for determinism.
pub fn sugar_selection(pairs: &mut Vec<CriticalPair>, batch_size: usize) -> Vec<CriticalPair> {
    if pairs.is_empty() {
        return vec![];
    }

    pairs.sort_by(|a, b| {
        a.sugar
            .cmp(&b.sugar)
            .then_with(|| a.lcm.total_degree().cmp(&b.lcm.total_degree()))
            .then_with(|| a.key().cmp(&b.key()))
    });

    let min_sugar = pairs[0].sugar;
    let n = pairs
        .iter()
        .take_while(|p| p.sugar == min_sugar)
        .count()
        .min(batch_size.max(1));
    pairs.drain(..n).collect()
}

/// Selects pairs in creation order, ignoring sugar.
pub fn fifo_selection(pairs: &mut Vec<CriticalPair>, batch_size: usize) -> Vec<CriticalPair> {
    let n = pairs.len().min(batch_size.max(1));
    pairs.drain(..n).collect()
}
