//! Property-based tests for partitioning and reduction.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rustc_hash::{FxHashMap, FxHashSet};

    use crate::partition::{assign, IndexSpace, Partition};
    use crate::reduce::{reduce, ReductionParams};
    use fmat_poly::{Monomial, SparsePoly, Var};
    use fmat_rings::{Ring, Q};

    // Polynomials in x0..x3 of degree at most 3 per variable
    fn small_poly() -> impl Strategy<Value = SparsePoly<Q>> {
        let monomial = proptest::collection::vec((0u32..4, 0u32..4), 0..3)
            .prop_map(|fs| Monomial::from_factors(fs.into_iter().map(|(v, e)| (Var(v), e))));
        proptest::collection::vec((monomial, -4i64..5), 1..5).prop_map(|terms| {
            SparsePoly::new(
                terms
                    .into_iter()
                    .map(|(m, c)| (m, Q::from_integer(c)))
                    .collect(),
            )
        })
    }

    // Known state over x0..x3: nonzero flags, squares and solved constants
    #[allow(clippy::type_complexity)]
    fn known_state() -> impl Strategy<
        Value = (FxHashSet<Var>, FxHashMap<Var, Q>, FxHashMap<Var, Vec<Q>>),
    > {
        let slot = prop_oneof![
            Just(0u8),
            Just(1u8),
            Just(2u8),
            Just(3u8),
        ];
        (proptest::collection::vec(slot, 4), proptest::collection::vec(-3i64..4, 4)).prop_map(
            |(kinds, values)| {
                let mut nonzero = FxHashSet::default();
                let mut squares = FxHashMap::default();
                let mut powers = FxHashMap::default();
                for (i, (kind, value)) in (0u32..).zip(kinds.into_iter().zip(values)) {
                    let v = Var(i);
                    let q = Q::from_integer(value);
                    match kind {
                        1 => {
                            nonzero.insert(v);
                        }
                        2 if !q.is_zero() => {
                            squares.insert(v, q);
                        }
                        3 => {
                            powers.insert(v, vec![Q::one(), q.clone(), q.clone() * q]);
                        }
                        _ => {}
                    }
                }
                (nonzero, squares, powers)
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn partitions_cover_exactly_once(total in 1u64..400, count in 1usize..12) {
            let mut seen = vec![0u32; usize::try_from(total).unwrap()];
            for w in 0..count {
                let mut last = None;
                for pos in assign(total, w, count).unwrap() {
                    prop_assert_eq!(pos % count as u64, w as u64);
                    prop_assert!(last.map_or(true, |l| l < pos));
                    last = Some(pos);
                    seen[usize::try_from(pos).unwrap()] += 1;
                }
            }
            prop_assert!(seen.iter().all(|&n| n == 1));
        }

        #[test]
        fn tuple_lookup_is_direct(radix in 1usize..6, pos in 0u64..10_000) {
            let space = IndexSpace::<6>::new(radix).unwrap();
            let pos = pos % space.total();
            let walked = space.tuples(Partition::whole()).nth(usize::try_from(pos).unwrap());
            prop_assert_eq!(Some(space.tuple_at(pos)), walked);
        }

        #[test]
        fn reduction_is_idempotent(eq in small_poly(), state in known_state()) {
            let (nonzero, known_squares, known_powers) = state;
            let solved_values = FxHashMap::default();
            let params = ReductionParams {
                nonzero: &nonzero,
                known_powers: &known_powers,
                known_squares: &known_squares,
                solved_values: &solved_values,
            };
            let once = reduce(&eq, &params);
            let twice = reduce(&once.poly, &params);
            prop_assert_eq!(once.poly, twice.poly);
        }

        #[test]
        fn reduced_equations_are_monic(eq in small_poly(), state in known_state()) {
            let (nonzero, known_squares, known_powers) = state;
            let solved_values = FxHashMap::default();
            let params = ReductionParams {
                nonzero: &nonzero,
                known_powers: &known_powers,
                known_squares: &known_squares,
                solved_values: &solved_values,
            };
            let reduced = reduce(&eq, &params);
            if let Some(lc) = reduced.poly.leading_coeff() {
                prop_assert!(lc.is_one());
            }
        }
    }
}
