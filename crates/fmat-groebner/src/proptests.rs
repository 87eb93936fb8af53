//! Property-based tests for Gröbner basis computation.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::buchberger::{groebner_basis, reduce_full, GroebnerConfig};
    use crate::poly::GroebnerPoly;
    use fmat_poly::{Monomial, MonomialOrder, SparsePoly, Var};
    use fmat_rings::Q;

    // Polynomials in x0, x1, x2 of degree at most 2
    fn small_poly() -> impl Strategy<Value = SparsePoly<Q>> {
        let monomial = proptest::collection::vec((0u32..3, 0u32..2), 0..3)
            .prop_map(|fs| Monomial::from_factors(fs.into_iter().map(|(v, e)| (Var(v), e))));
        proptest::collection::vec((monomial, -3i64..4), 1..4).prop_map(|terms| {
            SparsePoly::new(
                terms
                    .into_iter()
                    .map(|(m, c)| (m, Q::from_integer(c)))
                    .collect(),
            )
        })
    }

    fn any_order() -> impl Strategy<Value = MonomialOrder> {
        prop_oneof![Just(MonomialOrder::Lex), Just(MonomialOrder::Grevlex)]
    }

    fn packed(polys: &[SparsePoly<Q>], order: MonomialOrder) -> Vec<GroebnerPoly<Q>> {
        polys
            .iter()
            .filter_map(|p| GroebnerPoly::from_sparse(p, 3, order))
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn generators_reduce_to_zero(
            gens in proptest::collection::vec(small_poly(), 1..4),
            order in any_order(),
        ) {
            let basis = groebner_basis(&gens, order, &GroebnerConfig::default());
            let basis = packed(&basis, order);
            for g in packed(&gens, order) {
                prop_assert!(reduce_full(g, &basis).is_zero());
            }
        }

        #[test]
        fn reduced_basis_is_idempotent(
            gens in proptest::collection::vec(small_poly(), 1..4),
            order in any_order(),
        ) {
            let config = GroebnerConfig::default();
            let once = groebner_basis(&gens, order, &config);
            let twice = groebner_basis(&once, order, &config);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn generator_order_is_irrelevant(
            gens in proptest::collection::vec(small_poly(), 1..4),
        ) {
            let config = GroebnerConfig::default();
            let mut reversed = gens.clone();
            reversed.reverse();
            prop_assert_eq!(
                groebner_basis(&gens, MonomialOrder::Grevlex, &config),
                groebner_basis(&reversed, MonomialOrder::Grevlex, &config)
            );
        }
    }
}
