//! Property-based tests for sparse polynomial arithmetic.

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use proptest::prelude::*;

    use crate::monomial::{Monomial, Var};
    use crate::ordering::MonomialOrder;
    use crate::sparse::SparsePoly;
    use fmat_rings::{Ring, Q};

    // Monomials in x0..x3 with exponents up to 2
    fn small_monomial() -> impl Strategy<Value = Monomial> {
        proptest::collection::vec((0u32..4, 0u32..3), 0..4)
            .prop_map(|fs| Monomial::from_factors(fs.into_iter().map(|(v, e)| (Var(v), e))))
    }

    fn small_poly() -> impl Strategy<Value = SparsePoly<Q>> {
        proptest::collection::vec((small_monomial(), -9i64..10), 0..5).prop_map(|terms| {
            SparsePoly::new(
                terms
                    .into_iter()
                    .map(|(m, c)| (m, Q::from_integer(c)))
                    .collect(),
            )
        })
    }

    fn any_order() -> impl Strategy<Value = MonomialOrder> {
        prop_oneof![
            Just(MonomialOrder::Lex),
            Just(MonomialOrder::Grlex),
            Just(MonomialOrder::Grevlex),
        ]
    }

    proptest! {
        // Polynomial ring axioms

        #[test]
        fn poly_add_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(a.add(&b), b.add(&a));
        }

        #[test]
        fn poly_mul_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(a.mul(&b), b.mul(&a));
        }

        #[test]
        fn poly_mul_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assert_eq!(a.mul(&b).mul(&c), a.mul(&b.mul(&c)));
        }

        #[test]
        fn poly_distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
            // a * (b + c) = a * b + a * c
            let left = a.mul(&b.add(&c));
            let right = a.mul(&b).add(&a.mul(&c));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn poly_sub_self_is_zero(a in small_poly()) {
            prop_assert!(a.sub(&a).is_zero());
        }

        #[test]
        fn poly_canonical_after_merge(a in small_poly(), b in small_poly()) {
            // Merging must give the same result as re-normalizing from scratch
            let merged = a.add(&b);
            let mut raw = a.terms().to_vec();
            raw.extend(b.terms().iter().cloned());
            prop_assert_eq!(merged, SparsePoly::new(raw));
        }

        #[test]
        fn poly_eval_is_homomorphism(a in small_poly(), b in small_poly()) {
            let point = |v: Var| Some(Q::from_integer(i64::from(v.0) - 1));
            let lhs = a.mul(&b).eval(point);
            let rhs = a.eval(point).zip(b.eval(point)).map(|(x, y)| x * y);
            prop_assert_eq!(lhs, rhs);
        }

        // Monomial orders

        #[test]
        fn order_is_total(order in any_order(), a in small_monomial(), b in small_monomial()) {
            let ab = order.compare(&a, &b);
            prop_assert_eq!(ab, order.compare(&b, &a).reverse());
            prop_assert_eq!(ab == Ordering::Equal, a == b);
        }

        #[test]
        fn order_is_multiplicative(
            order in any_order(),
            a in small_monomial(),
            b in small_monomial(),
            c in small_monomial(),
        ) {
            prop_assert_eq!(order.compare(&a, &b), order.compare(&a.mul(&c), &b.mul(&c)));
        }

        #[test]
        fn one_is_minimal(order in any_order(), a in small_monomial()) {
            prop_assert_ne!(order.compare(&a, &Monomial::one()), Ordering::Less);
        }

        #[test]
        fn monomial_div_inverts_mul(a in small_monomial(), b in small_monomial()) {
            prop_assert_eq!(a.mul(&b).div(&b), Some(a.clone()));
            prop_assert!(b.divides(&a.mul(&b)));
            prop_assert!(a.gcd(&b).divides(&a));
        }
    }

    #[test]
    fn pow_matches_ring_pow_on_constants() {
        let two = SparsePoly::constant(Q::from_integer(2));
        assert_eq!(two.pow(5).as_constant(), Some(Q::from_integer(2).pow(5)));
    }
}
