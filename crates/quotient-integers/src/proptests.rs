//! Property-based tests for the scalar arithmetic the eliminator relies on.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;
    use std::cmp::Ordering;

    use crate::{Integer, ModInt, Rational};

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn div_rem_reconstructs(a in small_int(), b in non_zero_int()) {
            let (a, b) = (Integer::new(a), Integer::new(b));
            let (q, r) = a.div_rem(&b);
            prop_assert_eq!(q * b.clone() + r.clone(), a);
            prop_assert_eq!(r.cmp_abs(&b), Ordering::Less);
        }

        #[test]
        fn cmp_abs_matches_machine_integers(a in small_int(), b in small_int()) {
            let expected = a.unsigned_abs().cmp(&b.unsigned_abs());
            prop_assert_eq!(Integer::new(a).cmp_abs(&Integer::new(b)), expected);
        }

        #[test]
        fn gcd_divides_both(a in non_zero_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let g = a.gcd(&b);

            prop_assert!((a % g.clone()).is_zero());
            prop_assert!((b % g).is_zero());
        }

        #[test]
        fn integer_distributive(a in small_int(), b in small_int(), c in small_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let c = Integer::new(c);
            prop_assert_eq!(
                a.clone() * (b.clone() + c.clone()),
                a.clone() * b + a * c
            );
        }

        #[test]
        fn rational_multiplicative_inverse(num in non_zero_int(), den in non_zero_int()) {
            let a = Rational::from_i64(num, den);
            prop_assert!((a.clone() * a.recip()).is_one());
        }

        #[test]
        fn rational_text_round_trip(num in small_int(), den in non_zero_int()) {
            let a = Rational::from_i64(num, den);
            prop_assert_eq!(Rational::parse(&a.to_string()), Some(a));
        }

        #[test]
        fn modint_inverse(a in 1u64..1000u64) {
            const P: u64 = 998_244_353;
            let a = ModInt::<P>::new(a);
            let inv = a.inv().expect("inverse should exist for non-zero mod prime");
            prop_assert_eq!((a * inv).value(), 1);
        }

        #[test]
        fn modint_signed_agrees_with_negation(a in small_int()) {
            type F = ModInt<101>;
            prop_assert_eq!(F::from_signed(-a), -F::from_signed(a));
        }
    }
}
