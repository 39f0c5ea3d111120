//! Valuations and powers at a fixed prime.
//!
//! Zero has valuation [`Valuation::Infinite`], which compares above every finite valuation.

use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::ValidPrime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Valuation {
    Finite(i32),
    Infinite,
}

impl Valuation {
    pub fn is_infinite(self) -> bool {
        self == Self::Infinite
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v}"),
            Self::Infinite => write!(f, "inf"),
        }
    }
}

/// The valuation of a nonzero integer.
fn finite_valuation(p: ValidPrime, x: &BigInt) -> i32 {
    debug_assert!(!x.is_zero());
    let p = p.to_bigint();
    let mut remainder = x.clone();
    let mut valuation = 0;
    loop {
        let (quotient, r) = remainder.div_rem(&p);
        if !r.is_zero() {
            return valuation;
        }
        remainder = quotient;
        valuation += 1;
    }
}

/// The exponent of the largest power of `p` dividing `x`.
pub fn p_val_z(p: ValidPrime, x: &BigInt) -> Valuation {
    if x.is_zero() {
        Valuation::Infinite
    } else {
        Valuation::Finite(finite_valuation(p, x))
    }
}

/// The valuation of the numerator minus the valuation of the denominator. Since the fraction is
/// reduced, at most one of the two is positive.
pub fn p_val_q(p: ValidPrime, x: &BigRational) -> Valuation {
    if x.is_zero() {
        return Valuation::Infinite;
    }
    let num_valuation = finite_valuation(p, x.numer());
    if num_valuation > 0 {
        Valuation::Finite(num_valuation)
    } else {
        Valuation::Finite(-finite_valuation(p, x.denom()))
    }
}

pub fn p_pow_z(p: ValidPrime, exp: u32) -> BigInt {
    p.to_bigint().pow(exp)
}

/// `p^exp` as a rational. Negative exponents give reciprocals, and an infinite exponent gives 0.
pub fn p_pow_q(p: ValidPrime, exp: Valuation) -> BigRational {
    match exp {
        Valuation::Infinite => BigRational::zero(),
        Valuation::Finite(e) if e >= 0 => BigRational::from_integer(p_pow_z(p, e as u32)),
        Valuation::Finite(e) => {
            BigRational::new(BigInt::one(), p_pow_z(p, e.unsigned_abs()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[rstest]
    #[case(3, 1, Valuation::Finite(0))]
    #[case(5, 25, Valuation::Finite(2))]
    #[case(2, -96, Valuation::Finite(5))]
    #[case(3, 0, Valuation::Infinite)]
    fn valuation_int(#[case] p: u32, #[case] x: i64, #[case] expected: Valuation) {
        assert_eq!(p_val_z(ValidPrime::new(p), &BigInt::from(x)), expected);
    }

    #[rstest]
    #[case(3, q(9, 2), Valuation::Finite(2))]
    #[case(3, q(2, 27), Valuation::Finite(-3))]
    #[case(5, q(-7, 3), Valuation::Finite(0))]
    #[case(2, q(0, 1), Valuation::Infinite)]
    fn valuation_rational(#[case] p: u32, #[case] x: BigRational, #[case] expected: Valuation) {
        assert_eq!(p_val_q(ValidPrime::new(p), &x), expected);
    }

    #[test]
    fn valuation_order() {
        assert!(Valuation::Finite(-2) < Valuation::Finite(0));
        assert!(Valuation::Finite(1000) < Valuation::Infinite);
    }

    #[test]
    fn powers() {
        let p = ValidPrime::new(3);
        assert_eq!(p_pow_z(p, 0), BigInt::from(1));
        assert_eq!(p_pow_z(p, 4), BigInt::from(81));
        assert_eq!(p_pow_q(p, Valuation::Finite(2)), q(9, 1));
        assert_eq!(p_pow_q(p, Valuation::Finite(-2)), q(1, 9));
        assert_eq!(p_pow_q(p, Valuation::Infinite), q(0, 1));
    }

    #[test]
    fn power_valuation_inverse() {
        let p = ValidPrime::new(7);
        for e in -5..5 {
            assert_eq!(
                p_val_q(p, &p_pow_q(p, Valuation::Finite(e))),
                Valuation::Finite(e)
            );
        }
    }
}
