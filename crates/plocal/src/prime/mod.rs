use std::{fmt, str::FromStr};

use num_bigint::BigInt;
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

mod valuation;

pub use valuation::{p_pow_q, p_pow_z, p_val_q, p_val_z, Valuation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimeError {
    NotAnInteger(std::num::ParseIntError),
    InvalidPrime(u32),
}

impl fmt::Display for PrimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnInteger(s) => write!(f, "Not an integer: {s}"),
            Self::InvalidPrime(p) => write!(f, "{p} is not a valid prime"),
        }
    }
}

impl std::error::Error for PrimeError {}

/// The prime at which every computation of a session is localized.
///
/// Unlike the primes of a finite field, this one is never reduced against: it only serves to
/// measure valuations and to build the relation matrices `p^e` of torsion summands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidPrime {
    p: u32,
}

pub const fn is_prime(p: u32) -> bool {
    if p < 2 {
        return false;
    }
    // (2..p).all(|k| p % k != 0), but make it const
    let mut k = 2;
    while k <= p / k {
        if p % k == 0 {
            return false;
        }
        k += 1;
    }
    true
}

impl ValidPrime {
    pub const fn new(p: u32) -> Self {
        assert!(is_prime(p), "Tried to construct a composite prime");
        Self { p }
    }

    pub const fn as_u32(self) -> u32 {
        self.p
    }

    pub fn to_bigint(self) -> BigInt {
        BigInt::from(self.p)
    }
}

impl TryFrom<u32> for ValidPrime {
    type Error = PrimeError;

    fn try_from(p: u32) -> Result<Self, PrimeError> {
        if is_prime(p) {
            Ok(Self { p })
        } else {
            Err(PrimeError::InvalidPrime(p))
        }
    }
}

impl FromStr for ValidPrime {
    type Err = PrimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let p: u32 = s.parse().map_err(PrimeError::NotAnInteger)?;
        Self::try_from(p)
    }
}

impl fmt::Display for ValidPrime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <u32 as fmt::Display>::fmt(&self.p, f)
    }
}

impl PartialEq<u32> for ValidPrime {
    fn eq(&self, other: &u32) -> bool {
        self.p == *other
    }
}

impl From<ValidPrime> for u32 {
    fn from(value: ValidPrime) -> u32 {
        value.p
    }
}

impl Serialize for ValidPrime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.p.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidPrime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let p: u32 = u32::deserialize(deserializer)?;
        Self::try_from(p).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validprime_test() {
        for p in [2, 3, 5, 7, 11, 13, 65521] {
            assert_eq!(ValidPrime::new(p), p);
        }
    }

    #[test]
    fn validprime_invalid() {
        assert_eq!(
            ValidPrime::try_from(4).unwrap_err(),
            PrimeError::InvalidPrime(4)
        );
        assert_eq!(
            ValidPrime::try_from(1).unwrap_err(),
            PrimeError::InvalidPrime(1)
        );
        assert_eq!(
            "9".parse::<ValidPrime>().unwrap_err(),
            PrimeError::InvalidPrime(9)
        );
        assert_eq!(
            "4.0".parse::<ValidPrime>().unwrap_err(),
            PrimeError::NotAnInteger("4.0".parse::<u32>().unwrap_err())
        );
    }

    #[test]
    fn validprime_serde() {
        let p = ValidPrime::new(5);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "5");
        assert_eq!(serde_json::from_str::<ValidPrime>(&json).unwrap(), p);
        assert!(serde_json::from_str::<ValidPrime>("6").is_err());
    }
}
