//! Vote power amounts.
//!
//! Vote power is token-weighted and tokens carry 18 decimals, so totals
//! routinely exceed 64 bits. Amounts are arbitrary-precision and are stored as
//! minimal lowercase hex text (`"0x0"` for zero), the form the ingestion layer
//! has always persisted.

use crate::uint::parse_biguint;
use crate::TypesError;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Accumulated or eligible vote power.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VotePower(BigUint);

impl VotePower {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for VotePower {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for VotePower {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for VotePower {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl FromStr for VotePower {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_biguint(s).map(Self)
    }
}

impl fmt::Display for VotePower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl Serialize for VotePower {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VotePower {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
