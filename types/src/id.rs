//! 256-bit word values: proposal ids and padded action values.

use crate::uint::parse_biguint;
use crate::TypesError;
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Encode an integer as a big-endian 32-byte word.
fn to_word(value: &BigUint, original: &str) -> Result<[u8; 32], TypesError> {
    let be = value.to_bytes_be();
    if be.len() > 32 {
        return Err(TypesError::IntegerOverflow {
            value: original.trim().to_string(),
            bits: 256,
        });
    }
    let mut word = [0u8; 32];
    word[32 - be.len()..].copy_from_slice(&be);
    Ok(word)
}

/// Normalise decimal or hex integer text to `0x` + 64 lowercase hex digits.
pub fn word_hex(text: &str) -> Result<String, TypesError> {
    let word = to_word(&parse_biguint(text)?, text)?;
    Ok(format!("0x{}", hex::encode(word)))
}

/// A chain-scoped proposal id (a `uint256` on chain).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalId([u8; 32]);

impl FromStr for ProposalId {
    type Err = TypesError;

    /// Accepts the decimal form emitted in events as well as the padded hex
    /// form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        to_word(&parse_biguint(s)?, s).map(Self)
    }
}

impl fmt::Debug for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProposalId(0x{}…)", hex::encode(&self.0[28..]))
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for ProposalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProposalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
