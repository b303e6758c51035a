//! Unsigned integer text parsing.
//!
//! Chain payloads carry integers as text: decimal for most ABI outputs, and
//! `0x`-prefixed hex for some values. Everything funnels through
//! [`parse_biguint`] first so overflow of a narrower target type is reported
//! as [`TypesError::IntegerOverflow`] instead of being truncated.

use crate::TypesError;
use num_bigint::BigUint;
use num_traits::{Num, ToPrimitive};

/// Parse decimal or `0x`-prefixed hex text into an arbitrary-precision integer.
pub fn parse_biguint(text: &str) -> Result<BigUint, TypesError> {
    let trimmed = text.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    // from_str_radix tolerates `_` separators; chain data never contains them.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(TypesError::InvalidInteger(text.to_string()));
    }
    BigUint::from_str_radix(digits, radix).map_err(|_| TypesError::InvalidInteger(text.to_string()))
}

/// Parse integer text that must fit in 64 bits (timestamps, block numbers, chain ids).
pub fn parse_u64(text: &str) -> Result<u64, TypesError> {
    let value = parse_biguint(text)?;
    value.to_u64().ok_or(TypesError::IntegerOverflow {
        value: text.trim().to_string(),
        bits: 64,
    })
}

/// Parse integer text that must fit in 32 bits (BIPS thresholds).
pub fn parse_u32(text: &str) -> Result<u32, TypesError> {
    let value = parse_biguint(text)?;
    value.to_u32().ok_or(TypesError::IntegerOverflow {
        value: text.trim().to_string(),
        bits: 32,
    })
}
