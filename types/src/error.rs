//! Error type for primitive parsing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid integer: {0:?}")]
    InvalidInteger(String),

    #[error("integer overflow: {value} does not fit in {bits} bits")]
    IntegerOverflow { value: String, bits: u32 },

    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
}
