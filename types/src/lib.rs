//! Fundamental types for the governance proposal tracker.
//!
//! This crate defines the primitives shared across every other crate in the workspace:
//! addresses, proposal ids, vote power amounts, timestamps, chain ids, and the
//! integer-text parsing used by every ingestion payload.

pub mod address;
pub mod chain;
pub mod error;
pub mod id;
pub mod time;
pub mod uint;
pub mod vote_power;

pub use address::Address;
pub use chain::ChainId;
pub use error::TypesError;
pub use id::{word_hex, ProposalId};
pub use time::Timestamp;
pub use uint::{parse_biguint, parse_u32, parse_u64};
pub use vote_power::VotePower;
