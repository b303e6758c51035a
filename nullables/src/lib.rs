//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the ingester (the clock and the proposal store)
//! are abstracted behind traits or explicit parameters. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullProposalStore;
