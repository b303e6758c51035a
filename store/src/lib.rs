//! Abstract storage trait for proposal records.
//!
//! Every storage backend (a relational database in production, in-memory for
//! testing) implements [`ProposalStore`]. The ingester depends only on the trait.

pub mod error;
pub mod proposal;

pub use error::StoreError;
pub use proposal::ProposalStore;
