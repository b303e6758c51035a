//! Governance proposal indexer.
//!
//! Turns decoded chain events and periodic contract reads into updates of
//! stored [`ProposalRecord`](govwatch_governance::ProposalRecord)s. A bad
//! payload is logged and skipped; it never stops the rest of a batch.

pub mod config;
pub mod error;
pub mod ingester;

pub use config::{IndexerConfig, PollingContractConfig};
pub use error::IndexerError;
pub use ingester::{ChainEvent, IngestOutcome, IngestReport, ProposalIngester};
