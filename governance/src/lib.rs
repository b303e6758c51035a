//! Governance proposal tracking: the proposal record and its status engine.
//!
//! A [`ProposalRecord`] is created from a `ProposalCreated` event and refreshed
//! from periodic contract reads. Its status is never stored; it is derived on
//! every read from the record and an explicit `now`:
//!
//! - [`VotingStatus`]: Pending → Active → Succeeded | Defeated
//! - [`LifecycleStatus`]: the governor's full state machine, including the
//!   execution window (Succeeded, Queued, Expired, Executed).
//!
//! Success depends on the [`PollingType`] of the emitting contract. Accept-type
//! polls need a quorum and majority in favour; reject-type polls proceed
//! unless a quorum and majority vote against.

pub mod error;
pub mod ingest;
pub mod polling;
pub mod proposal;
pub mod status;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use error::GovernanceError;
pub use ingest::{
    IntText, ProposalCreatedEvent, ProposalCreatedParams, ProposalInfo, ProposalInfoRead,
    VotePowerRead,
};
pub use polling::{PollingType, Thresholds, VoteTally, BIPS};
pub use proposal::{ProposalActions, ProposalKey, ProposalRecord};
pub use status::{LifecycleStatus, VotingStatus};
pub use view::{ProposalView, VotePowerBlock, VoterPower};
