//! Proposal storage trait.

use crate::StoreError;
use govwatch_governance::{ProposalKey, ProposalRecord};
use govwatch_types::ChainId;

/// Trait for storing proposal records keyed by `(chain_id, contract, proposal_id)`.
///
/// Implementations must serialise writers per record: two `update_proposal`
/// calls on the same key never interleave. Readers always see a complete
/// record, never one half-way through an update.
pub trait ProposalStore: Send + Sync {
    /// Store a new record. Returns `false` and leaves the stored record
    /// untouched if the key already exists.
    fn insert_proposal(&self, record: ProposalRecord) -> Result<bool, StoreError>;

    /// Get a snapshot of a record.
    fn get_proposal(&self, key: &ProposalKey) -> Result<Option<ProposalRecord>, StoreError>;

    /// Apply `update` to the stored record while holding its write lock, and
    /// return the updated snapshot.
    fn update_proposal(
        &self,
        key: &ProposalKey,
        update: &mut dyn FnMut(&mut ProposalRecord),
    ) -> Result<ProposalRecord, StoreError>;

    /// Snapshots of every record observed on `chain_id`, ordered by key.
    fn list_proposals(&self, chain_id: ChainId) -> Result<Vec<ProposalRecord>, StoreError>;

    /// Total number of stored records.
    fn proposal_count(&self) -> Result<u64, StoreError>;
}
