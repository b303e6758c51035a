use govwatch_governance::ProposalKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("proposal {0} not found")]
    NotFound(ProposalKey),

    /// The backend could not complete `operation`. `key` names the record
    /// involved, when the operation targets a single one.
    #[error("storage backend failed in {operation}: {reason}")]
    Backend {
        operation: &'static str,
        key: Option<ProposalKey>,
        reason: String,
    },
}
