use govwatch_governance::ProposalKey;
use govwatch_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("governance error: {0}")]
    Governance(#[from] govwatch_governance::GovernanceError),

    #[error("store error: {0}")]
    Store(#[from] govwatch_store::StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("contract {0} is not a configured polling contract")]
    UnknownContract(Address),

    #[error("proposal {0} has not been created yet")]
    UnknownProposal(ProposalKey),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexerError {
    /// Errors caused by the payload itself. Retrying the same payload cannot help.
    pub fn is_skippable(&self) -> bool {
        match self {
            Self::Governance(e) => e.is_skippable(),
            Self::UnknownContract(_) | Self::UnknownProposal(_) => true,
            _ => false,
        }
    }
}
