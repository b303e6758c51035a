use govwatch_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    /// A creation event or on-chain read is missing a required field or carries
    /// a non-numeric value where an integer is required. Not retryable.
    #[error("malformed {payload} payload: {reason}")]
    MalformedEvent {
        payload: &'static str,
        reason: String,
    },

    /// A vote power value could not be decoded. Never clamped.
    #[error("vote power field `{field}` could not be decoded: {source}")]
    VotePower {
        field: &'static str,
        #[source]
        source: TypesError,
    },

    #[error("stored action list is corrupt: {0}")]
    CorruptActions(#[from] serde_json::Error),
}

impl GovernanceError {
    pub(crate) fn malformed(payload: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            payload,
            reason: reason.into(),
        }
    }

    /// Whether the offending payload should be logged and skipped rather than retried.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::MalformedEvent { .. } | Self::VotePower { .. })
    }
}
