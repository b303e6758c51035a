//! The persisted proposal record.

use crate::error::GovernanceError;
use crate::polling::{PollingType, Thresholds, VoteTally};
use govwatch_types::{Address, ChainId, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a proposal: which network, which polling contract, which id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalKey {
    pub chain_id: ChainId,
    pub contract: Address,
    pub proposal_id: ProposalId,
}

impl ProposalKey {
    pub fn new(chain_id: ChainId, contract: Address, proposal_id: ProposalId) -> Self {
        Self {
            chain_id,
            contract,
            proposal_id,
        }
    }
}

impl fmt::Display for ProposalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.chain_id, self.contract, self.proposal_id)
    }
}

/// The on-chain actions a proposal would execute, as parallel sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalActions {
    pub targets: Vec<Address>,
    /// Call values as 32-byte padded hex words.
    pub values: Vec<String>,
    pub signatures: Vec<String>,
    pub calldatas: Vec<String>,
}

impl ProposalActions {
    /// All four sequences have the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.targets.len();
        self.values.len() == n && self.signatures.len() == n && self.calldatas.len() == n
    }
}

/// The four action sequences in their storage form: one JSON array text per column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct EncodedActions {
    targets: String,
    values: String,
    signatures: String,
    calldatas: String,
}

impl EncodedActions {
    pub(crate) fn encode(actions: &ProposalActions) -> Result<Self, GovernanceError> {
        Ok(Self {
            targets: serde_json::to_string(&actions.targets)?,
            values: serde_json::to_string(&actions.values)?,
            signatures: serde_json::to_string(&actions.signatures)?,
            calldatas: serde_json::to_string(&actions.calldatas)?,
        })
    }

    pub(crate) fn decode(&self) -> Result<ProposalActions, GovernanceError> {
        Ok(ProposalActions {
            targets: serde_json::from_str(&self.targets)?,
            values: serde_json::from_str(&self.values)?,
            signatures: serde_json::from_str(&self.signatures)?,
            calldatas: serde_json::from_str(&self.calldatas)?,
        })
    }
}

/// A governance proposal as persisted by the tracker.
///
/// Built once from the `ProposalCreated` event, then refreshed from on-chain
/// reads. Identity, polling type, thresholds and actions never change after
/// creation; proposer, vote power block and the two windows are fill-once;
/// the vote tally and the execution flags follow the latest read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub(crate) key: ProposalKey,
    pub(crate) polling_type: PollingType,
    pub(crate) proposer: Address,
    pub(crate) actions: EncodedActions,
    pub(crate) start_time: Timestamp,
    pub(crate) end_time: Timestamp,
    pub(crate) description: String,
    pub(crate) vote_power_block: u64,
    pub(crate) vote_power_block_ts: Timestamp,
    pub(crate) thresholds: Thresholds,
    pub(crate) exec_start_time: Timestamp,
    pub(crate) exec_end_time: Timestamp,
    pub(crate) executable_on_chain: bool,
    pub(crate) executed: bool,
    pub(crate) tally: VoteTally,
}

impl ProposalRecord {
    pub fn key(&self) -> &ProposalKey {
        &self.key
    }

    pub fn polling_type(&self) -> PollingType {
        self.polling_type
    }

    pub fn proposer(&self) -> Address {
        self.proposer
    }

    /// Decode the stored action sequences.
    pub fn actions(&self) -> Result<ProposalActions, GovernanceError> {
        self.actions.decode()
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn vote_power_block(&self) -> u64 {
        self.vote_power_block
    }

    pub fn vote_power_block_ts(&self) -> Timestamp {
        self.vote_power_block_ts
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn exec_start_time(&self) -> Timestamp {
        self.exec_start_time
    }

    pub fn exec_end_time(&self) -> Timestamp {
        self.exec_end_time
    }

    pub fn executable_on_chain(&self) -> bool {
        self.executable_on_chain
    }

    pub fn executed(&self) -> bool {
        self.executed
    }

    pub fn tally(&self) -> &VoteTally {
        &self.tally
    }

    /// Whether voting succeeded under this proposal's polling type.
    pub fn voting_succeeded(&self) -> bool {
        self.polling_type.succeeded(&self.tally, &self.thresholds)
    }
}
