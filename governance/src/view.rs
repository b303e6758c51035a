//! The externally served projection of a proposal.

use crate::error::GovernanceError;
use crate::polling::PollingType;
use crate::proposal::ProposalRecord;
use crate::status::VotingStatus;
use govwatch_types::{Address, ChainId, ProposalId, Timestamp, VotePower};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePowerBlock {
    pub block_number: u64,
    pub block_ts: Timestamp,
}

/// A specific voter's address and vote power, attached for per-voter views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterPower {
    pub address: Address,
    pub vote_power: VotePower,
}

/// A proposal as served to clients: decoded actions plus its voting status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalView {
    pub chain_id: ChainId,
    pub contract: Address,
    pub polling_type: PollingType,
    pub proposal_id: ProposalId,
    pub proposer: Address,
    pub targets: Vec<Address>,
    pub values: Vec<String>,
    pub signatures: Vec<String>,
    pub calldatas: Vec<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub description: String,
    pub vote_power_block: VotePowerBlock,
    pub wrapping_threshold: u32,
    pub absolute_threshold: u32,
    pub relative_threshold: u32,
    pub exec_start_time: Timestamp,
    pub exec_end_time: Timestamp,
    pub total_vote_power: VotePower,
    pub executable_on_chain: bool,
    pub executed: bool,
    #[serde(rename = "for")]
    pub for_votes: VotePower,
    pub against: VotePower,
    pub abstain: VotePower,
    pub status: VotingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter_vote_power: Option<VotePower>,
}

impl ProposalRecord {
    /// Project the record for clients at `now`.
    ///
    /// The attached status is the [`VotingStatus`], not the lifecycle status.
    pub fn to_public_view(
        &self,
        now: Timestamp,
        voter: Option<VoterPower>,
    ) -> Result<ProposalView, GovernanceError> {
        let actions = self.actions()?;
        let (voter_address, voter_vote_power) = match voter {
            Some(v) => (Some(v.address), Some(v.vote_power)),
            None => (None, None),
        };
        Ok(ProposalView {
            chain_id: self.key.chain_id,
            contract: self.key.contract,
            polling_type: self.polling_type,
            proposal_id: self.key.proposal_id,
            proposer: self.proposer,
            targets: actions.targets,
            values: actions.values,
            signatures: actions.signatures,
            calldatas: actions.calldatas,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description.clone(),
            vote_power_block: VotePowerBlock {
                block_number: self.vote_power_block,
                block_ts: self.vote_power_block_ts,
            },
            wrapping_threshold: self.thresholds.wrapping,
            absolute_threshold: self.thresholds.absolute,
            relative_threshold: self.thresholds.relative,
            exec_start_time: self.exec_start_time,
            exec_end_time: self.exec_end_time,
            total_vote_power: self.tally.total_vote_power.clone(),
            executable_on_chain: self.executable_on_chain,
            executed: self.executed,
            for_votes: self.tally.for_votes.clone(),
            against: self.tally.against.clone(),
            abstain: self.tally.abstain.clone(),
            status: self.voting_status(now),
            voter_address,
            voter_vote_power,
        })
    }
}
