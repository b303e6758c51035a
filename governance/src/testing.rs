//! Shared fixtures for unit tests.

use crate::ingest::{ProposalCreatedEvent, ProposalCreatedParams};
use crate::polling::{PollingType, VoteTally};
use crate::proposal::ProposalRecord;
use govwatch_types::{ChainId, Timestamp};

pub(crate) const CONTRACT: &str = "0xC000000000000000000000000000000000000001";
pub(crate) const PROPOSER: &str = "0xb000000000000000000000000000000000000002";

pub(crate) fn created_event(
    start: u64,
    end: u64,
    absolute: u64,
    relative: u64,
) -> ProposalCreatedEvent {
    ProposalCreatedEvent {
        address: CONTRACT.to_string(),
        block_number: Some(12_346),
        return_values: ProposalCreatedParams {
            proposal_id: Some("42".into()),
            proposer: Some(PROPOSER.to_string()),
            targets: Some(vec!["0x1000000000000000000000000000000000000003".to_string()]),
            values: Some(vec!["1000".into()]),
            signatures: Some(vec!["setFee(uint256)".to_string()]),
            calldatas: Some(vec!["0x69fe0e2d".to_string()]),
            start_time: Some(start.into()),
            end_time: Some(end.into()),
            description: Some("Lower the protocol fee".to_string()),
            vote_power_block: Some("12345".into()),
            wrapping_threshold: Some("3000".into()),
            absolute_threshold: Some(absolute.into()),
            relative_threshold: Some(relative.into()),
        },
    }
}

pub(crate) fn record_from(event: &ProposalCreatedEvent, polling_type: PollingType) -> ProposalRecord {
    ProposalRecord::from_creation_event(event, polling_type, Timestamp::new(99), ChainId::new(14))
        .expect("fixture event is well-formed")
}

pub(crate) fn tally(total: u64, for_votes: u64, against: u64, abstain: u64) -> VoteTally {
    VoteTally::new(total, for_votes, against, abstain)
}
