//! Ingestion payloads and the update operations applied to a record.
//!
//! Payload structs mirror what an EVM client library hands back: a decoded
//! `ProposalCreated` log with its `returnValues`, and the named outputs of the
//! `getProposalInfo` / `getProposalVP` view calls. Every field is optional at
//! the serde level so that a missing field becomes a
//! [`GovernanceError::MalformedEvent`] rather than a deserialization panic
//! somewhere upstream.

use crate::error::GovernanceError;
use crate::polling::{PollingType, Thresholds, VoteTally};
use crate::proposal::{EncodedActions, ProposalActions, ProposalKey, ProposalRecord};
use govwatch_types::{
    parse_u32, parse_u64, word_hex, Address, ChainId, ProposalId, Timestamp, VotePower,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

const CREATED: &str = "ProposalCreated";
const INFO: &str = "proposal info";
const VOTE_POWER: &str = "vote power";

/// An integer as it arrives from the chain client: decimal/hex text, or a JSON number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntText {
    Number(u64),
    Text(String),
}

impl IntText {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s),
        }
    }
}

impl From<u64> for IntText {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for IntText {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A decoded `ProposalCreated` log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalCreatedEvent {
    /// The emitting polling contract.
    pub address: String,
    pub block_number: Option<u64>,
    pub return_values: ProposalCreatedParams,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalCreatedParams {
    pub proposal_id: Option<IntText>,
    pub proposer: Option<String>,
    pub targets: Option<Vec<String>>,
    pub values: Option<Vec<IntText>>,
    pub signatures: Option<Vec<String>>,
    pub calldatas: Option<Vec<String>>,
    pub start_time: Option<IntText>,
    pub end_time: Option<IntText>,
    pub description: Option<String>,
    pub vote_power_block: Option<IntText>,
    pub wrapping_threshold: Option<IntText>,
    pub absolute_threshold: Option<IntText>,
    pub relative_threshold: Option<IntText>,
}

impl ProposalCreatedEvent {
    pub fn from_json(json: &str) -> Result<Self, GovernanceError> {
        serde_json::from_str(json).map_err(|e| GovernanceError::malformed(CREATED, e.to_string()))
    }

    /// The emitting contract, if the address is well-formed.
    pub fn contract(&self) -> Result<Address, GovernanceError> {
        address(&self.address, CREATED, "address")
    }
}

/// Raw outputs of `getProposalInfo`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProposalInfoRead {
    #[serde(rename = "_proposer")]
    pub proposer: Option<String>,
    #[serde(rename = "_votePowerBlock")]
    pub vote_power_block: Option<IntText>,
    #[serde(rename = "_voteStartTime")]
    pub vote_start_time: Option<IntText>,
    #[serde(rename = "_voteEndTime")]
    pub vote_end_time: Option<IntText>,
    #[serde(rename = "_execStartTime")]
    pub exec_start_time: Option<IntText>,
    #[serde(rename = "_execEndTime")]
    pub exec_end_time: Option<IntText>,
    #[serde(rename = "_executableOnChain")]
    pub executable_on_chain: Option<bool>,
    #[serde(rename = "_executed")]
    pub executed: Option<bool>,
}

impl ProposalInfoRead {
    pub fn from_json(json: &str) -> Result<Self, GovernanceError> {
        serde_json::from_str(json).map_err(|e| GovernanceError::malformed(INFO, e.to_string()))
    }
}

/// Raw outputs of `getProposalVP`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VotePowerRead {
    #[serde(rename = "_totalVP")]
    pub total_vote_power: Option<IntText>,
    #[serde(rename = "_for")]
    pub for_votes: Option<IntText>,
    #[serde(rename = "_against")]
    pub against: Option<IntText>,
    #[serde(rename = "_abstain")]
    pub abstain: Option<IntText>,
}

impl VotePowerRead {
    pub fn from_json(json: &str) -> Result<Self, GovernanceError> {
        serde_json::from_str(json)
            .map_err(|e| GovernanceError::malformed(VOTE_POWER, e.to_string()))
    }
}

/// A parsed proposal-info read. Zero values mean "not yet known".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProposalInfo {
    pub proposer: Address,
    pub vote_power_block: u64,
    pub vote_start_time: Timestamp,
    pub vote_end_time: Timestamp,
    pub exec_start_time: Timestamp,
    pub exec_end_time: Timestamp,
    /// `None` leaves the record's flag untouched.
    pub executable_on_chain: Option<bool>,
    pub executed: bool,
}

impl TryFrom<&ProposalInfoRead> for ProposalInfo {
    type Error = GovernanceError;

    fn try_from(read: &ProposalInfoRead) -> Result<Self, Self::Error> {
        let time = |value: &Option<IntText>, field| -> Result<Timestamp, GovernanceError> {
            optional_u64(value, INFO, field).map(Timestamp::new)
        };
        Ok(Self {
            proposer: match &read.proposer {
                Some(raw) => address(raw, INFO, "_proposer")?,
                None => Address::ZERO,
            },
            vote_power_block: optional_u64(&read.vote_power_block, INFO, "_votePowerBlock")?,
            vote_start_time: time(&read.vote_start_time, "_voteStartTime")?,
            vote_end_time: time(&read.vote_end_time, "_voteEndTime")?,
            exec_start_time: time(&read.exec_start_time, "_execStartTime")?,
            exec_end_time: time(&read.exec_end_time, "_execEndTime")?,
            executable_on_chain: read.executable_on_chain,
            executed: read.executed.unwrap_or(false),
        })
    }
}

impl TryFrom<&VotePowerRead> for VoteTally {
    type Error = GovernanceError;

    fn try_from(read: &VotePowerRead) -> Result<Self, Self::Error> {
        Ok(Self {
            total_vote_power: vote_power(&read.total_vote_power, "_totalVP")?,
            for_votes: vote_power(&read.for_votes, "_for")?,
            against: vote_power(&read.against, "_against")?,
            abstain: vote_power(&read.abstain, "_abstain")?,
        })
    }
}

impl ProposalRecord {
    /// Build a fresh record from a `ProposalCreated` event.
    ///
    /// The execution window, tally and flags start at their defaults and are
    /// filled in by later reads.
    pub fn from_creation_event(
        event: &ProposalCreatedEvent,
        polling_type: PollingType,
        vote_power_block_ts: Timestamp,
        chain_id: ChainId,
    ) -> Result<Self, GovernanceError> {
        let params = &event.return_values;

        let contract = event.contract()?;
        let proposal_id = required(&params.proposal_id, "proposalId")?
            .as_text()
            .parse::<ProposalId>()
            .map_err(|e| GovernanceError::malformed(CREATED, format!("field `proposalId`: {e}")))?;
        let proposer = address(required(&params.proposer, "proposer")?, CREATED, "proposer")?;

        let actions = ProposalActions {
            targets: required(&params.targets, "targets")?
                .iter()
                .map(|t| address(t, CREATED, "targets"))
                .collect::<Result<_, _>>()?,
            values: required(&params.values, "values")?
                .iter()
                .map(|v| {
                    word_hex(&v.as_text()).map_err(|e| {
                        GovernanceError::malformed(CREATED, format!("field `values`: {e}"))
                    })
                })
                .collect::<Result<_, _>>()?,
            signatures: required(&params.signatures, "signatures")?.clone(),
            calldatas: required(&params.calldatas, "calldatas")?.clone(),
        };
        if !actions.is_consistent() {
            return Err(GovernanceError::malformed(
                CREATED,
                format!(
                    "action sequences differ in length: {} targets, {} values, {} signatures, {} calldatas",
                    actions.targets.len(),
                    actions.values.len(),
                    actions.signatures.len(),
                    actions.calldatas.len()
                ),
            ));
        }

        let start_time = Timestamp::new(created_u64(&params.start_time, "startTime")?);
        let end_time = Timestamp::new(created_u64(&params.end_time, "endTime")?);
        if start_time > end_time {
            return Err(GovernanceError::malformed(
                CREATED,
                format!("startTime {start_time} is after endTime {end_time}"),
            ));
        }

        let thresholds = Thresholds {
            wrapping: created_u32(&params.wrapping_threshold, "wrappingThreshold")?,
            absolute: created_u32(&params.absolute_threshold, "absoluteThreshold")?,
            relative: created_u32(&params.relative_threshold, "relativeThreshold")?,
        };

        Ok(Self {
            key: ProposalKey::new(chain_id, contract, proposal_id),
            polling_type,
            proposer,
            actions: EncodedActions::encode(&actions)?,
            start_time,
            end_time,
            description: required(&params.description, "description")?.clone(),
            vote_power_block: created_u64(&params.vote_power_block, "votePowerBlock")?,
            vote_power_block_ts,
            thresholds,
            exec_start_time: Timestamp::EPOCH,
            exec_end_time: Timestamp::EPOCH,
            executable_on_chain: false,
            executed: false,
            tally: VoteTally::default(),
        })
    }

    /// Fill still-unknown identity and timing fields, and refresh the
    /// execution flags.
    ///
    /// A field that already holds a non-zero value keeps it even when the read
    /// disagrees. `executed` always follows the read.
    pub fn apply_proposal_info(&mut self, info: &ProposalInfo) {
        let key = self.key;
        fill_once(&mut self.proposer, info.proposer, Address::ZERO, &key, "proposer");
        fill_once(
            &mut self.vote_power_block,
            info.vote_power_block,
            0,
            &key,
            "vote_power_block",
        );
        fill_once(&mut self.start_time, info.vote_start_time, Timestamp::EPOCH, &key, "start_time");
        fill_once(&mut self.end_time, info.vote_end_time, Timestamp::EPOCH, &key, "end_time");
        fill_once(
            &mut self.exec_start_time,
            info.exec_start_time,
            Timestamp::EPOCH,
            &key,
            "exec_start_time",
        );
        fill_once(
            &mut self.exec_end_time,
            info.exec_end_time,
            Timestamp::EPOCH,
            &key,
            "exec_end_time",
        );
        if let Some(executable) = info.executable_on_chain {
            self.executable_on_chain = executable;
        }
        self.executed = info.executed;
    }

    /// Replace the vote tally with the latest read. No accumulation.
    pub fn apply_vote_power_data(&mut self, tally: VoteTally) {
        self.tally = tally;
    }
}

fn fill_once<T>(slot: &mut T, incoming: T, unset: T, key: &ProposalKey, field: &'static str)
where
    T: PartialEq + Copy + fmt::Display,
{
    if incoming == unset || *slot == incoming {
        return;
    }
    if *slot == unset {
        *slot = incoming;
    } else {
        tracing::debug!(
            proposal = %key,
            field,
            kept = %slot,
            ignored = %incoming,
            "fill-once field already set, ignoring read"
        );
    }
}

fn required<'a, T>(value: &'a Option<T>, field: &str) -> Result<&'a T, GovernanceError> {
    value
        .as_ref()
        .ok_or_else(|| GovernanceError::malformed(CREATED, format!("missing field `{field}`")))
}

fn address(raw: &str, payload: &'static str, field: &str) -> Result<Address, GovernanceError> {
    raw.parse()
        .map_err(|e| GovernanceError::malformed(payload, format!("field `{field}`: {e}")))
}

fn created_u64(value: &Option<IntText>, field: &str) -> Result<u64, GovernanceError> {
    parse_u64(&required(value, field)?.as_text())
        .map_err(|e| GovernanceError::malformed(CREATED, format!("field `{field}`: {e}")))
}

fn created_u32(value: &Option<IntText>, field: &str) -> Result<u32, GovernanceError> {
    parse_u32(&required(value, field)?.as_text())
        .map_err(|e| GovernanceError::malformed(CREATED, format!("field `{field}`: {e}")))
}

fn optional_u64(
    value: &Option<IntText>,
    payload: &'static str,
    field: &str,
) -> Result<u64, GovernanceError> {
    match value {
        Some(v) => parse_u64(&v.as_text())
            .map_err(|e| GovernanceError::malformed(payload, format!("field `{field}`: {e}"))),
        None => Ok(0),
    }
}

fn vote_power(value: &Option<IntText>, field: &'static str) -> Result<VotePower, GovernanceError> {
    let raw = value.as_ref().ok_or_else(|| {
        GovernanceError::malformed(VOTE_POWER, format!("missing field `{field}`"))
    })?;
    raw.as_text()
        .parse()
        .map_err(|source| GovernanceError::VotePower { field, source })
}
