//! Polling contract types and their success predicates.
//!
//! Both predicates mirror the `_proposalSucceeded` checks of the on-chain
//! `PollingAccept` and `PollingReject` contracts. All arithmetic is exact
//! integer arithmetic with truncating division, as in Solidity.

use govwatch_types::VotePower;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Denominator for threshold percentages: 10000 BIPS = 100%.
pub const BIPS: u32 = 10_000;

/// Which success rule governs a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollingType {
    /// The proposal must be actively approved by a quorum and a majority.
    Accept,
    /// The proposal proceeds unless a quorum and a majority actively reject it.
    Reject,
}

impl PollingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }

    /// Whether voting succeeded under this polling type.
    ///
    /// For [`PollingType::Reject`], "succeeded" means the rejection was averted
    /// and the proposal proceeds.
    pub fn succeeded(&self, tally: &VoteTally, thresholds: &Thresholds) -> bool {
        let quorum = thresholds.quorum(&tally.total_vote_power);
        let majority = thresholds.majority_bar(&tally.for_votes, &tally.against);
        match self {
            Self::Accept => {
                let for_votes = tally.for_votes.as_biguint();
                if *for_votes < quorum {
                    return false;
                }
                if *for_votes <= majority {
                    return false;
                }
                true
            }
            Self::Reject => {
                let against = tally.against.as_biguint();
                if *against < quorum {
                    return true;
                }
                if *against <= majority {
                    return true;
                }
                false
            }
        }
    }
}

impl fmt::Display for PollingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds fixed when the proposal is created, in BIPS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Threshold applied to wrapped vote power. Recorded, not used by either predicate.
    pub wrapping: u32,
    /// Share of the total vote power the deciding side must reach ("quorum").
    pub absolute: u32,
    /// Share of the cast for + against power the deciding side must exceed.
    pub relative: u32,
}

impl Thresholds {
    /// `absolute * total / BIPS`, truncated.
    pub fn quorum(&self, total_vote_power: &VotePower) -> BigUint {
        BigUint::from(self.absolute) * total_vote_power.as_biguint() / BigUint::from(BIPS)
    }

    /// `relative * (for + against) / BIPS`, truncated.
    pub fn majority_bar(&self, for_votes: &VotePower, against: &VotePower) -> BigUint {
        let cast = for_votes.as_biguint() + against.as_biguint();
        BigUint::from(self.relative) * cast / BigUint::from(BIPS)
    }
}

/// Vote power read from the polling contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Total eligible vote power at the vote power block.
    pub total_vote_power: VotePower,
    #[serde(rename = "for")]
    pub for_votes: VotePower,
    pub against: VotePower,
    pub abstain: VotePower,
}

impl VoteTally {
    pub fn new(
        total_vote_power: impl Into<VotePower>,
        for_votes: impl Into<VotePower>,
        against: impl Into<VotePower>,
        abstain: impl Into<VotePower>,
    ) -> Self {
        Self {
            total_vote_power: total_vote_power.into(),
            for_votes: for_votes.into(),
            against: against.into(),
            abstain: abstain.into(),
        }
    }
}
