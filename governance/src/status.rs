//! Status derivation.
//!
//! Both statuses are recomputed from the record on every read and take `now`
//! explicitly. Neither ever mutates the record.

use crate::proposal::ProposalRecord;
use govwatch_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the voting phase only, independent of execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VotingStatus {
    Pending,
    Active,
    Succeeded,
    Defeated,
}

/// Full lifecycle state, matching the governor contract's `state()` view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleStatus {
    Pending,
    Active,
    /// Voting passed; the execution window has not opened yet.
    Succeeded,
    /// Voting passed and the proposal awaits execution (or has nothing to execute).
    Queued,
    /// The execution window closed without execution.
    Expired,
    Executed,
    Defeated,
}

impl fmt::Display for VotingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl ProposalRecord {
    /// Voting status at `now`. Ignores `executed` and `executable_on_chain`.
    pub fn voting_status(&self, now: Timestamp) -> VotingStatus {
        if now < self.start_time {
            return VotingStatus::Pending;
        }
        if now < self.end_time {
            return VotingStatus::Active;
        }
        if self.voting_succeeded() {
            VotingStatus::Succeeded
        } else {
            VotingStatus::Defeated
        }
    }

    /// Lifecycle status at `now`.
    ///
    /// `executed` takes absolute priority. Since nothing is cached, clearing
    /// `executed` on the record makes the status fall back to whatever the
    /// windows and tally imply.
    pub fn lifecycle_status(&self, now: Timestamp) -> LifecycleStatus {
        if self.executed {
            return LifecycleStatus::Executed;
        }
        if now < self.start_time {
            return LifecycleStatus::Pending;
        }
        if now < self.end_time {
            return LifecycleStatus::Active;
        }
        if !self.voting_succeeded() {
            return LifecycleStatus::Defeated;
        }
        if !self.executable_on_chain {
            return LifecycleStatus::Queued;
        }
        if now < self.exec_start_time {
            return LifecycleStatus::Succeeded;
        }
        if now < self.exec_end_time {
            return LifecycleStatus::Queued;
        }
        LifecycleStatus::Expired
    }

    /// Whether fresh contract reads could still change this record at `now`.
    ///
    /// Decided from the windows and `executed` only, never from the derived
    /// status, which may rest on a tally that has not been re-read yet. Reads
    /// stay scheduled until `grace_secs` after the voting window closes, or
    /// after the execution window closes when the proposal is executable on
    /// chain.
    pub fn needs_refresh(&self, now: Timestamp, grace_secs: u64) -> bool {
        if self.executed {
            return false;
        }
        let settles_at = if self.executable_on_chain {
            self.end_time.max(self.exec_end_time)
        } else {
            self.end_time
        };
        now.as_secs() < settles_at.as_secs().saturating_add(grace_secs)
    }

    /// Whether the proposal's on-chain action may be triggered at `now`.
    pub fn is_execution_eligible(&self, now: Timestamp) -> bool {
        self.executable_on_chain && self.lifecycle_status(now) == LifecycleStatus::Queued
    }
}
