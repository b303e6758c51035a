//! Timestamp type used throughout the tracker.
//!
//! Timestamps are Unix epoch seconds (UTC), exactly as the polling contracts
//! report voting and execution windows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero). Also the "not yet known" value for window fields.
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
