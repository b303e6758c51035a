//! Shared utilities for the governance proposal tracker.

pub mod logging;
pub mod stats;

pub use logging::{init_logging, LogFormat};
pub use stats::StatsCounter;
