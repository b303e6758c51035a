//! Indexer configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use govwatch_governance::PollingType;
use govwatch_types::{Address, ChainId};
use govwatch_utils::LogFormat;

use crate::IndexerError;

/// A polling contract whose `ProposalCreated` events are tracked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingContractConfig {
    pub address: Address,
    pub polling_type: PollingType,
}

/// Configuration for the proposal indexer.
///
/// Can be loaded from a TOML file via [`IndexerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Chain id stamped on every record created by this indexer.
    #[serde(default = "default_chain_id")]
    pub chain_id: ChainId,

    /// How long after a proposal's last window closes its reads keep being
    /// scheduled, in seconds.
    #[serde(default = "default_refresh_grace_secs")]
    pub refresh_grace_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Polling contracts to track. Events from any other address are skipped.
    #[serde(default)]
    pub contracts: Vec<PollingContractConfig>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain_id() -> ChainId {
    ChainId::new(14)
}

fn default_refresh_grace_secs() -> u64 {
    3_600
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl IndexerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, IndexerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, IndexerError> {
        let config: Self = toml::from_str(s).map_err(|e| IndexerError::Config(e.to_string()))?;
        config.polling_types()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, IndexerError> {
        toml::to_string_pretty(self).map_err(|e| IndexerError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber from `log_format` and `log_level`.
    pub fn init_logging(&self) -> Result<(), IndexerError> {
        govwatch_utils::init_logging(self.log_format, &self.log_level)
            .map_err(|e| IndexerError::Config(format!("cannot initialise logging: {e}")))
    }

    /// Map of tracked contract to its polling type.
    ///
    /// Listing the same contract twice is fine; listing it with two different
    /// polling types is a config error.
    pub fn polling_types(&self) -> Result<HashMap<Address, PollingType>, IndexerError> {
        let mut types = HashMap::with_capacity(self.contracts.len());
        for contract in &self.contracts {
            if let Some(existing) = types.insert(contract.address, contract.polling_type) {
                if existing != contract.polling_type {
                    return Err(IndexerError::Config(format!(
                        "contract {} listed as both {} and {}",
                        contract.address, existing, contract.polling_type
                    )));
                }
            }
        }
        Ok(types)
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            refresh_grace_secs: default_refresh_grace_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            contracts: Vec::new(),
        }
    }
}
