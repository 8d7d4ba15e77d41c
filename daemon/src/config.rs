//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use ballot_crypto::decode_contract_id;
use ballot_types::{ContractId, NetworkId};
use ballot_utils::LogFormat;
use ballot_wallet_core::{OrchestratorConfig, PollPolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Configuration shared by every `ballot` subcommand.
///
/// Loaded from a TOML file via [`BallotConfig::from_toml_file`]; every
/// field falls back to its default when absent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BallotConfig {
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Ledger node JSON-RPC endpoint. Defaults to the network's hosted node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Voting contract address.
    #[serde(default = "default_contract_id")]
    pub contract_id: String,

    /// Port `ballot serve` listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Proposal store endpoint read by `vote` and `proposals`.
    #[serde(default = "default_proposals_url")]
    pub proposals_url: String,

    /// Fee bid on vote transactions, in stroops.
    #[serde(default = "default_vote_fee")]
    pub vote_fee: u32,

    /// Fee bid on simulation-only transactions, in stroops.
    #[serde(default = "default_simulation_fee")]
    pub simulation_fee: u32,

    /// Validity window of vote transactions.
    #[serde(default = "default_tx_timeout_secs")]
    pub tx_timeout_secs: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Derived from the validity window when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_polls: Option<u32>,

    /// Upper bound on proposals `serve` reads from the contract.
    #[serde(default = "default_max_proposals")]
    pub max_proposals: u64,

    #[serde(default = "default_sign_timeout_secs")]
    pub sign_timeout_secs: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Testnet
}

fn default_contract_id() -> String {
    "CAUYK67YNHDL4772UCM6NCTMHLEB7B3WCP637OARYEJGJJV75DBYCTYC".to_string()
}

fn default_listen_port() -> u16 {
    3001
}

fn default_proposals_url() -> String {
    "http://localhost:3001/api/proposals".to_string()
}

fn default_vote_fee() -> u32 {
    ballot_wallet_core::DEFAULT_VOTE_FEE
}

fn default_simulation_fee() -> u32 {
    ballot_simulation::SIMULATION_FEE
}

fn default_tx_timeout_secs() -> u64 {
    ballot_transactions::DEFAULT_TIMEOUT_SECS
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_proposals() -> u64 {
    ballot_rpc::DEFAULT_MAX_PROPOSALS
}

fn default_sign_timeout_secs() -> u64 {
    ballot_wallet_core::DEFAULT_SIGN_TIMEOUT.as_secs()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BallotConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }

    /// The contract id, with its checksum verified.
    pub fn contract(&self) -> Result<ContractId, ConfigError> {
        let contract = ContractId::parse(self.contract_id.as_str())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if decode_contract_id(&contract).is_none() {
            return Err(ConfigError::Invalid(format!(
                "contract id {contract} has a bad checksum"
            )));
        }
        Ok(contract)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        let interval = Duration::from_millis(self.poll_interval_ms.max(1));
        let derived = PollPolicy::for_timeout(self.tx_timeout_secs, interval);
        match self.max_polls {
            Some(max_polls) => PollPolicy {
                interval,
                max_polls: max_polls.max(1),
            },
            None => derived,
        }
    }

    pub fn orchestrator_config(&self) -> Result<OrchestratorConfig, ConfigError> {
        let mut config = OrchestratorConfig::new(self.contract()?, self.network);
        config.fee = self.vote_fee;
        config.timeout_secs = self.tx_timeout_secs;
        config.poll = self.poll_policy();
        config.sign_timeout = Duration::from_secs(self.sign_timeout_secs);
        Ok(config)
    }
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            rpc_url: None,
            contract_id: default_contract_id(),
            listen_port: default_listen_port(),
            proposals_url: default_proposals_url(),
            vote_fee: default_vote_fee(),
            simulation_fee: default_simulation_fee(),
            tx_timeout_secs: default_tx_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: None,
            max_proposals: default_max_proposals(),
            sign_timeout_secs: default_sign_timeout_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
