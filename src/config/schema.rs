//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the minter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the minting pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MinterConfig {
    /// Pinning service (IPFS) settings.
    pub pinning: PinningConfig,

    /// Blockchain RPC and confirmation settings.
    pub blockchain: BlockchainConfig,

    /// Deployed contract addresses.
    pub contracts: ContractsConfig,

    /// Recent transaction history.
    pub tracking: TrackingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Pinning service configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PinningConfig {
    /// Base URL of the Pinata-compatible API, optionally with a path prefix.
    pub api_url: String,

    /// Bearer credential. Usually supplied through `PINATA_JWT`.
    pub jwt: String,

    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pinata.cloud".to_string(),
            jwt: String::new(),
            timeout_secs: 60,
        }
    }
}

// The credential must never reach the logs.
impl std::fmt::Debug for PinningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinningConfig")
            .field("api_url", &self.api_url)
            .field("jwt", &if self.jwt.is_empty() { "<unset>" } else { "<redacted>" })
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL. Transactions are only ever sent here.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for read calls.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before a receipt is accepted.
    pub confirmation_blocks: u32,

    /// How long to wait for confirmation before giving up, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Interval between receipt lookups while confirming, in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 300,
            poll_interval_ms: 2000,
            max_gas_price_gwei: 500,
        }
    }
}

/// Addresses of the contracts the flows drive.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Collection factory (`createCollection`).
    pub collection_factory: String,

    /// Single NFT minter (`mint`).
    pub nft_minter: String,
}

/// Recent transaction history settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Record submitted transactions.
    pub enabled: bool,

    /// JSON file the history is persisted to. `None` keeps it in memory.
    pub history_path: Option<String>,

    /// Oldest entries beyond this count are dropped.
    pub max_entries: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            history_path: Some("recent_transactions.json".to_string()),
            max_entries: 50,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: MinterConfig = toml::from_str(
            r#"
            [contracts]
            collection_factory = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            "#,
        )
        .unwrap();

        assert_eq!(config.pinning.api_url, "https://api.pinata.cloud");
        assert_eq!(config.blockchain.confirmation_blocks, 1);
        assert_eq!(config.tracking.max_entries, 50);
        assert!(config.contracts.nft_minter.is_empty());
    }

    #[test]
    fn test_jwt_is_redacted_in_debug() {
        let config = PinningConfig {
            jwt: "super-secret".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
