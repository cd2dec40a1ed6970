//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::MinterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Pinning credential.
pub const PINATA_JWT_ENV_VAR: &str = "PINATA_JWT";
/// Collection factory address.
pub const FACTORY_ADDRESS_ENV_VAR: &str = "NFT_FACTORY_ADDRESS";
/// Single NFT minter address.
pub const MINTER_ADDRESS_ENV_VAR: &str = "NFT_MINTER_ADDRESS";
/// Primary RPC endpoint.
pub const RPC_URL_ENV_VAR: &str = "MINTER_RPC_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    /// A command needs a setting that was left empty.
    #[error("Missing setting: {0}")]
    Missing(&'static str),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the process environment and validate a TOML file.
pub fn load_config(path: &Path) -> Result<MinterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: MinterConfig = toml::from_str(&content)?;
    finalize(config)
}

/// Like [`load_config`], but falls back to defaults when `path` does not exist.
pub fn load_or_default(path: &Path) -> Result<MinterConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        finalize(MinterConfig::default())
    }
}

fn finalize(mut config: MinterConfig) -> Result<MinterConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overwrite settings from environment-style variables.
///
/// `lookup` resolves a variable name; empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut MinterConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(jwt) = get(PINATA_JWT_ENV_VAR) {
        config.pinning.jwt = jwt;
    }
    if let Some(address) = get(FACTORY_ADDRESS_ENV_VAR) {
        config.contracts.collection_factory = address;
    }
    if let Some(address) = get(MINTER_ADDRESS_ENV_VAR) {
        config.contracts.nft_minter = address;
    }
    if let Some(url) = get(RPC_URL_ENV_VAR) {
        config.blockchain.rpc_url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (PINATA_JWT_ENV_VAR, "jwt-token"),
            (FACTORY_ADDRESS_ENV_VAR, "0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            (RPC_URL_ENV_VAR, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = MinterConfig::default();
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.pinning.jwt, "jwt-token");
        assert_eq!(
            config.contracts.collection_factory,
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
        // Blank values leave the file setting alone.
        assert_eq!(config.blockchain.rpc_url, "http://localhost:8545");
        assert!(config.contracts.nft_minter.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("minter-config-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            r#"
            [blockchain]
            rpc_url = "http://127.0.0.1:8545"
            chain_id = 11155111
            confirmation_blocks = 2

            [pinning]
            timeout_secs = 15
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.blockchain.chain_id, 11155111);
        assert_eq!(config.blockchain.confirmation_blocks, 2);
        assert_eq!(config.pinning.timeout_secs, 15);

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_invalid_file_reports_validation() {
        let path = std::env::temp_dir().join(format!("minter-config-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[pinning]\ntimeout_secs = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("pinning.timeout_secs"));

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("definitely-not-here-minter.toml");
        let config = load_or_default(&path).unwrap();
        assert_eq!(config.pinning.timeout_secs, 60);
    }
}
