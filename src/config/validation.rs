//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs and contract addresses
//! - Validate value ranges (timeouts > 0, confirmation depth)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MinterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Empty contract addresses and credentials are allowed here; each command
//!   checks what it actually needs

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::MinterConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `blockchain.rpc_url`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &MinterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "pinning.api_url", &config.pinning.api_url);
    if config.pinning.timeout_secs == 0 {
        errors.push(ValidationError::new("pinning.timeout_secs", "must be greater than 0"));
    }

    let chain = &config.blockchain;
    check_url(&mut errors, "blockchain.rpc_url", &chain.rpc_url);
    for (i, url) in chain.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("blockchain.failover_urls[{}]", i), url);
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be greater than 0"));
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("blockchain.poll_interval_ms", "must be greater than 0"));
    }
    if chain.poll_interval_ms / 1000 >= chain.confirmation_timeout_secs {
        errors.push(ValidationError::new(
            "blockchain.poll_interval_ms",
            "must be shorter than the confirmation timeout",
        ));
    }

    check_address(&mut errors, "contracts.collection_factory", &config.contracts.collection_factory);
    check_address(&mut errors, "contracts.nft_minter", &config.contracts.nft_minter);

    if config.tracking.enabled && config.tracking.max_entries == 0 {
        errors.push(ValidationError::new("tracking.max_entries", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e))),
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    if value.parse::<Address>().is_err() {
        errors.push(ValidationError::new(field, format!("'{}' is not an address", value)));
    }
}
