//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! minter.toml (optional) + .env / process environment
//!     → loader.rs (parse, deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → MinterConfig (validated, immutable)
//!     → cloned into pinner, blockchain client and tracker at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Secrets (pinning JWT) come from the environment; the signing key is
//!   never part of the config at all (see `blockchain::wallet`)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    BlockchainConfig, ContractsConfig, MinterConfig, ObservabilityConfig, PinningConfig,
    TrackingConfig,
};
