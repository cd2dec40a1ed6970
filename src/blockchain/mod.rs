//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + BlockchainConfig
//!     → wallet.rs (key loading, signer)
//!     → client.rs (RPC connection with timeouts, local signing, raw broadcast)
//!     → contracts.rs (sol! bindings, calldata)
//!     → transaction.rs (gas check, broadcast, confirmation)
//!     → receipt.rs (logs → ordered pipeline events)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contracts;
pub mod receipt;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::ChainSubmitter;
pub use types::{BlockchainConfig, BlockchainError, ChainId};
pub use wallet::Wallet;
