//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::pipeline::types::MintError;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The signed transaction went out but the node never acknowledged it.
    /// It may still be mined, so the hash must not be discarded.
    #[error("Broadcast of {hash} unacknowledged after {waited_secs} seconds")]
    BroadcastUnacknowledged { hash: TxHash, waited_secs: u64 },

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {hash} not confirmed after {waited_secs} seconds")]
    ConfirmationTimeout { hash: TxHash, waited_secs: u64 },

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

impl From<BlockchainError> for MintError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::ConfirmationTimeout { hash, waited_secs }
            | BlockchainError::BroadcastUnacknowledged { hash, waited_secs } => {
                MintError::ConfirmationTimeout { hash, waited_secs }
            }
            other => MintError::SubmissionRejected(other.to_string()),
        }
    }
}
