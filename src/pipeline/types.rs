//! Pipeline data model and error taxonomy.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Path separator every collection base URI must end with.
pub const BASE_URI_SEPARATOR: char = '/';

/// Errors surfaced by the pinning, submission and extraction stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MintError {
    /// The pinning service errored, timed out or answered without a content id.
    #[error("pinning failed: {0}")]
    PinningFailure(String),

    /// The network or signer refused the transaction before inclusion.
    #[error("transaction rejected: {0}")]
    SubmissionRejected(String),

    /// No receipt with the required depth arrived within the wait policy.
    #[error("transaction {hash} not confirmed after {waited_secs} seconds")]
    ConfirmationTimeout { hash: TxHash, waited_secs: u64 },

    /// The receipt's event log does not have the expected shape.
    #[error("receipt has no `{field}` in event #{ordinal}")]
    MissingExpectedEvent { ordinal: usize, field: &'static str },

    /// Caller-supplied input cannot be turned into a request.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for pipeline operations.
pub type MintResult<T> = Result<T, MintError>;

/// Coarse failure classification for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    PinningFailure,
    SubmissionRejected,
    ConfirmationTimeout,
    MissingExpectedEvent,
    InvalidInput,
}

impl FailureKind {
    /// Short human-readable headline.
    pub fn headline(self) -> &'static str {
        match self {
            FailureKind::PinningFailure => "Pinning to IPFS failed",
            FailureKind::SubmissionRejected => "Transaction was rejected",
            FailureKind::ConfirmationTimeout => "Transaction was not confirmed in time",
            FailureKind::MissingExpectedEvent => "No events have been emitted",
            FailureKind::InvalidInput => "Invalid input",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.headline())
    }
}

impl MintError {
    pub fn kind(&self) -> FailureKind {
        match self {
            MintError::PinningFailure(_) => FailureKind::PinningFailure,
            MintError::SubmissionRejected(_) => FailureKind::SubmissionRejected,
            MintError::ConfirmationTimeout { .. } => FailureKind::ConfirmationTimeout,
            MintError::MissingExpectedEvent { .. } => FailureKind::MissingExpectedEvent,
            MintError::InvalidInput(_) => FailureKind::InvalidInput,
        }
    }
}

/// Parameters of a new collection, as supplied by the form layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionParams {
    pub name: String,
    pub symbol: String,
    /// Maximum tokens a single address may mint.
    pub user_limit: u64,
    pub max_supply: u64,
    /// Price per token in wei.
    pub unit_price: U256,
    /// Metadata base URI; token ids are appended to it by the contract.
    pub base_uri: String,
}

impl CollectionParams {
    /// Return a copy whose `base_uri` ends with exactly one trailing separator.
    pub fn normalized(&self) -> Self {
        Self {
            base_uri: normalize_base_uri(&self.base_uri),
            ..self.clone()
        }
    }
}

/// Append [`BASE_URI_SEPARATOR`] unless the URI already ends with it.
pub fn normalize_base_uri(base_uri: &str) -> String {
    if base_uri.ends_with(BASE_URI_SEPARATOR) {
        base_uri.to_string()
    } else {
        format!("{}{}", base_uri, BASE_URI_SEPARATOR)
    }
}

/// The contract function a transaction invokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// `createCollection(name, symbol, userLimit, maxSupply, price, baseUri)`
    CreateCollection(CollectionParams),
    /// `mint(tokenUri)`
    Mint { token_uri: String },
    /// `mintTo(to, amount)`
    MintTo { recipient: Address, amount: U256 },
}

/// A prepared contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub target: Address,
    pub call: ContractCall,
    /// Label reported to the transaction tracker.
    pub description: String,
}

/// A transaction accepted by the network but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub hash: TxHash,
    pub description: String,
}

/// One decoded entry of a receipt's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Position in the transaction's log, starting at 0.
    pub index: usize,
    pub name: String,
    pub args: BTreeMap<String, String>,
}

impl Event {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }
}

/// A confirmed transaction and its emitted events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub event_log: Vec<Event>,
}
