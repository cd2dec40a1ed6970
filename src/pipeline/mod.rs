//! Minting pipeline orchestration.
//!
//! # Data Flow
//! ```text
//! CollectionCreationFlow:
//!     CollectionParams → normalize base URI
//!         → submitter.send (createCollection) → tracker
//!         → submitter.confirm → extract.rs (event #2, collectionAddress)
//!
//! SingleMintFlow:
//!     image → pinner (binary) → MetadataBuilder → pinner (JSON)
//!         → submitter.send (mint "ipfs://<metadata id>") → tracker
//!         → submitter.confirm → receipt
//!
//! TokenMintFlow:
//!     recipient + amount → submitter.send (mintTo) → tracker → confirm
//! ```
//!
//! # Design Decisions
//! - Steps run strictly in sequence; each takes the previous step's output
//! - Any failure ends the attempt; nothing is retried automatically
//! - Attempts own their progress channel, so concurrent attempts stay apart

pub mod collection;
pub mod extract;
pub mod mint;
pub mod state;
pub mod submitter;
pub mod token;
pub mod types;

pub use collection::{CollectionAttempt, CollectionCreationFlow};
pub use extract::{extract_collection_address, extract_mint_confirmation, COLLECTION_CREATED};
pub use mint::{MintAttempt, MintRequest, SingleMintFlow};
pub use state::{CollectionStage, Failure, MintStage};
pub use submitter::TransactionSubmitter;
pub use token::{TokenDetails, TokenMintFlow};
pub use types::{
    CollectionParams, ContractCall, Event, FailureKind, MintError, MintResult,
    PendingTransaction, TransactionReceipt, TransactionRequest,
};
