//! NFT collection deployment and single-mint pipeline.
//!
//! Pins images and metadata to IPFS, submits the dependent contract calls and
//! extracts results from the confirmed receipts.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod pinning;
pub mod pipeline;
pub mod tracking;

pub use config::MinterConfig;
pub use pipeline::{CollectionCreationFlow, MintError, SingleMintFlow, TokenMintFlow};
