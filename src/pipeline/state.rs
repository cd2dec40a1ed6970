//! Orchestrator stages.
//!
//! Each attempt publishes its current stage on a `watch` channel; the last
//! value is always either `Succeeded` or `Failed`.

use serde::{Deserialize, Serialize};

use crate::pipeline::types::{FailureKind, MintError};

/// Terminal failure of an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&MintError> for Failure {
    fn from(err: &MintError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Stages of [`CollectionCreationFlow`](crate::pipeline::CollectionCreationFlow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionStage {
    Idle,
    Normalizing,
    Submitting,
    Confirming,
    Extracting,
    Succeeded,
    Failed(Failure),
}

/// Stages of [`SingleMintFlow`](crate::pipeline::SingleMintFlow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MintStage {
    Idle,
    PinningImage,
    PinningMetadata,
    Submitting,
    Confirming,
    Succeeded,
    Failed(Failure),
}

impl CollectionStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CollectionStage::Succeeded | CollectionStage::Failed(_))
    }
}

impl MintStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MintStage::Succeeded | MintStage::Failed(_))
    }
}

impl std::fmt::Display for CollectionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionStage::Idle => f.write_str("idle"),
            CollectionStage::Normalizing => f.write_str("normalizing parameters"),
            CollectionStage::Submitting => f.write_str("submitting transaction"),
            CollectionStage::Confirming => f.write_str("waiting for confirmation"),
            CollectionStage::Extracting => f.write_str("reading collection address"),
            CollectionStage::Succeeded => f.write_str("succeeded"),
            CollectionStage::Failed(failure) => write!(f, "failed: {}", failure.kind),
        }
    }
}

impl std::fmt::Display for MintStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MintStage::Idle => f.write_str("idle"),
            MintStage::PinningImage => f.write_str("pinning image to IPFS"),
            MintStage::PinningMetadata => f.write_str("pinning metadata to IPFS"),
            MintStage::Submitting => f.write_str("submitting transaction"),
            MintStage::Confirming => f.write_str("waiting for confirmation"),
            MintStage::Succeeded => f.write_str("succeeded"),
            MintStage::Failed(failure) => write!(f, "failed: {}", failure.kind),
        }
    }
}
