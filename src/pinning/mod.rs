//! Content pinning subsystem.
//!
//! # Data Flow
//! ```text
//! image bytes
//!     → types.rs (PinRequest::Binary)
//!     → pinata.rs (multipart upload) → content id
//!     → metadata.rs (AssetMetadata referencing ipfs://<content id>)
//!     → types.rs (PinRequest::JsonDocument)
//!     → pinata.rs (JSON pin) → token URI content id
//! ```
//!
//! # Design Decisions
//! - One network round trip per pin; no retries, callers reissue attempts
//! - Pinned content is never deleted; there is no unpin contract
//! - The bearer credential is read-only configuration

pub mod metadata;
pub mod pinata;
pub mod types;

use async_trait::async_trait;

use crate::pipeline::types::MintResult;

pub use metadata::{AssetMetadata, MetadataBuilder, IPFS_SCHEME};
pub use pinata::PinataPinner;
pub use types::{FileUpload, PinRequest, PinResult};

/// Uploads content to a content-addressed storage network.
#[async_trait]
pub trait ContentPinner: Send + Sync {
    /// Pin `request` and return its content identifier.
    async fn pin(&self, request: PinRequest) -> MintResult<PinResult>;
}
