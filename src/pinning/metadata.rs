//! Token metadata documents.

use serde::{Deserialize, Serialize};

use crate::pinning::types::PinRequest;
use crate::pipeline::types::{MintError, MintResult};

/// URI scheme prefixed to content identifiers.
pub const IPFS_SCHEME: &str = "ipfs://";

/// Content URI for a pinned content id.
pub fn ipfs_uri(content_id: &str) -> String {
    format!("{}{}", IPFS_SCHEME, content_id)
}

/// Standard NFT metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub name: String,
    pub description: String,
    /// `ipfs://` URI of the pinned image.
    pub image: String,
}

impl AssetMetadata {
    /// JSON document to pin.
    pub fn to_document(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "image": self.image,
        })
    }

    pub fn into_pin_request(self) -> PinRequest {
        PinRequest::JsonDocument(self.to_document())
    }
}

/// Composes [`AssetMetadata`] from a pinned image.
pub struct MetadataBuilder;

impl MetadataBuilder {
    /// Reject names the metadata document cannot carry.
    pub fn check_name(name: &str) -> MintResult<()> {
        if name.trim().is_empty() {
            return Err(MintError::InvalidInput("metadata name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn build(name: &str, description: &str, image_content_id: &str) -> MintResult<AssetMetadata> {
        Self::check_name(name)?;
        Ok(AssetMetadata {
            name: name.to_string(),
            description: description.to_string(),
            image: ipfs_uri(image_content_id),
        })
    }
}
