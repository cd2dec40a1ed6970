//! Pin requests and results.

use serde::{Deserialize, Serialize};

/// A file to upload as a binary pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    /// MIME type sent with the multipart part, when known.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Content to pin.
#[derive(Debug, Clone, PartialEq)]
pub enum PinRequest {
    Binary(FileUpload),
    JsonDocument(serde_json::Value),
}

impl PinRequest {
    /// Payload kind label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PinRequest::Binary(_) => "binary",
            PinRequest::JsonDocument(_) => "json",
        }
    }
}

/// Identifier of pinned content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinResult {
    pub content_id: String,
}

impl std::fmt::Display for PinResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.content_id)
    }
}
