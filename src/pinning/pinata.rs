//! Pinata-compatible pinning client.
//!
//! # Endpoints
//! - `POST /pinning/pinFileToIPFS`: multipart form, part `file`
//! - `POST /pinning/pinJSONToIPFS`: `{ "pinataContent": <document> }`
//!
//! Both answer `{ "IpfsHash": "...", ... }` and require a bearer token.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use url::Url;

use crate::config::PinningConfig;
use crate::observability::metrics;
use crate::pinning::types::{FileUpload, PinRequest, PinResult};
use crate::pinning::ContentPinner;
use crate::pipeline::types::{MintError, MintResult};

/// Binary upload endpoint, relative to the API origin.
pub const PIN_FILE_PATH: &str = "pinning/pinFileToIPFS";
/// JSON document endpoint, relative to the API origin.
pub const PIN_JSON_PATH: &str = "pinning/pinJSONToIPFS";

#[derive(Serialize)]
struct PinJsonBody<'a> {
    #[serde(rename = "pinataContent")]
    pinata_content: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Pins content through the Pinata HTTP API.
#[derive(Clone)]
pub struct PinataPinner {
    client: Client,
    file_endpoint: Url,
    json_endpoint: Url,
    jwt: String,
}

impl PinataPinner {
    /// Create a pinner from configuration.
    ///
    /// Fails when no credential is configured or the API URL is unusable.
    pub fn new(config: &PinningConfig) -> MintResult<Self> {
        if config.jwt.trim().is_empty() {
            return Err(MintError::PinningFailure(
                "no pinning credential configured (set PINATA_JWT)".to_string(),
            ));
        }

        let mut base: Url = config.api_url.parse().map_err(|e| {
            MintError::PinningFailure(format!("Invalid pinning API URL '{}': {}", config.api_url, e))
        })?;
        // `join` replaces the last segment unless the path ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let join = |path: &str| {
            base.join(path)
                .map_err(|e| MintError::PinningFailure(format!("Invalid pinning endpoint: {}", e)))
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MintError::PinningFailure(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            file_endpoint: join(PIN_FILE_PATH)?,
            json_endpoint: join(PIN_JSON_PATH)?,
            jwt: config.jwt.clone(),
        })
    }

    async fn upload_file(&self, file: FileUpload) -> reqwest::Result<Response> {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part);

        self.client
            .post(self.file_endpoint.clone())
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await
    }

    async fn upload_json(&self, document: &serde_json::Value) -> reqwest::Result<Response> {
        self.client
            .post(self.json_endpoint.clone())
            .bearer_auth(&self.jwt)
            .json(&PinJsonBody {
                pinata_content: document,
            })
            .send()
            .await
    }

    async fn read_content_id(response: Response) -> MintResult<PinResult> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MintError::PinningFailure(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(MintError::PinningFailure(format!(
                "Pinning service returned error status {}: {}",
                status, text
            )));
        }

        let body: PinResponse = serde_json::from_str(&text).map_err(|e| {
            MintError::PinningFailure(format!("Malformed pinning response: {}", e))
        })?;
        if body.ipfs_hash.trim().is_empty() {
            return Err(MintError::PinningFailure(
                "Pinning response has an empty IpfsHash".to_string(),
            ));
        }

        Ok(PinResult {
            content_id: body.ipfs_hash,
        })
    }
}

#[async_trait]
impl ContentPinner for PinataPinner {
    async fn pin(&self, request: PinRequest) -> MintResult<PinResult> {
        let kind = request.kind();
        let started = Instant::now();

        let sent = match request {
            PinRequest::Binary(file) => self.upload_file(file).await,
            PinRequest::JsonDocument(document) => self.upload_json(&document).await,
        };
        let result = match sent {
            Ok(response) => Self::read_content_id(response).await,
            Err(e) if e.is_timeout() => Err(MintError::PinningFailure(format!(
                "Pinning request timed out: {}",
                e
            ))),
            Err(e) => Err(MintError::PinningFailure(format!("Pinning request failed: {}", e))),
        };

        metrics::record_pin(kind, result.is_ok(), started.elapsed());
        match &result {
            Ok(pinned) => tracing::info!(kind, content_id = %pinned, "Content pinned"),
            Err(e) => tracing::warn!(kind, error = %e, "Pinning failed"),
        }
        result
    }
}

impl std::fmt::Debug for PinataPinner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataPinner")
            .field("file_endpoint", &self.file_endpoint.as_str())
            .field("json_endpoint", &self.json_endpoint.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PinningConfig {
        PinningConfig {
            jwt: "test-jwt".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoints_from_origin() {
        let pinner = PinataPinner::new(&config()).unwrap();
        assert_eq!(
            pinner.file_endpoint.as_str(),
            "https://api.pinata.cloud/pinning/pinFileToIPFS"
        );
        assert_eq!(
            pinner.json_endpoint.as_str(),
            "https://api.pinata.cloud/pinning/pinJSONToIPFS"
        );
    }

    #[test]
    fn test_endpoints_keep_api_path_prefix() {
        let mut config = config();
        config.api_url = "https://gateway.example.com/api".to_string();
        let pinner = PinataPinner::new(&config).unwrap();
        assert_eq!(
            pinner.file_endpoint.as_str(),
            "https://gateway.example.com/api/pinning/pinFileToIPFS"
        );

        config.api_url = "https://gateway.example.com/api/".to_string();
        let pinner = PinataPinner::new(&config).unwrap();
        assert_eq!(
            pinner.json_endpoint.as_str(),
            "https://gateway.example.com/api/pinning/pinJSONToIPFS"
        );
    }

    #[test]
    fn test_requires_credential() {
        let err = PinataPinner::new(&PinningConfig::default()).unwrap_err();
        assert!(err.to_string().contains("PINATA_JWT"));
    }

    #[test]
    fn test_invalid_api_url() {
        let mut config = config();
        config.api_url = "::nope".to_string();
        assert!(matches!(
            PinataPinner::new(&config),
            Err(MintError::PinningFailure(_))
        ));
    }

    #[test]
    fn test_debug_hides_jwt() {
        let pinner = PinataPinner::new(&config()).unwrap();
        assert!(!format!("{:?}", pinner).contains("test-jwt"));
    }

    #[test]
    fn test_json_body_shape() {
        let document = serde_json::json!({ "name": "n" });
        let body = serde_json::to_value(PinJsonBody {
            pinata_content: &document,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "pinataContent": { "name": "n" } }));
    }
}
