//! Downstream building-management platform client.

use std::time::Duration;

use async_trait::async_trait;
use kentix_core::config::{self, defaults};
use kentix_core::{AssetSpec, DataEnvelope};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Header carrying the platform API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Platform request errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Decoding response from {url} failed: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Asset and telemetry operations of the platform.
#[async_trait]
pub trait AssetPlatform: Send + Sync {
    /// Create the asset, or return the existing one with the same global
    /// identifier. `None` when the platform answers without an identifier.
    async fn upsert_asset(&self, spec: &AssetSpec) -> Result<Option<i32>, PlatformError>;

    /// Write one telemetry envelope.
    async fn upsert_data(&self, envelope: &DataEnvelope) -> Result<(), PlatformError>;
}

#[derive(Debug, Deserialize)]
struct AssetIdResponse {
    #[serde(default)]
    id: Option<i32>,
}

/// [`AssetPlatform`] over the platform REST API.
#[derive(Clone)]
pub struct HttpAssetPlatform {
    client: Client,
    endpoint: String,
    token: String,
    timeout: Duration,
}

impl HttpAssetPlatform {
    pub fn new(endpoint: impl AsRef<str>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: config::normalize_endpoint(endpoint.as_ref()),
            token: token.into(),
            timeout: Duration::from_secs(defaults::PLATFORM_TIMEOUT_SECS),
        }
    }

    /// Endpoint and key from `API_ENDPOINT` and `API_TOKEN`.
    pub fn from_env() -> Self {
        Self::new(config::platform_endpoint(), config::platform_token())
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Per-request deadline for asset and data writes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn put_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<String, PlatformError> {
        let url = format!("{}/{}", self.endpoint, path);
        let response = self
            .client
            .put(&url)
            .header(API_KEY_HEADER, &self.token)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|source| PlatformError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| PlatformError::Request {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(PlatformError::Status {
                url,
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl AssetPlatform for HttpAssetPlatform {
    async fn upsert_asset(&self, spec: &AssetSpec) -> Result<Option<i32>, PlatformError> {
        debug!(
            project_id = %spec.project_id,
            global_asset_identifier = %spec.global_asset_identifier,
            "Upserting asset"
        );
        let body = self.put_json("assets", spec).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let response: AssetIdResponse =
            serde_json::from_str(&body).map_err(|source| PlatformError::Decode {
                url: format!("{}/assets", self.endpoint),
                source,
            })?;
        Ok(response.id)
    }

    async fn upsert_data(&self, envelope: &DataEnvelope) -> Result<(), PlatformError> {
        self.put_json("data", envelope).await?;
        Ok(())
    }
}
