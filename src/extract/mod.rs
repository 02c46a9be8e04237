//! Text extraction boundary.
//!
//! Uploaded documents are turned into plain text by an external
//! collaborator. Large or unsupported files are the collaborator's
//! concern; this module only carries the bytes across the wire.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{InferenceConfig, RequestConfig};
use crate::error::{ExtractError, ExtractResult};

/// Kind of uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Image => write!(f, "image"),
        }
    }
}

/// Text extraction capability boundary
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from an uploaded document
    async fn extract(&self, data: &[u8], kind: DocumentKind) -> ExtractResult<String>;
}

/// Extractor that delegates to the collaborator service over HTTP
#[derive(Clone)]
pub struct RemoteExtractor {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    text: String,
}

impl RemoteExtractor {
    /// Create a new remote extractor
    pub fn new(config: &InferenceConfig, request_config: &RequestConfig) -> ExtractResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(ExtractError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl TextExtractor for RemoteExtractor {
    async fn extract(&self, data: &[u8], kind: DocumentKind) -> ExtractResult<String> {
        if data.is_empty() {
            return Err(ExtractError::EmptyDocument);
        }

        let url = format!("{}/v1/extract?kind={}", self.base_url, kind);

        debug!(kind = %kind, bytes = data.len(), "Extracting document text");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/octet-stream")
            .body(data.to_vec())
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let extracted: ExtractResponse = response.json().await?;

        info!(
            kind = %kind,
            chars = extracted.text.len(),
            "Document text extracted"
        );

        Ok(extracted.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_display() {
        assert_eq!(DocumentKind::Pdf.to_string(), "pdf");
        assert_eq!(DocumentKind::Image.to_string(), "image");
    }
}
