use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{CompletionRequest, CompletionResponse, EducationLevel, Message};
use super::Inference;
use crate::config::{InferenceConfig, RequestConfig};
use crate::error::{InferenceError, InferenceResult};
use crate::prompts;

use async_trait::async_trait;

/// HTTP client for the external inference service
#[derive(Clone)]
pub struct HttpInferenceClient {
    client: Client,
    base_url: String,
    api_key: String,
    request_config: RequestConfig,
}

impl HttpInferenceClient {
    /// Create a new inference client
    pub fn new(config: &InferenceConfig, request_config: RequestConfig) -> InferenceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(InferenceError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            request_config,
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a single completion request. There is no automatic retry;
    /// a slow or failed call surfaces to the caller exactly once.
    async fn complete(&self, request: CompletionRequest) -> InferenceResult<String> {
        let url = format!("{}/v1/completions", self.base_url);
        let start = Instant::now();

        debug!(messages = request.messages.len(), "Calling inference service");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    InferenceError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Inference service returned error");
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let completion: CompletionResponse =
            response
                .json()
                .await
                .map_err(|e| InferenceError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        info!(
            latency_ms = start.elapsed().as_millis() as u64,
            "Inference call succeeded"
        );

        Ok(completion.completion)
    }
}

#[async_trait]
impl Inference for HttpInferenceClient {
    async fn answer(
        &self,
        question: &str,
        context: &str,
        level: EducationLevel,
    ) -> InferenceResult<String> {
        let messages = vec![
            Message::system(prompts::answer_prompt(level)),
            Message::user(prompts::answer_input(question, context)),
        ];

        self.complete(CompletionRequest::new(messages)).await
    }

    async fn summarize(&self, text: &str, level: EducationLevel) -> InferenceResult<String> {
        let messages = vec![
            Message::system(prompts::summarize_prompt(level)),
            Message::user(text.to_string()),
        ];

        self.complete(CompletionRequest::new(messages)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = InferenceConfig {
            api_key: "test_key".to_string(),
            base_url: "http://localhost:8080/".to_string(),
        };

        let client = HttpInferenceClient::new(&config, RequestConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
