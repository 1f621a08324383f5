use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::types::{BackendError, GenerationParams, SummarizationBackend};

/// Configuration for the hosted inference backend
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base URL of the inference service
    pub endpoint: String,
    /// Bearer token, if the service requires one
    pub api_key: Option<String>,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
    /// Ask the service to block while a cold model loads instead of
    /// returning 503
    pub wait_for_model: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co".to_string(),
            api_key: None,
            timeout_secs: 60,
            wait_for_model: false,
        }
    }
}

/// Response item returned by summarization models
#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

/// reqwest-based client for an HF-style hosted inference API.
pub struct HttpInferenceBackend {
    client: Client,
    config: InferenceConfig,
}

impl HttpInferenceBackend {
    /// Create a new client.
    pub fn new(config: InferenceConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn build_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.config.endpoint.trim_end_matches('/'), model_id)
    }
}

#[async_trait]
impl SummarizationBackend for HttpInferenceBackend {
    async fn summarize(
        &self,
        model_id: &str,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError> {
        let body = json!({
            "inputs": text,
            "parameters": params,
            "options": { "wait_for_model": self.config.wait_for_model },
        });

        let mut request = self.client.post(self.build_url(model_id)).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        debug!(model_id, input_chars = text.chars().count(), "backend call");
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(match status.as_u16() {
                401 | 403 => BackendError::Auth(message),
                429 => BackendError::RateLimited(message),
                503 => BackendError::ModelWarming(message),
                code => BackendError::Http {
                    status: code,
                    message,
                },
            });
        }

        let items: Vec<SummaryItem> = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        items
            .into_iter()
            .next()
            .map(|item| item.summary_text)
            .ok_or_else(|| BackendError::InvalidResponse("empty response array".to_string()))
    }
}
