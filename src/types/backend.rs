use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a summarization backend.
///
/// The variants mirror how hosted inference services fail: authentication is
/// fatal, rate limiting and model warm-up are retryable, connection problems
/// are retryable inside the local retry budget and fatal after it.
#[derive(Error, Debug)]
pub enum BackendError {
    /// API key rejected (HTTP 401/403). Never retried.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Too many requests (HTTP 429). Retryable after backoff.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Model is still loading on the backend (HTTP 503). Retryable.
    #[error("model warming up: {0}")]
    ModelWarming(String),

    /// The call exceeded the configured deadline. Treated like a warming
    /// backend: retryable.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection-level failure (DNS, refused, reset).
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// Any other non-success HTTP status. Message passed through as-is.
    #[error("backend returned {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Response arrived but could not be decoded into a summary.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Backend misconfiguration (bad endpoint, missing key where required).
    #[error("configuration error: {0}")]
    Config(String),
}

impl BackendError {
    /// Whether the driver should retry this failure after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::RateLimited(_)
                | BackendError::ModelWarming(_)
                | BackendError::Timeout(_)
                | BackendError::Unreachable(_)
        )
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout(Duration::from_secs(0))
        } else if err.is_connect() {
            BackendError::Unreachable(err.to_string())
        } else {
            BackendError::Unreachable(format!("request failed: {}", err))
        }
    }
}

/// Generation parameters sent with every backend call.
///
/// Field names match the seq2seq generation knobs of the underlying models;
/// the whole struct serializes directly into the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_length: usize,
    /// Lower bound on generated tokens
    pub min_length: usize,
    /// Whether to sample instead of greedy/beam-only decoding
    pub do_sample: bool,
    /// Sampling temperature
    pub temperature: f32,
    /// Beam count for beam search
    pub num_beams: u32,
    /// Length penalty applied during beam search
    pub length_penalty: f32,
    /// Penalty for repeated tokens
    pub repetition_penalty: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Window within which n-gram repetition is forbidden
    pub no_repeat_ngram_size: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 1024,
            min_length: 150,
            do_sample: true,
            temperature: 0.7,
            num_beams: 4,
            length_penalty: 2.0,
            repetition_penalty: 1.5,
            top_p: 0.95,
            no_repeat_ngram_size: 3,
        }
    }
}

/// The external summarization service, opaque to this crate.
///
/// One call takes a model identifier, the text to condense and the generation
/// parameters, and returns the summary text. Implementations decide transport;
/// the driver only relies on the error classification above.
#[async_trait]
pub trait SummarizationBackend: Send + Sync {
    /// Summarize `text` with the named model.
    async fn summarize(
        &self,
        model_id: &str,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError>;
}
