//! Recursive summarization driver
//!
//! Orchestrates backend calls per chunk, merges partial summaries and
//! re-summarizes the merged text until it fits the target compression or the
//! depth limit is reached. All chunks of one level are dispatched
//! concurrently; results are joined in chunk order, never completion order.

use futures::future::{try_join_all, BoxFuture};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::processing::chunker::{chunk_document, ChunkerConfig};
use crate::processing::profiles::ModelProfile;
use crate::types::{BackendError, Document, Error, Result, SummarizationBackend};

/// Maximum re-summarization depth. Depth 0 summarizes source chunks, depth 1
/// summarizes merged partials, depth 2 forces a single direct call.
pub const MAX_RECURSION_DEPTH: usize = 2;

/// Retry policy for retryable backend failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per backend call, including the first
    pub max_attempts: u32,
    /// First backoff delay
    pub base_backoff: Duration,
    /// Backoff ceiling
    pub max_backoff: Duration,
    /// Upper bound of the random jitter added to each backoff
    pub jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            jitter: Duration::from_millis(250),
        }
    }
}

/// Configuration for the recursive driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Chunking parameters used at every recursion level
    pub chunker: ChunkerConfig,
    /// Summary-to-source ratio above which the driver retries with a
    /// stricter compression factor
    pub target_compression: f32,
    /// Maximum top-level attempts in the compression loop
    pub max_compression_attempts: u32,
    /// Multiplier applied to the compression factor on each retry
    pub compression_tighten: f32,
    /// Deadline for a single backend call
    pub request_timeout: Duration,
    /// Retry policy for retryable failures
    pub retry: RetryConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            chunker: ChunkerConfig::default(),
            target_compression: 0.4,
            max_compression_attempts: 2,
            compression_tighten: 0.75,
            request_timeout: Duration::from_secs(60),
            retry: RetryConfig::default(),
        }
    }
}

/// Result of one driver run.
#[derive(Debug, Clone)]
pub struct DriverOutput {
    /// The final summary text
    pub summary: String,
    /// Profile name that produced it
    pub model_used: String,
    /// Summary length divided by input length, in characters
    pub compression_ratio: f32,
}

/// Drives chunk-level backend calls and recursive merging.
pub struct RecursiveSummarizer<B> {
    backend: Arc<B>,
    config: DriverConfig,
}

impl<B: SummarizationBackend> RecursiveSummarizer<B> {
    /// Create a driver over the given backend.
    pub fn new(backend: Arc<B>, config: DriverConfig) -> Self {
        Self { backend, config }
    }

    /// Summarize `text` with the selected profile.
    ///
    /// Runs the full chunk/merge/recurse cycle, then checks the resulting
    /// compression ratio and retries with a tightened compression factor if
    /// the summary is still too close to the source length.
    pub async fn summarize(
        &self,
        text: &str,
        document: &Document,
        profile: &ModelProfile,
    ) -> Result<DriverOutput> {
        let source_chars = text.chars().count().max(1);
        let mut compression = profile.compression_factor;
        let mut attempt = 0u32;

        loop {
            let summary = self
                .summarize_level(text.to_string(), document, profile, 0, compression)
                .await?;
            let compression_ratio = summary.chars().count() as f32 / source_chars as f32;
            attempt += 1;

            if compression_ratio > self.config.target_compression
                && attempt < self.config.max_compression_attempts
            {
                compression *= self.config.compression_tighten;
                debug!(
                    compression_ratio,
                    compression, "summary above target ratio, tightening"
                );
                continue;
            }

            return Ok(DriverOutput {
                summary,
                model_used: profile.name.clone(),
                compression_ratio,
            });
        }
    }

    /// One recursion level: chunk, fan out, merge, recurse.
    ///
    /// Base case is a single chunk or the depth limit, which becomes one
    /// direct backend call with parameters scaled to the input length.
    fn summarize_level<'a>(
        &'a self,
        text: String,
        document: &'a Document,
        profile: &'a ModelProfile,
        depth: usize,
        compression: f32,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let chunks = chunk_document(&text, document, &self.config.chunker)?;

            if depth >= MAX_RECURSION_DEPTH || chunks.len() == 1 {
                let words = text.split_whitespace().count();
                let params = profile.scaled_params(words, compression);
                return self
                    .call_with_retry(&profile.backend_id, &text, &params)
                    .await;
            }

            debug!(depth, chunk_count = chunks.len(), "fanning out chunk calls");
            let calls = chunks.iter().map(|chunk| {
                let words = chunk.text.split_whitespace().count();
                let params = profile.scaled_params(words, compression);
                let backend_id = profile.backend_id.as_str();
                async move {
                    self.call_with_retry(backend_id, &chunk.text, &params)
                        .await
                }
            });

            // try_join_all preserves chunk order and aborts the whole level
            // on the first fatal chunk failure
            let partials = try_join_all(calls).await?;
            let merged = partials.join(" ");

            self.summarize_level(merged, document, profile, depth + 1, compression)
                .await
        })
    }

    /// One backend call under the timeout and retry policy.
    async fn call_with_retry(
        &self,
        model_id: &str,
        text: &str,
        params: &crate::types::GenerationParams,
    ) -> Result<String> {
        let mut attempt = 0u32;

        loop {
            let outcome = match timeout(
                self.config.request_timeout,
                self.backend.summarize(model_id, text, params),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout(self.config.request_timeout)),
            };

            match outcome {
                Ok(summary) => return Ok(summary),
                Err(err) if err.is_retryable() => {
                    attempt += 1;
                    if attempt >= self.config.retry.max_attempts {
                        return Err(Error::AllAttemptsFailed {
                            attempts: attempt,
                            source: err,
                        });
                    }
                    let delay = self.backoff_delay(attempt);
                    warn!(%err, attempt, ?delay, "retryable backend failure, backing off");
                    sleep(delay).await;
                }
                Err(err) => return Err(Error::Backend(err)),
            }
        }
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let retry = &self.config.retry;
        let exp = retry
            .base_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
            .min(retry.max_backoff);
        let jitter_ms = retry.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            exp
        } else {
            exp + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        }
    }
}
