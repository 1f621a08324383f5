//! summarize-core - document analysis and recursive summarization pipeline
//!
//! This library takes raw text, classifies it, picks a summarization model
//! profile, chunks long inputs, drives the backend over the chunks and
//! validates the merged result. Transport to the actual neural models is
//! behind the [`types::SummarizationBackend`] trait; HTTP routing, file
//! handling and persistence live outside this crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Backend integration module.
///
/// Provides:
/// - The reqwest client for hosted inference endpoints
/// - The bounded summary cache
pub mod backend;

/// Document analysis module.
///
/// Provides:
/// - Normalization, classification and model selection
/// - Chunking strategies
/// - Keyword extraction and completeness validation
pub mod processing;

/// Recursive summarization driver.
pub mod summarize;

/// Common types, errors and the backend contract.
pub mod types;

/// Utility functions.
pub mod utils;

use backend::cache::{CacheConfig, SummaryCache};
use processing::checkpoint::{CompletenessValidator, ValidatorConfig};
use processing::classify::{ClassifierConfig, DocumentClassifier};
use processing::keywords::{KeywordConfig, KeywordExtractor};
use processing::normalize::Normalizer;
use processing::profiles::ProfileRegistry;
use summarize::{DriverConfig, RecursiveSummarizer};
use types::{Error, Result, SourceKind, SummarizationBackend, SummaryOutput};

/// Configuration for the whole pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Classifier thresholds
    pub classifier: ClassifierConfig,
    /// Driver, chunking and retry parameters
    pub driver: DriverConfig,
    /// Completeness validation parameters
    pub validator: ValidatorConfig,
    /// Keyword extraction parameters
    pub keywords: KeywordConfig,
    /// Summary cache parameters
    pub cache: CacheConfig,
}

/// The summarization pipeline.
///
/// Owns every stage and the backend handle; one instance serves concurrent
/// requests, since per-request state never escapes `produce_summary`.
pub struct SummaryPipeline<B> {
    normalizer: Normalizer,
    classifier: DocumentClassifier,
    registry: ProfileRegistry,
    driver: RecursiveSummarizer<B>,
    validator: CompletenessValidator,
    keywords: KeywordExtractor,
    cache: SummaryCache,
}

impl<B: SummarizationBackend> SummaryPipeline<B> {
    /// Create a pipeline with default configuration.
    pub fn with_backend(backend: Arc<B>) -> Result<Self> {
        Self::new(backend, PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn new(backend: Arc<B>, config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::new()?,
            classifier: DocumentClassifier::new(config.classifier)?,
            registry: ProfileRegistry::builtin(),
            driver: RecursiveSummarizer::new(backend, config.driver),
            validator: CompletenessValidator::new(config.validator)?,
            keywords: KeywordExtractor::new(config.keywords),
            cache: SummaryCache::new(config.cache),
        })
    }

    /// Summarize raw text end to end.
    ///
    /// Rejects empty or whitespace-only input before any classification or
    /// backend work. Returns the summary with the profile name, compression
    /// ratio and the advisory completeness report.
    pub async fn produce_summary(
        &self,
        raw_text: &str,
        source_kind: SourceKind,
    ) -> Result<SummaryOutput> {
        if raw_text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let light = self.normalizer.light(raw_text);
        let document = self.classifier.classify(&light, source_kind);
        let text = self.normalizer.content_aware(&light, &document);
        if text.is_empty() {
            // Everything was boilerplate
            return Err(Error::EmptyInput);
        }

        let key = self.cache.fingerprint(&text, source_kind);
        if let Some(mut hit) = self.cache.get(&key).await {
            info!(model = %hit.model_used, "serving cached summary");
            hit.cached = true;
            return Ok(hit);
        }

        let profile = self.registry.select(&document);
        let driven = self.driver.summarize(&text, &document, profile).await?;

        let source_checkpoint = self.validator.checkpoint(&text);
        let summary_checkpoint = self.validator.checkpoint(&driven.summary);
        let completeness = self
            .validator
            .validate(&source_checkpoint, &summary_checkpoint);

        // Keyword extraction is a best-effort enrichment
        let keywords = self.keywords.extract(&text).unwrap_or_default();

        let output = SummaryOutput {
            summary: driven.summary,
            model_used: driven.model_used,
            compression_ratio: driven.compression_ratio,
            completeness_passed: completeness.passed,
            completeness,
            keywords,
            cached: false,
        };

        self.cache.put(key, output.clone()).await;
        info!(
            model = %output.model_used,
            compression_ratio = output.compression_ratio,
            completeness_passed = output.completeness_passed,
            "produced summary"
        );

        Ok(output)
    }
}
