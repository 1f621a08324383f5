//! Core types shared across the summarization pipeline.

use serde::{Deserialize, Serialize};

use crate::processing::checkpoint::CompletenessReport;

/// Backend contract and generation parameters.
///
/// This module provides:
/// - The [`backend::SummarizationBackend`] trait the pipeline calls through
/// - [`backend::GenerationParams`] sent with every call
/// - [`backend::BackendError`] with retryable/fatal classification
pub mod backend;

/// Document model produced by classification.
pub mod document;

pub mod error;

// Re-exports
pub use backend::{BackendError, GenerationParams, SummarizationBackend};
pub use document::{Complexity, Document, DocumentType, LengthBucket, SourceKind};
pub use error::{Error, Result};

/// Final result of one summarization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// The summary text
    pub summary: String,
    /// Name of the model profile that produced it
    pub model_used: String,
    /// Summary length divided by source length
    pub compression_ratio: f32,
    /// Whether the completeness check passed. Advisory; a failing check does
    /// not block the summary from being returned.
    pub completeness_passed: bool,
    /// Per-category coverage ratios behind the pass/fail flag
    pub completeness: CompletenessReport,
    /// Top keywords extracted from the source text
    pub keywords: Vec<String>,
    /// Whether this result was served from the cache
    pub cached: bool,
}
