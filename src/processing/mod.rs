//! Document analysis for the summarization pipeline
//!
//! This module provides the stages that run before any backend call:
//! - Two-pass text normalization
//! - Signal-based document classification
//! - Model profile selection
//! - Section and sliding-window chunking
//! - Keyword extraction and completeness checkpoints

pub mod chunker;
pub mod classify;

/// Content checkpoints and coverage validation.
///
/// This module provides functionality for:
/// - Extracting key points, entities, relationships, metrics and context
/// - Comparing source and summary checkpoints into a coverage report
pub mod checkpoint;

/// Keyword and key-sentence extraction.
pub mod keywords;

/// Text normalization.
///
/// This module provides functionality for:
/// - Whitespace and newline collapsing
/// - Boilerplate footer removal
/// - Citation, math and code stripping keyed off classification
pub mod normalize;

/// Model profiles and routing.
pub mod profiles;

pub use checkpoint::{
    CompletenessReport, CompletenessValidator, ContentCheckpoint, ValidatorConfig,
};
pub use chunker::{chunk_document, Chunk, ChunkError, ChunkerConfig};
pub use classify::{ClassifierConfig, ClassifyError, DocumentClassifier};
pub use keywords::{DocumentStats, KeywordConfig, KeywordError, KeywordExtractor};
pub use normalize::{NormalizeError, Normalizer};
pub use profiles::{ModelProfile, ProfileRegistry};
