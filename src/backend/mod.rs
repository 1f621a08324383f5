//! Backend integration: the HTTP inference client and the summary cache.

/// Bounded FIFO cache for finished summaries.
pub mod cache;

/// Hosted-inference HTTP implementation of the backend trait.
pub mod inference;

pub use cache::{CacheConfig, SummaryCache};
pub use inference::{HttpInferenceBackend, InferenceConfig};
