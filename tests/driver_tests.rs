use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use summarize_core::processing::chunker::{chunk_document, ChunkerConfig};
use summarize_core::processing::profiles::ProfileRegistry;
use summarize_core::summarize::{DriverConfig, RecursiveSummarizer, RetryConfig};
use summarize_core::types::{
    BackendError, Complexity, Document, DocumentType, Error, GenerationParams, LengthBucket,
    SourceKind, SummarizationBackend,
};

/// Backend that pops scripted failures before succeeding, recording inputs.
struct ScriptedBackend {
    calls: AtomicU32,
    failures: Mutex<VecDeque<BackendError>>,
    inputs: Mutex<Vec<String>>,
    /// How the fake summary is produced from the input
    echo: bool,
}

impl ScriptedBackend {
    fn succeeding() -> Self {
        Self::with_failures(vec![])
    }

    fn with_failures(failures: Vec<BackendError>) -> Self {
        Self {
            calls: AtomicU32::new(0),
            failures: Mutex::new(failures.into()),
            inputs: Mutex::new(Vec::new()),
            echo: false,
        }
    }

    fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::succeeding()
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummarizationBackend for ScriptedBackend {
    async fn summarize(
        &self,
        _model_id: &str,
        text: &str,
        _params: &GenerationParams,
    ) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        if self.echo {
            Ok(text.to_string())
        } else {
            // A short fixed-prefix "summary" keeps ratios under the target
            Ok(text.split_whitespace().take(2).collect::<Vec<_>>().join(" "))
        }
    }
}

fn doc(doc_type: DocumentType) -> Document {
    Document {
        cleaned_text: String::new(),
        raw_len: 0,
        doc_type,
        complexity: Complexity::Low,
        length: LengthBucket::Short,
        has_equations: false,
        has_citations: false,
        has_code: false,
        source_kind: SourceKind::Text,
    }
}

fn fast_config() -> DriverConfig {
    DriverConfig {
        retry: RetryConfig {
            max_attempts: 3,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
            jitter: Duration::ZERO,
        },
        ..Default::default()
    }
}

fn profile_registry() -> ProfileRegistry {
    ProfileRegistry::builtin()
}

#[tokio::test]
async fn short_input_makes_exactly_one_call() {
    let backend = Arc::new(ScriptedBackend::succeeding());
    let driver = RecursiveSummarizer::new(backend.clone(), fast_config());
    let registry = profile_registry();
    let d = doc(DocumentType::General);

    let text = "A fifty character input, give or take a couple.";
    let out = driver
        .summarize(text, &d, registry.select(&d))
        .await
        .unwrap();

    assert_eq!(backend.call_count(), 1);
    assert_eq!(out.model_used, "general");
    assert!(out.compression_ratio < 1.0);
}

#[tokio::test]
async fn rate_limit_is_retried_not_fatal() {
    let backend = Arc::new(ScriptedBackend::with_failures(vec![
        BackendError::RateLimited("429".to_string()),
    ]));
    let driver = RecursiveSummarizer::new(backend.clone(), fast_config());
    let registry = profile_registry();
    let d = doc(DocumentType::General);

    let result = driver
        .summarize("Retry me after a backoff please.", &d, registry.select(&d))
        .await;

    assert!(result.is_ok());
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn auth_failure_is_fatal_immediately() {
    let backend = Arc::new(ScriptedBackend::with_failures(vec![BackendError::Auth(
        "bad key".to_string(),
    )]));
    let driver = RecursiveSummarizer::new(backend.clone(), fast_config());
    let registry = profile_registry();
    let d = doc(DocumentType::General);

    let result = driver
        .summarize("Should not be retried.", &d, registry.select(&d))
        .await;

    assert!(matches!(result, Err(Error::Backend(BackendError::Auth(_)))));
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn exhausted_retries_surface_last_cause() {
    let backend = Arc::new(ScriptedBackend::with_failures(vec![
        BackendError::ModelWarming("warming".to_string()),
        BackendError::ModelWarming("warming".to_string()),
        BackendError::RateLimited("still limited".to_string()),
    ]));
    let driver = RecursiveSummarizer::new(backend.clone(), fast_config());
    let registry = profile_registry();
    let d = doc(DocumentType::General);

    let result = driver
        .summarize("Never succeeds.", &d, registry.select(&d))
        .await;

    match result {
        Err(Error::AllAttemptsFailed { attempts, source }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(source, BackendError::RateLimited(_)));
        }
        other => panic!("expected AllAttemptsFailed, got {other:?}"),
    }
    assert_eq!(backend.call_count(), 3);
}

#[tokio::test]
async fn multi_chunk_input_fans_out_then_merges_in_order() {
    let chunker = ChunkerConfig {
        chunk_size: 120,
        overlap_size: 20,
        ..Default::default()
    };
    let config = DriverConfig {
        chunker: chunker.clone(),
        // Keep the compression loop out of this test
        target_compression: 10.0,
        ..fast_config()
    };

    let backend = Arc::new(ScriptedBackend::succeeding());
    let driver = RecursiveSummarizer::new(backend.clone(), config);
    let registry = profile_registry();
    let d = doc(DocumentType::General);

    let text = (0..12)
        .map(|i| format!("Chunky sentence number {i} carries unique words."))
        .collect::<Vec<_>>()
        .join(" ");
    driver
        .summarize(&text, &d, registry.select(&d))
        .await
        .unwrap();

    let chunks = chunk_document(&text, &d, &chunker).unwrap();
    assert!(chunks.len() > 1);
    assert!(backend.call_count() as usize > chunks.len());

    // The recursion input is the chunk partials joined in sequence order
    let expected_merge = chunks
        .iter()
        .map(|c| c.text.split_whitespace().take(2).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(" ");
    let inputs = backend.inputs.lock().unwrap();
    assert!(
        inputs.contains(&expected_merge),
        "merged input not found in backend calls"
    );
}

#[tokio::test]
async fn recursion_stops_at_depth_limit() {
    let config = DriverConfig {
        chunker: ChunkerConfig {
            chunk_size: 60,
            overlap_size: 10,
            ..Default::default()
        },
        // An echoing backend never shrinks the text, so only the depth
        // limit can end the recursion
        target_compression: 100.0,
        ..fast_config()
    };

    let backend = Arc::new(ScriptedBackend::echoing());
    let driver = RecursiveSummarizer::new(backend.clone(), config);
    let registry = profile_registry();
    let d = doc(DocumentType::General);

    let text = "Unshrinkable words keep flowing. ".repeat(20);
    let result = driver.summarize(&text, &d, registry.select(&d)).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn oversized_summary_triggers_one_tightened_retry() {
    let backend = Arc::new(ScriptedBackend::echoing());
    let driver = RecursiveSummarizer::new(backend.clone(), fast_config());
    let registry = profile_registry();
    let d = doc(DocumentType::General);

    // Single chunk, echo backend: ratio stays 1.0, above the 0.4 target
    let out = driver
        .summarize("Echoed back without any shrinking.", &d, registry.select(&d))
        .await
        .unwrap();

    assert_eq!(backend.call_count(), 2);
    assert!(out.compression_ratio >= 1.0);
}

#[tokio::test]
async fn timeout_is_retryable() {
    struct SlowBackend;

    #[async_trait]
    impl SummarizationBackend for SlowBackend {
        async fn summarize(
            &self,
            _model_id: &str,
            _text: &str,
            _params: &GenerationParams,
        ) -> Result<String, BackendError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok("too late".to_string())
        }
    }

    let config = DriverConfig {
        request_timeout: Duration::from_millis(10),
        retry: RetryConfig {
            max_attempts: 2,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            jitter: Duration::ZERO,
        },
        ..Default::default()
    };
    let driver = RecursiveSummarizer::new(Arc::new(SlowBackend), config);
    let registry = profile_registry();
    let d = doc(DocumentType::General);

    let result = driver
        .summarize("Will time out.", &d, registry.select(&d))
        .await;

    match result {
        Err(Error::AllAttemptsFailed { attempts, source }) => {
            assert_eq!(attempts, 2);
            assert!(matches!(source, BackendError::Timeout(_)));
        }
        other => panic!("expected AllAttemptsFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn chunk_failure_aborts_the_whole_job() {
    let chunker = ChunkerConfig {
        chunk_size: 80,
        overlap_size: 10,
        ..Default::default()
    };
    let config = DriverConfig {
        chunker,
        target_compression: 10.0,
        ..fast_config()
    };

    // First chunk call fails fatally; no partial summary may survive
    let backend = Arc::new(ScriptedBackend::with_failures(vec![BackendError::Http {
        status: 500,
        message: "boom".to_string(),
    }]));
    let driver = RecursiveSummarizer::new(backend.clone(), config);
    let registry = profile_registry();
    let d = doc(DocumentType::General);

    let text = "A long enough text to split. ".repeat(10);
    let result = driver.summarize(&text, &d, registry.select(&d)).await;

    assert!(matches!(
        result,
        Err(Error::Backend(BackendError::Http { status: 500, .. }))
    ));
}
