use summarize_core::backend::cache::{CacheConfig, SummaryCache};
use summarize_core::processing::checkpoint::CompletenessReport;
use summarize_core::types::{SourceKind, SummaryOutput};

fn output(summary: &str) -> SummaryOutput {
    SummaryOutput {
        summary: summary.to_string(),
        model_used: "general".to_string(),
        compression_ratio: 0.3,
        completeness_passed: true,
        completeness: CompletenessReport {
            passed: true,
            key_point_coverage: 1.0,
            entity_coverage: 1.0,
            metric_coverage: 1.0,
            relationship_coverage: 1.0,
            context_coverage: 1.0,
        },
        keywords: Vec::new(),
        cached: false,
    }
}

#[tokio::test]
async fn hit_returns_stored_output() {
    let cache = SummaryCache::new(CacheConfig::default());
    let key = cache.fingerprint("some text", SourceKind::Text);

    assert!(cache.get(&key).await.is_none());
    cache.put(key.clone(), output("stored")).await;

    let hit = cache.get(&key).await.unwrap();
    assert_eq!(hit.summary, "stored");
}

#[tokio::test]
async fn fingerprint_distinguishes_source_kinds() {
    let cache = SummaryCache::new(CacheConfig::default());
    let text_key = cache.fingerprint("same words", SourceKind::Text);
    let url_key = cache.fingerprint("same words", SourceKind::Url);
    assert_ne!(text_key, url_key);
}

#[tokio::test]
async fn fingerprint_is_stable() {
    let cache = SummaryCache::new(CacheConfig::default());
    assert_eq!(
        cache.fingerprint("hello world", SourceKind::Upload),
        cache.fingerprint("hello world", SourceKind::Upload),
    );
}

#[tokio::test]
async fn oldest_entry_is_evicted_first() {
    let cache = SummaryCache::new(CacheConfig {
        max_entries: 2,
        ..Default::default()
    });

    cache.put("a".to_string(), output("first")).await;
    cache.put("b".to_string(), output("second")).await;
    cache.put("c".to_string(), output("third")).await;

    assert_eq!(cache.len().await, 2);
    assert!(cache.get("a").await.is_none());
    assert!(cache.get("b").await.is_some());
    assert!(cache.get("c").await.is_some());
}

#[tokio::test]
async fn disabled_cache_stores_nothing() {
    let cache = SummaryCache::new(CacheConfig {
        enabled: false,
        ..Default::default()
    });

    cache.put("k".to_string(), output("ignored")).await;
    assert!(cache.get("k").await.is_none());
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn reinserting_a_key_does_not_grow_the_queue() {
    let cache = SummaryCache::new(CacheConfig {
        max_entries: 2,
        ..Default::default()
    });

    cache.put("a".to_string(), output("v1")).await;
    cache.put("a".to_string(), output("v2")).await;
    cache.put("b".to_string(), output("b")).await;

    assert_eq!(cache.len().await, 2);
    assert_eq!(cache.get("a").await.unwrap().summary, "v2");
}
