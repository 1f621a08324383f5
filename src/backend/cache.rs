use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::{SourceKind, SummaryOutput};
use crate::utils::hash_id;

/// Configuration for the summary cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled at all
    pub enabled: bool,
    /// Entry count at which the oldest entry is evicted
    pub max_entries: usize,
    /// How many leading characters of the text feed the fingerprint
    pub key_prefix_chars: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 128,
            key_prefix_chars: 256,
        }
    }
}

struct CacheInner {
    entries: HashMap<String, SummaryOutput>,
    order: VecDeque<String>,
}

/// Bounded in-memory cache of finished summaries.
///
/// Best effort only: a miss triggers recomputation and never fails the
/// request. Eviction is FIFO over insertion order. The cache is injected
/// into the pipeline rather than living in a global, so tests can control
/// eviction deterministically.
pub struct SummaryCache {
    inner: RwLock<CacheInner>,
    config: CacheConfig,
}

impl SummaryCache {
    /// Create a cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            config,
        }
    }

    /// Fingerprint for one request: text prefix, length and source kind.
    pub fn fingerprint(&self, text: &str, source_kind: SourceKind) -> String {
        let prefix: String = text.chars().take(self.config.key_prefix_chars).collect();
        hash_id(
            &format!("{}:{}:{}", source_kind.as_str(), text.chars().count(), prefix),
            "sum-",
        )
    }

    /// Look up a previously computed summary.
    pub async fn get(&self, key: &str) -> Option<SummaryOutput> {
        if !self.config.enabled {
            return None;
        }
        let inner = self.inner.read().await;
        inner.entries.get(key).cloned()
    }

    /// Store a computed summary, evicting the oldest entry past capacity.
    pub async fn put(&self, key: String, output: SummaryOutput) {
        if !self.config.enabled {
            return;
        }

        let mut inner = self.inner.write().await;
        if inner.entries.insert(key.clone(), output).is_none() {
            inner.order.push_back(key);
        }
        while inner.order.len() > self.config.max_entries {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
                debug!(%oldest, "evicted cache entry");
            }
        }
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
