//! Tag-based cache invalidation for rendered blocks.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

/// Cache tag for one block identity.
pub fn block_tag(id: &str) -> String {
    format!("cms.block.{}", id)
}

/// Tag-addressed cache eviction.
///
/// `invalidate` is idempotent and fire-and-forget: implementations log
/// failures instead of surfacing them, and the caller accepts the
/// resulting staleness window.
pub trait TagCache: Send + Sync {
    fn invalidate(&self, tag: &str);
}

/// In-memory tag cache backed by `Arc<RwLock<HashMap>>`.
///
/// Holds one cached value per tag and records every invalidation, so
/// tests can observe which tags were evicted and in what order.
#[derive(Clone)]
pub struct InMemoryTagCache {
    entries: Arc<RwLock<HashMap<String, Value>>>,
    invalidated: Arc<RwLock<Vec<String>>>,
}

impl Default for InMemoryTagCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTagCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            invalidated: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Cache a value under a tag.
    pub fn put(&self, tag: &str, value: Value) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(tag.to_string(), value);
        }
    }

    /// The cached value for a tag, if still present.
    pub fn get(&self, tag: &str) -> Option<Value> {
        self.entries.read().ok().and_then(|e| e.get(tag).cloned())
    }

    /// Every tag passed to `invalidate`, in call order.
    pub fn invalidations(&self) -> Vec<String> {
        self.invalidated.read().map(|log| log.clone()).unwrap_or_default()
    }
}

impl TagCache for InMemoryTagCache {
    fn invalidate(&self, tag: &str) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.remove(tag);
            }
            Err(_) => {
                tracing::warn!(tag, "cache invalidation skipped: lock poisoned");
                return;
            }
        }
        if let Ok(mut log) = self.invalidated.write() {
            log.push(tag.to_string());
        }
        tracing::trace!(tag, "cache tag invalidated");
    }
}
