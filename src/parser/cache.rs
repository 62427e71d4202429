//! Parsed path cache
//!
//! Keyed by the exact raw path string (case-sensitive). Unbounded by default,
//! since path vocabularies are usually small and static; long-running
//! processes that see open-ended path text should configure a capacity,
//! which switches storage to an LRU.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use lru::LruCache;
use parking_lot::Mutex;

use super::segment::PathExpression;
use crate::config::PathCacheConfig;
use crate::error::Result;

/// Statistics about the path cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries currently cached
    pub entries: usize,
    /// Maximum number of entries, `None` when unbounded
    pub capacity: Option<usize>,
}

impl PathCacheStats {
    /// Cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            (self.hits as f64) / ((self.hits + self.misses) as f64) * 100.0
        }
    }
}

enum Store {
    Unbounded(DashMap<String, Arc<PathExpression>>),
    Bounded(Mutex<LruCache<String, Arc<PathExpression>>>),
}

/// Thread-safe cache of parsed paths
pub struct PathCache {
    store: Store,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PathCache {
    /// Unbounded cache
    pub fn new() -> Self {
        Self::with_config(&PathCacheConfig::default())
    }

    pub fn with_config(config: &PathCacheConfig) -> Self {
        let store = match config.capacity {
            Some(capacity) => Store::Bounded(Mutex::new(LruCache::new(capacity))),
            None => Store::Unbounded(DashMap::new()),
        };
        Self {
            store,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// LRU cache holding at most `capacity` paths
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self::with_config(&PathCacheConfig::bounded(capacity))
    }

    fn lookup(&self, raw: &str) -> Option<Arc<PathExpression>> {
        match &self.store {
            Store::Unbounded(map) => map.get(raw).map(|entry| Arc::clone(entry.value())),
            Store::Bounded(lru) => lru.lock().get(raw).cloned(),
        }
    }

    fn store(&self, raw: &str, expression: Arc<PathExpression>) {
        match &self.store {
            Store::Unbounded(map) => {
                map.insert(raw.to_string(), expression);
            }
            Store::Bounded(lru) => {
                if let Some((evicted, _)) = lru.lock().push(raw.to_string(), expression) {
                    if evicted != raw {
                        log::debug!("path cache evicted `{evicted}`");
                    }
                }
            }
        }
    }

    /// Return the cached expression for `raw`, parsing and caching it on a miss.
    ///
    /// Malformed paths are never cached; every attempt reports the error again.
    pub fn parse(&self, raw: &str) -> Result<Arc<PathExpression>> {
        if let Some(expression) = self.lookup(raw) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(expression);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let expression = Arc::new(super::parse_path(raw)?);
        log::debug!("path cache miss, caching `{raw}`");
        // Two threads missing on the same text both parse; the later insert wins
        // and both expressions are equal.
        self.store(raw, Arc::clone(&expression));
        Ok(expression)
    }

    pub fn contains(&self, raw: &str) -> bool {
        match &self.store {
            Store::Unbounded(map) => map.contains_key(raw),
            Store::Bounded(lru) => lru.lock().contains(raw),
        }
    }

    pub fn len(&self) -> usize {
        match &self.store {
            Store::Unbounded(map) => map.len(),
            Store::Bounded(lru) => lru.lock().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all cached entries and reset statistics
    pub fn clear(&self) {
        match &self.store {
            Store::Unbounded(map) => map.clear(),
            Store::Bounded(lru) => lru.lock().clear(),
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> PathCacheStats {
        let capacity = match &self.store {
            Store::Unbounded(_) => None,
            Store::Bounded(lru) => Some(lru.lock().cap().get()),
        };
        PathCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
            capacity,
        }
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PathCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathCache").field("stats", &self.stats()).finish()
    }
}
