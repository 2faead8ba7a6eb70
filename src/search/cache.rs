//! Memoized filter results for one feature snapshot
use crate::model::{CategoryFilter, Feature};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Shared, immutable filtered set. Cloning is a pointer copy, so callers can
/// compare two results with `Arc::ptr_eq`.
pub type FeatureSet = Arc<[Feature]>;

/// Composite cache key. Kept as separate fields so that ("1", "23") and
/// ("12", "3") never share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub category: CategoryFilter,
    pub search_text: String,
}

impl CacheKey {
    pub fn new(category: CategoryFilter, search_text: impl Into<String>) -> Self {
        Self {
            category,
            search_text: search_text.into(),
        }
    }
}

/// Result cache. Unbounded unless a capacity is given, in which case the
/// least recently used combination is dropped first.
pub struct ResultCache {
    entries: LruCache<CacheKey, FeatureSet>,
    capacity: Option<NonZeroUsize>,
    hits: u64,
    misses: u64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    pub fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        let entries = match capacity {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            entries,
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<FeatureSet> {
        match self.entries.get(key) {
            Some(set) => {
                self.hits += 1;
                Some(Arc::clone(set))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, key: CacheKey, value: FeatureSet) {
        self.entries.put(key, value);
    }

    /// Drops every entry. Required whenever the feature snapshot changes.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity.map(NonZeroUsize::get),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: Option<usize>,
    pub hits: u64,
    pub misses: u64,
}
