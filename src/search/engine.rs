//! Category and text filtering with memoization
use crate::metrics::Metrics;
use crate::model::{CategoryFilter, Feature};
use crate::search::cache::{CacheKey, CacheStats, FeatureSet, ResultCache};
use log::{debug, warn};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Applies the category and text predicates to a feature snapshot,
/// memoizing each (category, search text) combination.
pub struct FilterEngine {
    metrics: Arc<Metrics>,
    cache: ResultCache,
}

impl FilterEngine {
    pub fn new(metrics: Arc<Metrics>, cache_capacity: Option<NonZeroUsize>) -> Self {
        Self {
            metrics,
            cache: ResultCache::with_capacity(cache_capacity),
        }
    }

    /// Returns the features admitted by `category` and `search_text`, in
    /// snapshot order. A repeated combination returns the cached `Arc`.
    pub fn apply(
        &mut self,
        features: &[Feature],
        category: &CategoryFilter,
        search_text: &str,
    ) -> FeatureSet {
        let key = CacheKey::new(category.clone(), search_text);
        if let Some(cached) = self.cache.get(&key) {
            self.metrics.cache_hits.inc();
            debug!(
                "Cache hit for category={:?} search={:?} ({} results)",
                category,
                search_text,
                cached.len()
            );
            return cached;
        }
        self.metrics.cache_misses.inc();

        if let CategoryFilter::Invalid(raw) = category {
            warn!("Unparsable category {raw:?}; treating as no matches");
        }

        let needle = search_text.to_lowercase();
        let results: FeatureSet = features
            .iter()
            .filter(|feature| category.admits(feature))
            .filter(|feature| needle.is_empty() || feature.matches_text(&needle))
            .cloned()
            .collect();

        debug!(
            "Filtered {} features to {} for category={:?} search={:?}",
            features.len(),
            results.len(),
            category,
            search_text
        );
        self.cache.put(key, Arc::clone(&results));
        results
    }

    /// Discards every memoized result. Call when the snapshot is replaced.
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
