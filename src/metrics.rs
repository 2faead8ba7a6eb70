use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    pub cache_hits: IntCounter,
    pub cache_misses: IntCounter,
    pub refilters: IntCounter,
    pub searches_applied: IntCounter,
    pub searches_superseded: IntCounter,
    pub page_changes: IntCounter,
    registry: Arc<Registry>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn counter(name: &str, help: &str) -> IntCounter {
    IntCounter::with_opts(Opts::new(name, help)).expect("counter options are static and valid")
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let cache_hits = counter("cache_hits", "Filter requests served from the result cache");
        let cache_misses = counter("cache_misses", "Filter requests computed from scratch");
        let refilters = counter(
            "refilters",
            "Search, category or snapshot changes that re-ran filtering",
        );
        let searches_applied = counter("searches_applied", "Debounced searches that fired");
        let searches_superseded = counter(
            "searches_superseded",
            "Debounced searches replaced before their delay elapsed",
        );
        let page_changes = counter("page_changes", "Page cursor moves");

        registry.register(Box::new(cache_hits.clone())).ok();
        registry.register(Box::new(cache_misses.clone())).ok();
        registry.register(Box::new(refilters.clone())).ok();
        registry.register(Box::new(searches_applied.clone())).ok();
        registry.register(Box::new(searches_superseded.clone())).ok();
        registry.register(Box::new(page_changes.clone())).ok();

        Metrics {
            cache_hits,
            cache_misses,
            refilters,
            searches_applied,
            searches_superseded,
            page_changes,
            registry: Arc::new(registry),
        }
    }

    pub fn gather(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
