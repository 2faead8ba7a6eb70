//! Browse facade: filter state, derived page view and the scroll signal
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::{FinderError, Result};
use crate::metrics::Metrics;
use crate::model::{Category, CategoryId, CategoryLookup, Feature, Filters, ALL_CATEGORIES};
use crate::pagination;
use crate::search::{CacheStats, FeatureSet, FilterEngine};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Side-channel notifications for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseEvent {
    /// Sent once per completed search, category change or snapshot
    /// replacement. Page moves never send it.
    ScrollToTop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseOptions {
    pub page_size: usize,
    /// Page count the caller computed up front. Replaced by the first
    /// filtering pass.
    pub initial_last_page: usize,
    pub debounce: Duration,
    pub cache_capacity: Option<NonZeroUsize>,
}

impl BrowseOptions {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            initial_last_page: 1,
            debounce: Duration::from_millis(500),
            cache_capacity: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            page_size: config.browse.page_size,
            initial_last_page: 1,
            debounce: Duration::from_millis(config.browse.debounce_ms),
            cache_capacity: config.cache.max_entries.and_then(NonZeroUsize::new),
        })
    }

    pub fn initial_last_page(mut self, last_page: usize) -> Self {
        self.initial_last_page = last_page;
        self
    }

    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    pub fn cache_capacity(mut self, capacity: Option<NonZeroUsize>) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

/// What the presentation layer renders for the current filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub items: Vec<Feature>,
    pub total_count: usize,
    pub page: usize,
    pub last_page: usize,
    pub is_empty: bool,
}

impl PageView {
    fn build(results: &[Feature], page: usize, page_size: usize) -> Self {
        let items = pagination::slice(results, page, page_size).to_vec();
        Self {
            items,
            is_empty: results.is_empty(),
            total_count: results.len(),
            page,
            last_page: pagination::last_page(results.len(), page_size),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page
    }
}

/// Owns one feature snapshot and the browse state over it.
///
/// Category and page intents apply immediately. Search text goes through a
/// debouncer and only becomes visible once [`tick`](Self::tick),
/// [`settle`](Self::settle) or [`flush_search`](Self::flush_search) releases
/// it; a pending search is not cancelled by category or page moves and
/// resets the page to 1 when it lands.
pub struct FeatureSearchController {
    features: Arc<[Feature]>,
    categories: Vec<Category>,
    category_lookup: CategoryLookup,
    filters: Filters,
    engine: FilterEngine,
    debouncer: Debouncer<String>,
    results: FeatureSet,
    view: PageView,
    subscribers: Vec<Sender<BrowseEvent>>,
    metrics: Arc<Metrics>,
}

impl FeatureSearchController {
    pub fn new(
        features: Vec<Feature>,
        categories: Vec<Category>,
        category_lookup: CategoryLookup,
        options: BrowseOptions,
    ) -> Result<Self> {
        Self::with_metrics(
            features,
            categories,
            category_lookup,
            options,
            Arc::new(Metrics::new()),
        )
    }

    pub fn with_metrics(
        features: Vec<Feature>,
        categories: Vec<Category>,
        category_lookup: CategoryLookup,
        options: BrowseOptions,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        if options.page_size == 0 {
            return Err(FinderError::InvalidPageSize(options.page_size));
        }

        let features: Arc<[Feature]> = features.into();
        let filters = Filters::new(options.page_size);
        let mut engine = FilterEngine::new(Arc::clone(&metrics), options.cache_capacity);
        let results = engine.apply(&features, &filters.category_filter(), filters.search_text());
        let view = PageView::build(&results, filters.page(), options.page_size);

        if view.last_page != options.initial_last_page {
            debug!(
                "Initial last page {} replaced by computed {}",
                options.initial_last_page, view.last_page
            );
        }

        Ok(Self {
            features,
            categories,
            category_lookup,
            filters,
            engine,
            debouncer: Debouncer::new(options.debounce),
            results,
            view,
            subscribers: Vec::new(),
            metrics,
        })
    }

    /// Schedules a search for `query`; see [`set_search_at`](Self::set_search_at).
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.set_search_at(query, Instant::now());
    }

    pub fn set_search_at(&mut self, query: impl Into<String>, now: Instant) {
        if self.debouncer.schedule(query.into(), now).is_some() {
            self.metrics.searches_superseded.inc();
        }
    }

    /// Applies the pending search if its delay has elapsed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.apply_search(query);
                true
            }
            None => false,
        }
    }

    /// Waits for the pending search to come due and applies it.
    ///
    /// Must be awaited inside a tokio runtime with the time driver enabled.
    pub async fn settle(&mut self) -> bool {
        match self.debouncer.wait_due().await {
            Some(query) => {
                self.apply_search(query);
                true
            }
            None => false,
        }
    }

    /// Applies the pending search now, skipping the rest of the delay.
    pub fn flush_search(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(query) => {
                self.apply_search(query);
                true
            }
            None => false,
        }
    }

    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn pending_search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.filters = self.filters.with_category(category);
        debug!("Category set to {:?}", self.filters.category());
        self.refilter();
    }

    /// Drops the category filter. Same as `set_category(ALL_CATEGORIES)`.
    pub fn clear_category(&mut self) {
        self.set_category(ALL_CATEGORIES);
    }

    /// Moves to `page`, clamped into `1..=last_page`. Reuses the current
    /// filtered set.
    pub fn set_page(&mut self, page: usize) {
        let page = pagination::clamp_page(page, self.view.last_page);
        self.filters = self.filters.with_page(page);
        self.metrics.page_changes.inc();
        self.view = PageView::build(&self.results, page, self.filters.page_size());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.filters.page().saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.filters.page().saturating_sub(1));
    }

    /// Swaps in a new snapshot. Every cached result belongs to the old
    /// snapshot and is dropped.
    pub fn replace_features(&mut self, features: Vec<Feature>) {
        info!(
            "Replacing feature snapshot ({} -> {} features); discarding result cache",
            self.features.len(),
            features.len()
        );
        self.features = features.into();
        self.engine.reset();
        self.refilter();
    }

    pub fn current_page(&self) -> &PageView {
        &self.view
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// The full filtered set behind the current page.
    pub fn results(&self) -> &FeatureSet {
        &self.results
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.category_lookup.name(id)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.engine.cache_stats()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn subscribe(&mut self) -> Receiver<BrowseEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn apply_search(&mut self, query: String) {
        self.filters = self.filters.with_search(query);
        self.metrics.searches_applied.inc();
        debug!("Search set to {:?}", self.filters.search_text());
        self.refilter();
    }

    fn refilter(&mut self) {
        self.results = self.engine.apply(
            &self.features,
            &self.filters.category_filter(),
            self.filters.search_text(),
        );
        self.metrics.refilters.inc();

        let last_page = pagination::last_page(self.results.len(), self.filters.page_size());
        let page = pagination::clamp_page(self.filters.page(), last_page);
        if page != self.filters.page() {
            self.filters = self.filters.with_page(page);
        }
        self.view = PageView::build(&self.results, page, self.filters.page_size());
        self.emit(BrowseEvent::ScrollToTop);
    }

    fn emit(&mut self, event: BrowseEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(page_size: usize) -> FeatureSearchController {
        let categories = vec![Category::new(1, "Core"), Category::new(2, "Extras")];
        let lookup = CategoryLookup::from_categories(&categories);
        let features = (1..=7)
            .map(|i| Feature::new(i, format!("Feature {i}"), 1 + i % 2, vec![]))
            .collect();
        FeatureSearchController::new(features, categories, lookup, BrowseOptions::new(page_size))
            .unwrap()
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = FeatureSearchController::new(
            vec![],
            vec![],
            CategoryLookup::default(),
            BrowseOptions::new(0),
        );
        assert!(matches!(result, Err(FinderError::InvalidPageSize(0))));
    }

    #[test]
    fn test_page_navigation_clamps() {
        let mut controller = controller(3);
        assert_eq!(controller.current_page().last_page, 3);

        controller.previous_page();
        assert_eq!(controller.current_page().page, 1);

        controller.set_page(99);
        assert_eq!(controller.current_page().page, 3);
        assert_eq!(controller.current_page().items.len(), 1);
        assert_eq!(controller.filters().offset(), 6);
        assert!(!controller.current_page().has_next());

        controller.set_page(0);
        assert_eq!(controller.current_page().page, 1);
        assert!(controller.current_page().has_next());
    }

    #[test]
    fn test_page_moves_do_not_refilter() {
        let mut controller = controller(2);
        let before = controller.cache_stats();
        controller.next_page();
        controller.next_page();
        assert_eq!(controller.cache_stats(), before);
        assert_eq!(controller.current_page().page, 3);
    }

    #[test]
    fn test_replace_features_discards_cache() {
        let mut controller = controller(10);
        let old = Arc::clone(controller.results());
        controller.set_page(1);
        controller.replace_features(vec![Feature::new(42, "Only", 1, vec![])]);

        assert!(!Arc::ptr_eq(&old, controller.results()));
        assert_eq!(controller.current_page().total_count, 1);
        assert_eq!(controller.cache_stats().entries, 1);
    }

    #[test]
    fn test_replace_features_clamps_page() {
        let mut controller = controller(2);
        controller.set_page(4);
        controller.replace_features(vec![Feature::new(1, "Solo", 1, vec![])]);
        assert_eq!(controller.current_page().page, 1);
        assert_eq!(controller.filters().offset(), 0);
    }

    #[test]
    fn test_initial_last_page_is_only_a_hint() {
        let features = (1..=5)
            .map(|i| Feature::new(i, format!("F{i}"), 1, vec![]))
            .collect();
        let options = BrowseOptions::new(2).initial_last_page(99);
        let controller =
            FeatureSearchController::new(features, vec![], CategoryLookup::default(), options)
                .unwrap();

        assert_eq!(controller.current_page().last_page, 3);
        assert_eq!(controller.current_page().page, 1);
    }

    #[test]
    fn test_blank_category_matches_nothing() {
        let mut controller = controller(3);
        for raw in ["", "   ", "\t"] {
            controller.set_category(raw);
            let view = controller.current_page();
            assert!(view.is_empty, "category {raw:?}");
            assert_eq!(view.total_count, 0);
            assert_eq!(view.last_page, 1);
        }

        controller.clear_category();
        assert_eq!(controller.filters().category(), ALL_CATEGORIES);
        assert_eq!(controller.current_page().total_count, 7);
    }

    #[test]
    fn test_category_name_lookup() {
        let controller = controller(5);
        assert_eq!(controller.category_name(CategoryId(2)), Some("Extras"));
        assert_eq!(controller.categories().len(), 2);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.browse.page_size = 3;
        config.browse.debounce_ms = 250;
        config.cache.max_entries = Some(8);

        let options = BrowseOptions::from_config(&config).unwrap();
        assert_eq!(options.page_size, 3);
        assert_eq!(options.debounce, Duration::from_millis(250));
        assert_eq!(options.cache_capacity, NonZeroUsize::new(8));
    }
}
