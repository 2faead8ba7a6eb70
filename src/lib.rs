pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod pagination;
pub mod search;

pub use crate::config::Config;
pub use crate::error::{FinderError, Result};
pub use controller::{BrowseEvent, BrowseOptions, FeatureSearchController, PageView};
pub use debounce::Debouncer;
pub use metrics::Metrics;
pub use model::{
    Category, CategoryFilter, CategoryId, CategoryLookup, Feature, FeatureId, Filters,
    ALL_CATEGORIES,
};
pub use search::{CacheKey, CacheStats, FeatureSet, FilterEngine, ResultCache};
