//! Filtering engine and its result cache
pub mod cache;
pub mod engine;

pub use cache::{CacheKey, CacheStats, FeatureSet, ResultCache};
pub use engine::FilterEngine;
