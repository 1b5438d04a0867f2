//! Cache Module
//!
//! Named cache stores holding request/response pairs.

mod entry;
mod stats;
mod storage;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry, CachedResponse, RequestKey, VarySnapshot};
pub use stats::CacheStats;
pub use storage::{CacheStorage, MemoryCacheStorage};
pub use store::CacheStore;
