//! Cache Statistics Module
//!
//! Tracks how requests were answered and what the interceptor stored.

use serde::Serialize;

// == Cache Stats ==
/// Tracks fetch interceptor metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Requests answered from a cache store
    pub hits: u64,
    /// Requests forwarded to the network after a cache miss
    pub misses: u64,
    /// Requests forwarded while no worker controlled the page
    pub bypassed: u64,
    /// Network failures seen by the interceptor
    pub network_errors: u64,
    /// Responses copied into a cache store
    pub stored: u64,
    /// Responses returned without being stored (not 200 or not same-origin)
    pub skipped: u64,
    /// Background writes that failed
    pub store_failures: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been intercepted.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_bypass(&mut self) {
        self.bypassed += 1;
    }

    pub fn record_network_error(&mut self) {
        self.network_errors += 1;
    }

    pub fn record_stored(&mut self) {
        self.stored += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_store_failure(&mut self) {
        self.store_failures += 1;
    }
}
