//! Worker Module
//!
//! The install / activate / fetch lifecycle of one cache version.
//!
//! # Handlers
//! - `install` - pre-caches the manifest into the current store
//! - `activate` - deletes stale stores and claims control
//! - `handle_fetch` - cache-first interception with background population
//!
//! `Registration` wires these together the way a hosting runtime would.

mod activate;
mod clients;
mod fetch;
mod install;
mod lifecycle;
mod registration;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStorage};
use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::network::Network;

pub use activate::{activate, ActivationReport};
pub use clients::Clients;
pub use fetch::{handle_fetch, FetchOutcome, FetchSource};
pub use install::install;
pub use lifecycle::WorkerState;
pub use registration::Registration;

// == Cache Worker ==
/// One deployed version of the worker and everything its handlers need.
pub struct CacheWorker {
    /// Version-specific configuration
    config: Config,
    /// Generation Identifier derived from `config`
    cache_name: String,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    stats: Arc<RwLock<CacheStats>>,
    state: RwLock<WorkerState>,
    skip_waiting: AtomicBool,
}

impl CacheWorker {
    /// Creates a worker in the `Parsed` state.
    pub fn new(
        config: Config,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
        stats: Arc<RwLock<CacheStats>>,
    ) -> Self {
        let cache_name = config.generation_id();
        Self {
            config,
            cache_name,
            storage,
            network,
            stats,
            state: RwLock::new(WorkerState::Parsed),
            skip_waiting: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The Generation Identifier this worker populates.
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    /// Requests activation without waiting for older versions to release
    /// their pages.
    pub fn skip_waiting(&self) {
        self.skip_waiting.store(true, Ordering::SeqCst);
    }

    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    pub(crate) async fn transition(&self, next: WorkerState) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.can_transition_to(next) {
            return Err(WorkerError::Internal(format!(
                "Worker '{}' cannot move from {} to {}",
                self.cache_name, *state, next
            )));
        }
        debug!("Worker '{}': {} -> {}", self.cache_name, *state, next);
        *state = next;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::cache::{CacheEntry, CachedResponse, MemoryCacheStorage};
    use crate::network::stub::StubNetwork;
    use crate::network::FetchRequest;
    use async_trait::async_trait;
    use url::Url;

    pub const ORIGIN: &str = "http://app.test/";

    pub fn config(version: u32) -> Config {
        Config {
            app_name: "app".to_string(),
            cache_version: version,
            origin: Url::parse(ORIGIN).unwrap(),
            ..Config::default()
        }
    }

    pub fn worker(
        version: u32,
        storage: Arc<MemoryCacheStorage>,
        network: Arc<StubNetwork>,
    ) -> Arc<CacheWorker> {
        Arc::new(CacheWorker::new(
            config(version),
            storage,
            network,
            Arc::new(RwLock::new(CacheStats::new())),
        ))
    }

    /// Memory storage whose deletion of one named store always fails.
    pub struct FailingDelete {
        inner: MemoryCacheStorage,
        broken: &'static str,
    }

    impl FailingDelete {
        pub fn new(broken: &'static str) -> Self {
            Self {
                inner: MemoryCacheStorage::new(),
                broken,
            }
        }
    }

    #[async_trait]
    impl CacheStorage for FailingDelete {
        async fn open(&self, name: &str) -> Result<bool> {
            self.inner.open(name).await
        }
        async fn lookup(&self, name: &str, request: &FetchRequest) -> Option<CachedResponse> {
            self.inner.lookup(name, request).await
        }
        async fn match_any(&self, request: &FetchRequest) -> Option<CachedResponse> {
            self.inner.match_any(request).await
        }
        async fn put(&self, name: &str, entry: CacheEntry) -> Result<()> {
            self.inner.put(name, entry).await
        }
        async fn put_existing(&self, name: &str, entry: CacheEntry) -> Result<bool> {
            self.inner.put_existing(name, entry).await
        }
        async fn put_all(&self, name: &str, entries: Vec<CacheEntry>) -> Result<()> {
            self.inner.put_all(name, entries).await
        }
        async fn keys(&self) -> Vec<String> {
            self.inner.keys().await
        }
        async fn delete(&self, name: &str) -> Result<bool> {
            if name == self.broken {
                return Err(WorkerError::Internal("disk error".to_string()));
            }
            self.inner.delete(name).await
        }
        async fn entry_count(&self, name: &str) -> Option<usize> {
            self.inner.entry_count(name).await
        }
    }
}
