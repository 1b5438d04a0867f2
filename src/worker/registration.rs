//! Registration: the runtime side of the lifecycle.
//!
//! Owns the shared cache storage, network and stats, runs Install then
//! Activate for each new version, and routes page requests to whichever
//! worker controls them.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::{activate, handle_fetch, install, CacheWorker, Clients, FetchOutcome, FetchSource};
use crate::cache::{CacheStats, CacheStorage};
use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::network::{FetchRequest, Network};

/// A registered scope and its worker versions.
pub struct Registration {
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    stats: Arc<RwLock<CacheStats>>,
    clients: Clients,
    /// Serializes version updates
    update_lock: Mutex<()>,
}

impl Registration {
    pub fn new(storage: Arc<dyn CacheStorage>, network: Arc<dyn Network>) -> Self {
        Self {
            storage,
            network,
            stats: Arc::new(RwLock::new(CacheStats::new())),
            clients: Clients::new(),
            update_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    /// The worker controlling pages right now, if any.
    pub async fn active(&self) -> Option<Arc<CacheWorker>> {
        self.clients.controller().await
    }

    /// Registers a worker version built from `config`.
    ///
    /// Runs Install; if it fails the error is returned and the previously
    /// active version, if any, keeps control. Install requests skip-waiting,
    /// so a successful install is followed by Activate right away.
    /// Registering the version that is already active is rejected.
    pub async fn register(&self, config: Config) -> Result<Arc<CacheWorker>> {
        let _guard = self.update_lock.lock().await;

        if let Some(active) = self.clients.controller().await {
            if active.cache_name() == config.generation_id() {
                return Err(WorkerError::InvalidRequest(format!(
                    "Version {} is already active",
                    config.cache_version
                )));
            }
        }

        let worker = Arc::new(CacheWorker::new(
            config,
            self.storage.clone(),
            self.network.clone(),
            self.stats.clone(),
        ));

        if let Err(e) = install(&worker).await {
            match self.clients.controller().await {
                Some(active) => warn!(
                    "Discarding '{}', '{}' stays active",
                    worker.cache_name(),
                    active.cache_name()
                ),
                None => warn!("Discarding '{}', no active worker", worker.cache_name()),
            }
            return Err(e);
        }

        if worker.skip_waiting_requested() {
            debug!("'{}' skipped waiting", worker.cache_name());
        }

        let report = activate(&worker, &self.clients).await?;
        if !report.failed.is_empty() {
            warn!("Stale caches left behind: {:?}", report.failed);
        }

        info!("Worker '{}' registered", worker.cache_name());
        Ok(worker)
    }

    /// Routes a page request through the controlling worker, or straight
    /// to the network while no worker controls the page.
    pub async fn handle_fetch(&self, request: FetchRequest) -> Result<FetchOutcome> {
        match self.clients.controller().await {
            Some(worker) => handle_fetch(&worker, request).await,
            None => {
                debug!("Uncontrolled request, passing through: {}", request.url);
                self.stats.write().await.record_bypass();
                let response = self.network.fetch(&request).await?;
                Ok(FetchOutcome::new(response, FetchSource::Bypass))
            }
        }
    }
}
