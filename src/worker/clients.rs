//! Controlled clients: which worker version answers page requests.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::{CacheWorker, WorkerState};

/// Tracks the worker currently controlling the proxied pages.
#[derive(Default)]
pub struct Clients {
    controller: RwLock<Option<Arc<CacheWorker>>>,
}

impl Clients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `worker` the controller of every open page immediately.
    ///
    /// The worker it replaces, if any, becomes redundant.
    pub async fn claim(&self, worker: Arc<CacheWorker>) {
        let previous = self.controller.write().await.replace(worker.clone());
        info!("Worker '{}' now controls all clients", worker.cache_name());

        if let Some(previous) = previous {
            if !Arc::ptr_eq(&previous, &worker) {
                let _ = previous.transition(WorkerState::Redundant).await;
            }
        }
    }

    /// Returns the controlling worker, if one has claimed the pages.
    pub async fn controller(&self) -> Option<Arc<CacheWorker>> {
        self.controller.read().await.clone()
    }
}
