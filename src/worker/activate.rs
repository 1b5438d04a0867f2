//! Activate handler: stale-store eviction and client claim.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::{CacheWorker, Clients, WorkerState};
use crate::error::{Result, WorkerError};

/// What activation did to the cache namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivationReport {
    /// Stale stores that were removed
    pub deleted: Vec<String>,
    /// Stale stores whose deletion failed; left in place
    pub failed: Vec<String>,
}

/// Runs the activate sequence for `worker`.
///
/// Every store whose name differs from the worker's Generation Identifier is
/// deleted. Deletions run concurrently and independently: one failing is
/// logged and reported but does not stop the others. Once all of them have
/// settled the worker claims every client.
pub async fn activate(worker: &Arc<CacheWorker>, clients: &Clients) -> Result<ActivationReport> {
    info!("Activating worker '{}'", worker.cache_name());
    worker.transition(WorkerState::Activating).await?;

    let stale: Vec<String> = worker
        .storage
        .keys()
        .await
        .into_iter()
        .filter(|name| name != worker.cache_name())
        .collect();

    let outcomes = join_all(stale.into_iter().map(|name| async move {
        info!("Deleting stale cache '{}'", name);
        let outcome = match worker.storage.delete(&name).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Could not delete stale cache '{}': {}", name, e);
                Err(WorkerError::StoreDeletion(name.clone()))
            }
        };
        (name, outcome)
    }))
    .await;

    let mut report = ActivationReport::default();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(()) => report.deleted.push(name),
            Err(_) => report.failed.push(name),
        }
    }

    clients.claim(worker.clone()).await;
    worker.transition(WorkerState::Activated).await?;

    info!(
        "Worker '{}' activated: {} stale caches deleted, {} failed",
        worker.cache_name(),
        report.deleted.len(),
        report.failed.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStorage, MemoryCacheStorage};
    use crate::network::stub::StubNetwork;
    use crate::worker::test_support::*;

    async fn installed_state(w: &CacheWorker) {
        w.transition(WorkerState::Installing).await.unwrap();
        w.transition(WorkerState::Installed).await.unwrap();
    }

    #[tokio::test]
    async fn test_activate_deletes_every_other_generation() {
        let storage = Arc::new(MemoryCacheStorage::new());
        for name in ["app-cache-v1", "app-cache-v2", "other-cache-v7"] {
            storage.open(name).await.unwrap();
        }
        let w = worker(2, storage.clone(), Arc::new(StubNetwork::new()));
        installed_state(&w).await;
        let clients = Clients::new();

        let report = activate(&w, &clients).await.unwrap();

        assert_eq!(storage.keys().await, vec!["app-cache-v2"]);
        let mut deleted = report.deleted.clone();
        deleted.sort();
        assert_eq!(deleted, vec!["app-cache-v1", "other-cache-v7"]);
        assert!(report.failed.is_empty());
        assert_eq!(w.state().await, WorkerState::Activated);
        assert_eq!(
            clients.controller().await.unwrap().cache_name(),
            "app-cache-v2"
        );
    }

    #[tokio::test]
    async fn test_activate_without_current_store_leaves_none() {
        let storage = Arc::new(MemoryCacheStorage::new());
        storage.open("app-cache-v1").await.unwrap();
        let w = worker(2, storage.clone(), Arc::new(StubNetwork::new()));
        installed_state(&w).await;

        activate(&w, &Clients::new()).await.unwrap();

        assert!(storage.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_deletion_failure_does_not_abort_cleanup() {
        let storage = Arc::new(FailingDelete::new("app-cache-v1"));
        for name in ["app-cache-v1", "app-cache-v2", "app-cache-v3"] {
            storage.open(name).await.unwrap();
        }
        let w = Arc::new(CacheWorker::new(
            config(3),
            storage.clone(),
            Arc::new(StubNetwork::new()),
            Default::default(),
        ));
        installed_state(&w).await;
        let clients = Clients::new();

        let report = activate(&w, &clients).await.unwrap();

        assert_eq!(report.deleted, vec!["app-cache-v2"]);
        assert_eq!(report.failed, vec!["app-cache-v1"]);
        assert_eq!(storage.keys().await, vec!["app-cache-v1", "app-cache-v3"]);
        assert!(clients.controller().await.is_some());
    }

    #[tokio::test]
    async fn test_activate_requires_install() {
        let w = worker(1, Arc::new(MemoryCacheStorage::new()), Arc::new(StubNetwork::new()));
        let clients = Clients::new();

        assert!(activate(&w, &clients).await.is_err());
        assert!(clients.controller().await.is_none());
    }
}
