//! Install handler: all-or-nothing manifest pre-caching.

use futures_util::future::try_join_all;
use tracing::{error, info, warn};

use super::{CacheWorker, WorkerState};
use crate::cache::CacheEntry;
use crate::error::{Result, WorkerError};
use crate::network::FetchRequest;

/// Runs the install sequence for `worker`.
///
/// 1. Opens (creating if absent) the store named by the Generation Identifier.
/// 2. Fetches every manifest entry. A network error or a non-success status
///    on any entry fails the whole install; responses are written in a
///    single batch only once every fetch succeeded.
/// 3. Requests skip-waiting so the version activates immediately.
///
/// On failure the worker becomes `Redundant`, and a store created by this
/// call is removed again.
pub async fn install(worker: &CacheWorker) -> Result<()> {
    info!("Installing worker '{}'", worker.cache_name());
    worker.transition(WorkerState::Installing).await?;

    let created = worker.storage.open(worker.cache_name()).await?;
    info!("Cache '{}' opened", worker.cache_name());

    let entries = match precache(worker).await {
        Ok(entries) => entries,
        Err(e) => {
            error!("Install of '{}' failed: {}", worker.cache_name(), e);
            if created {
                if let Err(delete_err) = worker.storage.delete(worker.cache_name()).await {
                    warn!(
                        "Failed to roll back cache '{}': {}",
                        worker.cache_name(),
                        delete_err
                    );
                }
            }
            worker.transition(WorkerState::Redundant).await?;
            return Err(e);
        }
    };

    let count = entries.len();
    worker.storage.put_all(worker.cache_name(), entries).await?;
    info!(
        "Manifest cached: {} resources in '{}'",
        count,
        worker.cache_name()
    );

    worker.skip_waiting();
    worker.transition(WorkerState::Installed).await
}

/// Fetches every manifest entry concurrently, failing on the first error.
async fn precache(worker: &CacheWorker) -> Result<Vec<CacheEntry>> {
    let requests = worker
        .config()
        .manifest
        .iter()
        .map(|path| worker.config().resolve(path).map(FetchRequest::get))
        .collect::<Result<Vec<_>>>()?;

    try_join_all(requests.iter().map(|request| async move {
        let response = worker
            .network
            .fetch(request)
            .await
            .map_err(|e| WorkerError::ManifestFetch {
                url: request.url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status.is_success() {
            return Err(WorkerError::ManifestFetch {
                url: request.url.to_string(),
                reason: format!("status {}", response.status),
            });
        }

        CacheEntry::from_exchange(request, &response)
    }))
    .await
}
