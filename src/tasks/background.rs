//! Background Cache Writes
//!
//! Detached tasks that copy a network response into a cache store after the
//! caller already has its response.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, CacheStorage};
use crate::network::{FetchRequest, NetworkResponse};

/// Spawns a task that stores `response` under `request` in `cache_name`.
///
/// The caller is never made to wait on this write. Failures are logged and
/// counted, never surfaced. A store deleted while the response was in flight
/// stays deleted; the write is dropped.
///
/// # Returns
/// A JoinHandle for the spawned task. Dropping it detaches the task.
///
/// # Example
/// ```ignore
/// let _ = spawn_cache_write(storage, stats, "app-cache-v1".into(), request, response.clone());
/// ```
pub fn spawn_cache_write(
    storage: Arc<dyn CacheStorage>,
    stats: Arc<RwLock<CacheStats>>,
    cache_name: String,
    request: FetchRequest,
    response: NetworkResponse,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = match CacheEntry::from_exchange(&request, &response) {
            Ok(entry) => storage.put_existing(&cache_name, entry).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(true) => {
                debug!("Cached {} in '{}'", request.url, cache_name);
                stats.write().await.record_stored();
            }
            Ok(false) => {
                debug!(
                    "Cache '{}' is gone, dropping write for {}",
                    cache_name, request.url
                );
            }
            Err(e) => {
                warn!("Background cache write for {} failed: {}", request.url, e);
                stats.write().await.record_store_failure();
            }
        }
    })
}
