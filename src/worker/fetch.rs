//! Fetch interceptor: cache-first, network fallback, background population.

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::CacheWorker;
use crate::error::{Result, WorkerError};
use crate::network::{FetchRequest, NetworkResponse};
use crate::tasks::spawn_cache_write;

/// Where the response handed back to the caller came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchSource {
    /// Served from a cache store without touching the network
    Cache,
    /// Forwarded to the network after a cache miss
    Network,
    /// Network failed; the configured offline fallback was served
    Fallback,
    /// No worker controls the page; plain network pass-through
    Bypass,
}

impl FetchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchSource::Cache => "hit",
            FetchSource::Network => "miss",
            FetchSource::Fallback => "fallback",
            FetchSource::Bypass => "bypass",
        }
    }
}

/// The response for the caller plus the detached cache write, if one was
/// started. Dropping `background` leaves the write running.
#[derive(Debug)]
pub struct FetchOutcome {
    pub response: NetworkResponse,
    pub source: FetchSource,
    pub background: Option<JoinHandle<()>>,
}

impl FetchOutcome {
    pub(crate) fn new(response: NetworkResponse, source: FetchSource) -> Self {
        Self {
            response,
            source,
            background: None,
        }
    }
}

/// Answers one request from a controlled page.
///
/// A cached response is returned as-is, with no freshness check. On a miss
/// the request goes to the network; a qualifying response (200, same-origin)
/// is copied into the worker's store by a detached task while the original
/// is returned. A network failure is returned as an error unless an offline
/// fallback is configured and cached.
pub async fn handle_fetch(worker: &CacheWorker, request: FetchRequest) -> Result<FetchOutcome> {
    if let Some(cached) = worker.storage.match_any(&request).await {
        debug!("Serving from cache: {}", request.url);
        worker.stats.write().await.record_hit();
        return Ok(FetchOutcome::new(cached.to_response(), FetchSource::Cache));
    }

    worker.stats.write().await.record_miss();
    debug!("Requesting from network: {}", request.url);

    let response = match worker.network.fetch(&request).await {
        Ok(response) => response,
        Err(e) => {
            error!("Fetch failed for {}: {}", request.url, e);
            worker.stats.write().await.record_network_error();
            return offline_fallback(worker, e).await;
        }
    };

    if !response.qualifies_for_cache() {
        debug!(
            "Not caching {} (status {}, type {:?})",
            request.url, response.status, response.response_type
        );
        worker.stats.write().await.record_skipped();
        return Ok(FetchOutcome::new(response, FetchSource::Network));
    }

    let background = spawn_cache_write(
        worker.storage.clone(),
        worker.stats.clone(),
        worker.cache_name().to_string(),
        request,
        response.clone(),
    );

    Ok(FetchOutcome {
        response,
        source: FetchSource::Network,
        background: Some(background),
    })
}

/// Serves the configured fallback resource from cache, or hands back the
/// network error when none is configured or cached.
async fn offline_fallback(worker: &CacheWorker, cause: WorkerError) -> Result<FetchOutcome> {
    let Some(path) = worker.config().offline_fallback.as_deref() else {
        return Err(cause);
    };

    let request = FetchRequest::get(worker.config().resolve(path)?);
    match worker.storage.match_any(&request).await {
        Some(cached) => {
            info!("Serving offline fallback {}", request.url);
            Ok(FetchOutcome::new(cached.to_response(), FetchSource::Fallback))
        }
        None => Err(cause),
    }
}
