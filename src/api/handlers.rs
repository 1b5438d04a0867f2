//! API Handlers
//!
//! The proxy entry point plus the worker admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::{CacheStorage, MemoryCacheStorage};
use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::models::{
    CacheInfo, CachesResponse, HealthResponse, StatsResponse, UpdateRequest, UpdateResponse,
};
use crate::network::{FetchRequest, HttpNetwork, Network};
use crate::worker::Registration;

/// Header telling the page how its request was answered.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Largest request body the proxy will buffer
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The worker registration routing every page request
    pub registration: Arc<Registration>,
    /// Startup configuration; base for version updates
    pub config: Config,
}

impl AppState {
    /// Creates a new AppState around an existing registration.
    pub fn new(registration: Registration, config: Config) -> Self {
        Self {
            registration: Arc::new(registration),
            config,
        }
    }

    /// Creates a new AppState from configuration: in-memory cache storage
    /// and an HTTP client for the configured origin.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage: Arc<dyn CacheStorage> = Arc::new(MemoryCacheStorage::new());
        let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(config.origin.clone())?);
        Ok(Self::new(Registration::new(storage, network), config.clone()))
    }
}

/// Fallback handler: every non-admin request goes through the worker.
pub async fn proxy_handler(State(state): State<AppState>, request: Request) -> Result<Response> {
    let (parts, body) = request.into_parts();

    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = state.config.resolve(path)?;
    let body = axum::body::to_bytes(body, MAX_BODY_SIZE)
        .await
        .map_err(|e| WorkerError::InvalidRequest(format!("Unreadable request body: {}", e)))?;

    let fetch = FetchRequest::from_parts(parts.method, url, parts.headers, body);
    let outcome = state.registration.handle_fetch(fetch).await?;

    let mut response = outcome.response.into_response();
    response.headers_mut().insert(
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static(outcome.source.as_str()),
    );
    Ok(response)
}

/// Handler for POST /__worker/update
///
/// Installs and activates a new version. On install failure the current
/// version keeps serving and the error is returned.
pub async fn update_handler(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(WorkerError::InvalidRequest(error_msg));
    }

    let base = match state.registration.active().await {
        Some(active) => active.config().clone(),
        None => state.config.clone(),
    };

    let worker = state
        .registration
        .register(base.with_version(req.version, req.manifest))
        .await?;

    Ok(Json(UpdateResponse::new(
        worker.cache_name(),
        worker.state().await,
    )))
}

/// Handler for GET /__worker/caches
pub async fn caches_handler(State(state): State<AppState>) -> Json<CachesResponse> {
    let active = state.registration.active().await;
    let current = active.as_ref().map(|w| w.cache_name().to_string());
    let worker_state = match &active {
        Some(worker) => Some(worker.state().await),
        None => None,
    };

    let storage = state.registration.storage();
    let mut caches = Vec::new();
    for name in storage.keys().await {
        let entries = storage.entry_count(&name).await.unwrap_or(0);
        caches.push(CacheInfo {
            current: current.as_deref() == Some(name.as_str()),
            name,
            entries,
        });
    }

    Json(CachesResponse {
        active: current,
        state: worker_state,
        caches,
    })
}

/// Handler for GET /__worker/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.registration.stats().await))
}

/// Handler for GET /__worker/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
