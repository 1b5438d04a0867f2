//! API Routes
//!
//! Configures the Axum router: admin endpoints under `/__worker/`, every
//! other path proxied through the worker.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    caches_handler, health_handler, proxy_handler, stats_handler, update_handler, AppState,
};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /__worker/health` - Health check endpoint
/// - `GET /__worker/stats` - Interceptor statistics
/// - `GET /__worker/caches` - Cache stores and the active generation
/// - `POST /__worker/update` - Install and activate a new version
/// - anything else - routed through the fetch interceptor
///
/// # Middleware
/// - CORS: Allows any origin on the admin endpoints
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/caches", get(caches_handler))
        .route("/update", post(update_handler))
        .layer(cors);

    Router::new()
        .nest("/__worker", admin)
        .fallback(proxy_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
