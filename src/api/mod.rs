//! API Module
//!
//! HTTP surface of the worker: a catch-all proxy route plus admin endpoints.
//!
//! # Endpoints
//! - `GET /__worker/health` - Health check endpoint
//! - `GET /__worker/stats` - Interceptor statistics
//! - `GET /__worker/caches` - Cache stores and the active generation
//! - `POST /__worker/update` - Register a new version
//! - `* /*` - Proxied through the fetch interceptor

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
