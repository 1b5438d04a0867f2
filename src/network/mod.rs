//! Network Module
//!
//! The network side of the worker: request/response values and the
//! `Network` abstraction the interceptor forwards misses to.

mod http;
mod message;

#[cfg(test)]
pub(crate) mod stub;

use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpNetwork;
pub use message::{FetchRequest, NetworkResponse, ResponseType};

/// Issues requests against the network.
///
/// An `Err` means the request never produced a response (offline, refused,
/// DNS failure). Non-success statuses are returned as `Ok`.
#[async_trait]
pub trait Network: Send + Sync {
    /// Performs the request and buffers the full response body.
    async fn fetch(&self, request: &FetchRequest) -> Result<NetworkResponse>;
}
