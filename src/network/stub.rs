//! Scripted network used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FetchRequest, Network, NetworkResponse};
use crate::error::{Result, WorkerError};

/// Answers requests from a fixed URL table and counts every call.
/// Unknown URLs fail as if the network were unreachable.
#[derive(Debug, Default)]
pub struct StubNetwork {
    routes: Mutex<HashMap<String, NetworkResponse>>,
    calls: AtomicUsize,
}

impl StubNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, response: NetworkResponse) -> Self {
        self.set_route(url, response);
        self
    }

    pub fn set_route(&self, url: &str, response: NetworkResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    pub fn remove_route(&self, url: &str) {
        self.routes.lock().unwrap().remove(url);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for StubNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<NetworkResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.routes
            .lock()
            .unwrap()
            .get(request.url.as_str())
            .cloned()
            .ok_or_else(|| WorkerError::Network(format!("unreachable: {}", request.url)))
    }
}
