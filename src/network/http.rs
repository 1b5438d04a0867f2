//! reqwest-backed network client.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{FetchRequest, Network, NetworkResponse, ResponseType};
use crate::error::{Result, WorkerError};

/// Forwards requests over HTTP and classifies responses against `origin`.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
    origin: Url,
}

impl HttpNetwork {
    /// Creates a client for pages served from `origin`.
    pub fn new(origin: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| WorkerError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, origin })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<NetworkResponse> {
        debug!("Network fetch: {} {}", request.method, request.url);

        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| WorkerError::Network(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_type = ResponseType::classify(&self.origin, response.url(), &headers);
        let body = response
            .bytes()
            .await
            .map_err(|e| WorkerError::Network(e.to_string()))?;

        Ok(NetworkResponse {
            status,
            headers,
            body,
            response_type,
        })
    }
}
