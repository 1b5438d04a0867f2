//! Cache Entry Module
//!
//! Defines request identity and the stored form of a response.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

use crate::error::{Result, WorkerError};
use crate::network::{FetchRequest, NetworkResponse, ResponseType};

// == Request Key ==
/// Identity of a request inside a cache store: method plus absolute URL.
///
/// Header-dependent matching is handled by the `Vary` snapshot stored with
/// each response, not by the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub method: Method,
    pub url: String,
}

impl RequestKey {
    /// Builds the key for a request. HEAD is looked up as GET.
    pub fn for_request(request: &FetchRequest) -> Self {
        let method = if request.method == Method::HEAD {
            Method::GET
        } else {
            request.method.clone()
        };

        Self {
            method,
            url: request.url.as_str().to_string(),
        }
    }
}

// == Vary ==
/// Request header values captured at store time for each header named in
/// the response's `Vary` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VarySnapshot {
    /// Response has no `Vary` header; matches any request headers
    #[default]
    None,
    /// `Vary: *`; never matches a later request
    Wildcard,
    /// Header name and the value the storing request carried, if any
    Headers(Vec<(HeaderName, Option<HeaderValue>)>),
}

impl VarySnapshot {
    fn capture(request_headers: &HeaderMap, response_headers: &HeaderMap) -> Self {
        let mut names = Vec::new();

        for value in response_headers.get_all(header::VARY) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if name == "*" {
                    return VarySnapshot::Wildcard;
                }
                if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
                    let captured = request_headers.get(&name).cloned();
                    names.push((name, captured));
                }
            }
        }

        if names.is_empty() {
            VarySnapshot::None
        } else {
            VarySnapshot::Headers(names)
        }
    }

    fn matches(&self, request_headers: &HeaderMap) -> bool {
        match self {
            VarySnapshot::None => true,
            VarySnapshot::Wildcard => false,
            VarySnapshot::Headers(captured) => captured
                .iter()
                .all(|(name, value)| request_headers.get(name) == value.as_ref()),
        }
    }
}

// == Cached Response ==
/// A response as held by a cache store.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub vary: VarySnapshot,
    /// Store timestamp (Unix milliseconds); informational, never used for expiry
    pub cached_at: u64,
}

impl CachedResponse {
    /// Checks whether this stored response answers a request carrying
    /// `request_headers`.
    pub fn matches(&self, request_headers: &HeaderMap) -> bool {
        self.vary.matches(request_headers)
    }

    /// Rebuilds a response for the caller. Stored responses are always
    /// same-origin.
    pub fn to_response(&self) -> NetworkResponse {
        NetworkResponse {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
            response_type: ResponseType::Basic,
        }
    }
}

// == Cache Entry ==
/// A request/response pair ready to be written into a store.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: RequestKey,
    pub response: CachedResponse,
}

impl CacheEntry {
    /// Pairs a request with the response it produced.
    ///
    /// Only GET requests can be stored.
    pub fn from_exchange(request: &FetchRequest, response: &NetworkResponse) -> Result<Self> {
        if request.method != Method::GET {
            return Err(WorkerError::UnsupportedMethod(request.method.to_string()));
        }

        Ok(Self {
            key: RequestKey::for_request(request),
            response: CachedResponse {
                status: response.status,
                headers: response.headers.clone(),
                body: response.body.clone(),
                vary: VarySnapshot::capture(&request.headers, &response.headers),
                cached_at: current_timestamp_ms(),
            },
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
