//! Request and response values that flow through the worker.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use url::Url;

/// Headers that only make sense for a single hop and are never forwarded.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::TE,
    header::PROXY_AUTHORIZATION,
];

// == Response Type ==
/// Classification of a network response relative to the page's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin response
    Basic,
    /// Cross-origin response that opted in via CORS headers
    Cors,
    /// Cross-origin response without CORS consent
    Opaque,
}

impl ResponseType {
    /// Classifies a response by comparing the final URL with the page origin.
    pub fn classify(origin: &Url, final_url: &Url, headers: &HeaderMap) -> Self {
        if origin.origin() == final_url.origin() {
            ResponseType::Basic
        } else if headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
            ResponseType::Cors
        } else {
            ResponseType::Opaque
        }
    }
}

// == Fetch Request ==
/// An outgoing request issued by a controlled page.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchRequest {
    /// Creates a bodiless GET request for `url`.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Builds a request from the pieces of an incoming proxied request,
    /// dropping hop-by-hop headers.
    pub fn from_parts(method: Method, url: Url, mut headers: HeaderMap, body: Bytes) -> Self {
        strip_hop_by_hop(&mut headers);
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// Adds a request header, returning the request for chaining.
    #[cfg(test)]
    pub fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.headers
            .insert(name, axum::http::HeaderValue::from_static(value));
        self
    }
}

// == Network Response ==
/// A response produced either by the network or from a cache store.
///
/// The body is fully buffered, so cloning yields an independent copy that
/// can be stored while the original is returned to the caller.
#[derive(Debug, Clone)]
pub struct NetworkResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub response_type: ResponseType,
}

impl NetworkResponse {
    /// Creates a same-origin response.
    pub fn basic(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            response_type: ResponseType::Basic,
        }
    }

    /// Returns the same response with a different type.
    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Adds a response header, returning the response for chaining.
    #[cfg(test)]
    pub fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.headers
            .insert(name, axum::http::HeaderValue::from_static(value));
        self
    }

    /// True when the response may be copied into a cache store:
    /// exactly 200 and same-origin.
    pub fn qualifies_for_cache(&self) -> bool {
        self.status == StatusCode::OK && self.response_type == ResponseType::Basic
    }
}

impl IntoResponse for NetworkResponse {
    fn into_response(self) -> Response {
        let mut headers = self.headers;
        strip_hop_by_hop(&mut headers);

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = headers;
        response
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}
