//! Configuration Module
//!
//! Handles loading and managing worker configuration from environment variables.

use std::env;

use url::Url;

use crate::error::{Result, WorkerError};

/// Default origin the proxy fronts when `ORIGIN_URL` is unset or invalid.
const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8080/";

/// Worker configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application name, first part of the cache store name
    pub app_name: String,
    /// Cache version; bumping it invalidates every previously stored entry
    pub cache_version: u32,
    /// Origin the page is served from; requests are forwarded here
    pub origin: Url,
    /// Resource paths pre-cached at install time
    pub manifest: Vec<String>,
    /// Optional path served from cache when both cache and network miss
    pub offline_fallback: Option<String>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_APP_NAME` - Application name (default: reunion-vmc)
    /// - `CACHE_VERSION` - Cache version number (default: 1)
    /// - `ORIGIN_URL` - Upstream origin (default: http://127.0.0.1:8080/)
    /// - `PRECACHE_MANIFEST` - Comma separated paths (default: "/,index.html")
    /// - `OFFLINE_FALLBACK` - Fallback path for offline misses (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            app_name: env::var("CACHE_APP_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.app_name),
            cache_version: env::var("CACHE_VERSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_version),
            origin: env::var("ORIGIN_URL")
                .ok()
                .and_then(|v| parse_origin(&v))
                .unwrap_or(defaults.origin),
            manifest: env::var("PRECACHE_MANIFEST")
                .ok()
                .map(|v| parse_manifest(&v))
                .unwrap_or(defaults.manifest),
            offline_fallback: env::var("OFFLINE_FALLBACK")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Returns the Generation Identifier: `<app>-cache-v<N>`.
    pub fn generation_id(&self) -> String {
        generation_id(&self.app_name, self.cache_version)
    }

    /// Resolves a manifest or request path against the origin.
    ///
    /// Paths are taken relative to the origin's own path, so a leading `/`
    /// means the origin root even when `ORIGIN_URL` carries a prefix.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.origin
            .join(path.trim_start_matches('/'))
            .map_err(|e| WorkerError::InvalidRequest(format!("Cannot resolve '{}': {}", path, e)))
    }

    /// Returns a copy of this config pointing at a new version and manifest.
    pub fn with_version(&self, cache_version: u32, manifest: Option<Vec<String>>) -> Self {
        Self {
            cache_version,
            manifest: manifest.unwrap_or_else(|| self.manifest.clone()),
            ..self.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "reunion-vmc".to_string(),
            cache_version: 1,
            // Constant literal, always parses
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            manifest: vec!["/".to_string(), "index.html".to_string()],
            offline_fallback: None,
            server_port: 3000,
        }
    }
}

/// Builds a cache store name from an application name and version.
pub fn generation_id(app_name: &str, version: u32) -> String {
    format!("{}-cache-v{}", app_name, version)
}

/// Parses `ORIGIN_URL`, making sure its path ends in `/` so that joins
/// keep the last segment.
fn parse_origin(raw: &str) -> Option<Url> {
    let mut url = Url::parse(raw.trim()).ok()?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Some(url)
}

/// Splits a comma separated manifest, dropping blank entries.
fn parse_manifest(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
