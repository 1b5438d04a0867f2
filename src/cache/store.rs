//! Cache Store Module
//!
//! A single named store mapping request identity to a stored response.

use std::collections::HashMap;

use axum::http::HeaderMap;

use crate::cache::{CacheEntry, CachedResponse, RequestKey};

// == Cache Store ==
/// One named cache store. Entries are replaced, never edited in place.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Store name (a Generation Identifier)
    name: String,
    /// Key-value storage
    entries: HashMap<RequestKey, CachedResponse>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Returns the store name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Lookup ==
    /// Finds the response stored for `key` whose `Vary` snapshot accepts
    /// `request_headers`.
    pub fn lookup(&self, key: &RequestKey, request_headers: &HeaderMap) -> Option<&CachedResponse> {
        self.entries
            .get(key)
            .filter(|response| response.matches(request_headers))
    }

    // == Put ==
    /// Stores an entry, replacing any previous response for the same key.
    pub fn put(&mut self, entry: CacheEntry) {
        self.entries.insert(entry.key, entry.response);
    }

    /// Returns true if the store holds a response for `key`.
    #[cfg(test)]
    pub fn contains(&self, key: &RequestKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns every stored request key.
    #[cfg(test)]
    pub fn keys(&self) -> Vec<&RequestKey> {
        self.entries.keys().collect()
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{FetchRequest, NetworkResponse};
    use axum::http::StatusCode;
    use url::Url;

    fn entry(path: &str, body: &'static str) -> (FetchRequest, CacheEntry) {
        let request = FetchRequest::get(Url::parse("http://localhost/").unwrap().join(path).unwrap());
        let response = NetworkResponse::basic(StatusCode::OK, body);
        let entry = CacheEntry::from_exchange(&request, &response).unwrap();
        (request, entry)
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new("app-cache-v1");
        assert_eq!(store.name(), "app-cache-v1");
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_put_and_lookup() {
        let mut store = CacheStore::new("app-cache-v1");
        let (request, entry) = entry("index.html", "hello");

        store.put(entry);

        let key = RequestKey::for_request(&request);
        let found = store.lookup(&key, &request.headers).unwrap();
        assert_eq!(found.body, "hello");
        assert!(store.contains(&key));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lookup_missing() {
        let store = CacheStore::new("app-cache-v1");
        let (request, _) = entry("missing.js", "");
        assert!(store
            .lookup(&RequestKey::for_request(&request), &request.headers)
            .is_none());
    }

    #[test]
    fn test_store_put_replaces() {
        let mut store = CacheStore::new("app-cache-v1");
        let (request, first) = entry("index.html", "v1");
        let (_, second) = entry("index.html", "v2");

        store.put(first);
        store.put(second);

        let found = store
            .lookup(&RequestKey::for_request(&request), &request.headers)
            .unwrap();
        assert_eq!(found.body, "v2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_keys() {
        let mut store = CacheStore::new("app-cache-v1");
        store.put(entry("/", "root").1);
        store.put(entry("index.html", "index").1);

        let mut urls: Vec<&str> = store.keys().iter().map(|k| k.url.as_str()).collect();
        urls.sort();
        assert_eq!(urls, vec!["http://localhost/", "http://localhost/index.html"]);
    }
}
