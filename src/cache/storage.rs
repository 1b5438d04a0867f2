//! Cache Storage Module
//!
//! The namespace of named cache stores, behind an injectable trait so the
//! lifecycle handlers can run against any backing implementation.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheStore, CachedResponse, RequestKey};
use crate::error::{Result, WorkerError};
use crate::network::FetchRequest;

/// Named cache stores. Each operation is atomic on its own; callers never
/// hold a lock across operations.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Opens the named store, creating it if absent. Returns true when the
    /// store was created by this call.
    async fn open(&self, name: &str) -> Result<bool>;

    /// Looks a request up in one store.
    async fn lookup(&self, name: &str, request: &FetchRequest) -> Option<CachedResponse>;

    /// Looks a request up across every store, oldest store first.
    async fn match_any(&self, request: &FetchRequest) -> Option<CachedResponse>;

    /// Stores one entry, creating the store if needed.
    async fn put(&self, name: &str, entry: CacheEntry) -> Result<()>;

    /// Stores one entry only if the store exists. Returns false, storing
    /// nothing, once the store has been deleted.
    async fn put_existing(&self, name: &str, entry: CacheEntry) -> Result<bool>;

    /// Stores a batch of entries in one step: either all are visible or,
    /// when the store cannot be written, none are.
    async fn put_all(&self, name: &str, entries: Vec<CacheEntry>) -> Result<()>;

    /// Lists store names in creation order.
    async fn keys(&self) -> Vec<String>;

    /// Deletes a whole store. Returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Returns the number of entries in a store, if it exists.
    async fn entry_count(&self, name: &str) -> Option<usize>;
}

// == Memory Cache Storage ==
/// In-process cache storage backed by a list of `CacheStore`s.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    /// Stores in creation order
    stores: RwLock<Vec<CacheStore>>,
}

impl MemoryCacheStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn position(stores: &[CacheStore], name: &str) -> Option<usize> {
    stores.iter().position(|store| store.name() == name)
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<bool> {
        if name.is_empty() {
            return Err(WorkerError::InvalidRequest(
                "Cache name cannot be empty".to_string(),
            ));
        }

        let mut stores = self.stores.write().await;
        if position(&stores, name).is_some() {
            return Ok(false);
        }
        stores.push(CacheStore::new(name));
        Ok(true)
    }

    async fn lookup(&self, name: &str, request: &FetchRequest) -> Option<CachedResponse> {
        let key = RequestKey::for_request(request);
        let stores = self.stores.read().await;
        let index = position(&stores, name)?;
        stores[index].lookup(&key, &request.headers).cloned()
    }

    async fn match_any(&self, request: &FetchRequest) -> Option<CachedResponse> {
        let key = RequestKey::for_request(request);
        let stores = self.stores.read().await;
        stores
            .iter()
            .find_map(|store| store.lookup(&key, &request.headers))
            .cloned()
    }

    async fn put(&self, name: &str, entry: CacheEntry) -> Result<()> {
        self.put_all(name, vec![entry]).await
    }

    async fn put_existing(&self, name: &str, entry: CacheEntry) -> Result<bool> {
        let mut stores = self.stores.write().await;
        match position(&stores, name) {
            Some(index) => {
                stores[index].put(entry);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn put_all(&self, name: &str, entries: Vec<CacheEntry>) -> Result<()> {
        if name.is_empty() {
            return Err(WorkerError::InvalidRequest(
                "Cache name cannot be empty".to_string(),
            ));
        }

        let mut stores = self.stores.write().await;
        let index = match position(&stores, name) {
            Some(index) => index,
            None => {
                stores.push(CacheStore::new(name));
                stores.len() - 1
            }
        };

        for entry in entries {
            stores[index].put(entry);
        }
        Ok(())
    }

    async fn keys(&self) -> Vec<String> {
        let stores = self.stores.read().await;
        stores.iter().map(|store| store.name().to_string()).collect()
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let mut stores = self.stores.write().await;
        match position(&stores, name) {
            Some(index) => {
                stores.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn entry_count(&self, name: &str) -> Option<usize> {
        let stores = self.stores.read().await;
        position(&stores, name).map(|index| stores[index].len())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkResponse;
    use axum::http::StatusCode;
    use url::Url;

    fn request(path: &str) -> FetchRequest {
        FetchRequest::get(Url::parse("http://localhost/").unwrap().join(path).unwrap())
    }

    fn entry(path: &str, body: &'static str) -> CacheEntry {
        CacheEntry::from_exchange(
            &request(path),
            &NetworkResponse::basic(StatusCode::OK, body),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_once() {
        let storage = MemoryCacheStorage::new();

        assert!(storage.open("app-cache-v1").await.unwrap());
        assert!(!storage.open("app-cache-v1").await.unwrap());
        assert_eq!(storage.keys().await, vec!["app-cache-v1"]);
        assert_eq!(storage.entry_count("app-cache-v1").await, Some(0));
    }

    #[tokio::test]
    async fn test_open_rejects_empty_name() {
        let storage = MemoryCacheStorage::new();
        assert!(matches!(
            storage.open("").await,
            Err(WorkerError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_keys_in_creation_order() {
        let storage = MemoryCacheStorage::new();
        storage.open("b-cache-v1").await.unwrap();
        storage.open("a-cache-v1").await.unwrap();
        storage.put("c-cache-v1", entry("/", "x")).await.unwrap();

        assert_eq!(
            storage.keys().await,
            vec!["b-cache-v1", "a-cache-v1", "c-cache-v1"]
        );
    }

    #[tokio::test]
    async fn test_lookup_scoped_to_store() {
        let storage = MemoryCacheStorage::new();
        storage.put("app-cache-v1", entry("index.html", "one")).await.unwrap();
        storage.open("app-cache-v2").await.unwrap();

        let req = request("index.html");
        assert!(storage.lookup("app-cache-v1", &req).await.is_some());
        assert!(storage.lookup("app-cache-v2", &req).await.is_none());
        assert!(storage.lookup("missing", &req).await.is_none());
    }

    #[tokio::test]
    async fn test_match_any_prefers_oldest_store() {
        let storage = MemoryCacheStorage::new();
        storage.put("app-cache-v1", entry("index.html", "old")).await.unwrap();
        storage.put("app-cache-v2", entry("index.html", "new")).await.unwrap();

        let found = storage.match_any(&request("index.html")).await.unwrap();
        assert_eq!(found.body, "old");
    }

    #[tokio::test]
    async fn test_put_all_and_count() {
        let storage = MemoryCacheStorage::new();
        storage
            .put_all("app-cache-v1", vec![entry("/", "root"), entry("index.html", "index")])
            .await
            .unwrap();

        assert_eq!(storage.entry_count("app-cache-v1").await, Some(2));
        assert_eq!(storage.entry_count("other").await, None);
    }

    #[tokio::test]
    async fn test_put_existing_never_creates_store() {
        let storage = MemoryCacheStorage::new();

        assert!(!storage.put_existing("app-cache-v1", entry("/", "root")).await.unwrap());
        assert!(storage.keys().await.is_empty());

        storage.open("app-cache-v1").await.unwrap();
        assert!(storage.put_existing("app-cache-v1", entry("/", "root")).await.unwrap());
        assert_eq!(storage.entry_count("app-cache-v1").await, Some(1));

        storage.delete("app-cache-v1").await.unwrap();
        assert!(!storage.put_existing("app-cache-v1", entry("/", "again")).await.unwrap());
        assert!(storage.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_store() {
        let storage = MemoryCacheStorage::new();
        storage.put("app-cache-v1", entry("/", "root")).await.unwrap();

        assert!(storage.delete("app-cache-v1").await.unwrap());
        assert!(!storage.delete("app-cache-v1").await.unwrap());
        assert_eq!(storage.entry_count("app-cache-v1").await, None);
        assert!(storage.match_any(&request("/")).await.is_none());
    }
}
