//! Named cache storage shared by every worker version.

use std::future::Future;

use moka::future::Cache;
use tokio::sync::RwLock;
use url::Url;

use crate::cache_name::CacheName;
use crate::error::StorageError;
use crate::request::{Response, cache_key};

/// Cache storage: a set of named caches mapping request URLs to responses.
///
/// Implementations are shared across worker versions behind an `Arc`.
pub trait CacheStorage: Send + Sync + 'static {
    /// Open (creating if needed) the cache `name`.
    fn open(&self, name: &CacheName) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Names of all existing caches, in creation order.
    fn keys(&self) -> impl Future<Output = Result<Vec<CacheName>, StorageError>> + Send;

    /// Delete the cache `name`. Returns true if it existed.
    fn delete(&self, name: &CacheName) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Store `response` for `url` in cache `name`, replacing any entry.
    fn put(
        &self,
        name: &CacheName,
        url: &Url,
        response: Response,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Look up `url` in cache `name`.
    fn match_in(
        &self,
        name: &CacheName,
        url: &Url,
    ) -> impl Future<Output = Result<Option<Response>, StorageError>> + Send;

    /// Look up `url` in every cache, oldest first.
    fn match_any(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<Option<Response>, StorageError>> + Send;
}

/// In-memory cache storage backed by `moka`.
///
/// Caches are unbounded so a precached asset is never evicted.
#[derive(Default)]
pub struct MemoryCacheStorage {
    caches: RwLock<Vec<(CacheName, Cache<String, Response>)>>,
}

impl MemoryCacheStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn handle(&self, name: &CacheName) -> Option<Cache<String, Response>> {
        self.caches
            .read()
            .await
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, cache)| cache.clone())
    }

    /// URLs stored in cache `name`, sorted. Empty if the cache does not exist.
    pub async fn entries(&self, name: &CacheName) -> Vec<String> {
        let Some(cache) = self.handle(name).await else {
            return Vec::new();
        };
        let mut urls: Vec<String> = cache.iter().map(|(k, _)| k.as_ref().clone()).collect();
        urls.sort();
        urls
    }
}

impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &CacheName) -> Result<(), StorageError> {
        let mut caches = self.caches.write().await;
        if !caches.iter().any(|(n, _)| n == name) {
            caches.push((name.clone(), Cache::builder().build()));
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<CacheName>, StorageError> {
        Ok(self
            .caches
            .read()
            .await
            .iter()
            .map(|(n, _)| n.clone())
            .collect())
    }

    async fn delete(&self, name: &CacheName) -> Result<bool, StorageError> {
        let mut caches = self.caches.write().await;
        let before = caches.len();
        caches.retain(|(n, _)| n != name);
        Ok(caches.len() != before)
    }

    async fn put(&self, name: &CacheName, url: &Url, response: Response) -> Result<(), StorageError> {
        let cache = self
            .handle(name)
            .await
            .ok_or_else(|| StorageError::MissingCache(name.to_string()))?;
        cache.insert(cache_key(url), response).await;
        Ok(())
    }

    async fn match_in(&self, name: &CacheName, url: &Url) -> Result<Option<Response>, StorageError> {
        match self.handle(name).await {
            Some(cache) => Ok(cache.get(&cache_key(url)).await),
            None => Ok(None),
        }
    }

    async fn match_any(&self, url: &Url) -> Result<Option<Response>, StorageError> {
        let key = cache_key(url);
        let caches: Vec<Cache<String, Response>> = self
            .caches
            .read()
            .await
            .iter()
            .map(|(_, cache)| cache.clone())
            .collect();

        for cache in caches {
            if let Some(response) = cache.get(&key).await {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("http://boba.test/").unwrap().join(path).unwrap()
    }

    #[tokio::test]
    async fn test_put_requires_open_cache() {
        let storage = MemoryCacheStorage::new();
        let name = CacheName::versioned("v1");
        let err = storage
            .put(&name, &url("a.css"), Response::ok("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::MissingCache(n) if n == "v1"));
    }

    #[tokio::test]
    async fn test_put_and_match() {
        let storage = MemoryCacheStorage::new();
        let name = CacheName::versioned("v1");
        storage.open(&name).await.unwrap();
        storage.put(&name, &url("a.css"), Response::ok("a")).await.unwrap();

        let hit = storage.match_in(&name, &url("a.css#x")).await.unwrap();
        assert_eq!(hit.unwrap().body, b"a");
        assert!(storage.match_in(&name, &url("b.css")).await.unwrap().is_none());
        assert_eq!(storage.entries(&name).await, vec!["http://boba.test/a.css"]);
    }

    #[tokio::test]
    async fn test_open_is_idempotent_and_keys_ordered() {
        let storage = MemoryCacheStorage::new();
        let a = CacheName::versioned("a");
        let b = CacheName::versioned("b");
        storage.open(&b).await.unwrap();
        storage.open(&a).await.unwrap();
        storage.open(&b).await.unwrap();
        assert_eq!(storage.keys().await.unwrap(), vec![b, a]);
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = MemoryCacheStorage::new();
        let name = CacheName::versioned("old");
        storage.open(&name).await.unwrap();
        storage.put(&name, &url("x"), Response::ok("x")).await.unwrap();

        assert!(storage.delete(&name).await.unwrap());
        assert!(!storage.delete(&name).await.unwrap());
        assert!(storage.match_any(&url("x")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_match_any_prefers_oldest_cache() {
        let storage = MemoryCacheStorage::new();
        let old = CacheName::versioned("old");
        let new = CacheName::versioned("new");
        storage.open(&old).await.unwrap();
        storage.open(&new).await.unwrap();
        storage.put(&new, &url("x"), Response::ok("new")).await.unwrap();
        storage.put(&old, &url("x"), Response::ok("old")).await.unwrap();

        let hit = storage.match_any(&url("x")).await.unwrap().unwrap();
        assert_eq!(hit.body, b"old");
    }
}
