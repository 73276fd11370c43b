//! In-process [`CacheStorage`].
//!
//! Backs the worker in tests and native hosts. Entries are keyed by
//! [`FetchRequest::cache_key`].

use async_trait::async_trait;
use bridge_traits::cache::CacheStorage;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::http::{FetchRequest, FetchResponse};
use parking_lot::RwLock;
use std::collections::HashMap;

type Store = HashMap<String, FetchResponse>;

#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    stores: RwLock<HashMap<String, Store>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in `store`, or `None` if it does not exist.
    pub fn entry_count(&self, store: &str) -> Option<usize> {
        self.stores.read().get(store).map(HashMap::len)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, store: &str) -> Result<()> {
        self.stores.write().entry(store.to_string()).or_default();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.stores.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, store: &str) -> Result<bool> {
        Ok(self.stores.write().remove(store).is_some())
    }

    async fn lookup(&self, store: &str, request: &FetchRequest) -> Result<Option<FetchResponse>> {
        Ok(self
            .stores
            .read()
            .get(store)
            .and_then(|entries| entries.get(request.cache_key()))
            .cloned())
    }

    async fn put(
        &self,
        store: &str,
        request: &FetchRequest,
        response: FetchResponse,
    ) -> Result<()> {
        let mut stores = self.stores.write();
        let entries = stores
            .get_mut(store)
            .ok_or_else(|| BridgeError::NotAvailable(format!("cache store {store} is not open")))?;
        entries.insert(request.cache_key().to_string(), response);
        Ok(())
    }

    async fn put_all(&self, store: &str, batch: Vec<(FetchRequest, FetchResponse)>) -> Result<()> {
        let mut stores = self.stores.write();
        let entries = stores
            .get_mut(store)
            .ok_or_else(|| BridgeError::NotAvailable(format!("cache store {store} is not open")))?;
        entries.extend(
            batch
                .into_iter()
                .map(|(request, response)| (request.cache_key().to_string(), response)),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_requires_open_store() {
        let storage = MemoryCacheStorage::new();
        let request = FetchRequest::get("https://a.example/x");
        let err = storage
            .put("missing", &request, FetchResponse::new(200, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::NotAvailable(_)));
    }

    #[tokio::test]
    async fn lookup_ignores_fragment() {
        let storage = MemoryCacheStorage::new();
        storage.open("s").await.unwrap();
        storage
            .put("s", &FetchRequest::get("https://a.example/x"), FetchResponse::new(200, "x"))
            .await
            .unwrap();

        let hit = storage
            .lookup("s", &FetchRequest::get("https://a.example/x#frag"))
            .await
            .unwrap();
        assert_eq!(hit.unwrap().body, "x");
        assert!(storage
            .lookup("other", &FetchRequest::get("https://a.example/x"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn keys_and_delete() {
        let storage = MemoryCacheStorage::new();
        storage.open("b").await.unwrap();
        storage.open("a").await.unwrap();
        assert_eq!(storage.keys().await.unwrap(), vec!["a", "b"]);
        assert!(storage.delete("a").await.unwrap());
        assert!(!storage.delete("a").await.unwrap());
        assert_eq!(storage.entry_count("b"), Some(0));
    }

    #[tokio::test]
    async fn put_all_stores_every_entry() {
        let storage = MemoryCacheStorage::new();
        storage.open("s").await.unwrap();
        storage
            .put_all(
                "s",
                vec![
                    (FetchRequest::get("https://a.example/1"), FetchResponse::new(200, "1")),
                    (FetchRequest::get("https://a.example/2"), FetchResponse::new(200, "2")),
                ],
            )
            .await
            .unwrap();
        assert_eq!(storage.entry_count("s"), Some(2));
    }
}
