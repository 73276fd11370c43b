//! Cache Storage adapter.

use crate::error::{js_error, WasmError, WasmResult};
use crate::http::{from_web_response, to_web_response};
use async_trait::async_trait;
use bridge_traits::{
    cache::CacheStorage,
    error::{BridgeError, Result as BridgeResult},
    http::{FetchRequest, FetchResponse},
};
use js_sys::{Array, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Cache, Response};

/// Named stores backed by the global `caches` object.
pub struct WasmCacheStorage {
    caches: web_sys::CacheStorage,
}

impl WasmCacheStorage {
    /// Bind to `caches` on the current global scope.
    pub fn new() -> WasmResult<Self> {
        let value = Reflect::get(&js_sys::global(), &JsValue::from_str("caches"))?;
        let caches = value
            .dyn_into::<web_sys::CacheStorage>()
            .map_err(|_| WasmError::Unavailable("caches".to_string()))?;
        Ok(Self { caches })
    }

    async fn has(&self, store: &str) -> BridgeResult<bool> {
        let value = JsFuture::from(self.caches.has(store))
            .await
            .map_err(|err| js_error("caches.has", err))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn cache(&self, store: &str) -> BridgeResult<Cache> {
        JsFuture::from(self.caches.open(store))
            .await
            .map_err(|err| js_error("caches.open", err))?
            .dyn_into::<Cache>()
            .map_err(|_| BridgeError::OperationFailed("caches.open returned non-Cache".into()))
    }

    async fn existing(&self, store: &str) -> BridgeResult<Cache> {
        if !self.has(store).await? {
            return Err(BridgeError::OperationFailed(format!(
                "store {store:?} is not open"
            )));
        }
        self.cache(store).await
    }
}

#[async_trait(?Send)]
impl CacheStorage for WasmCacheStorage {
    async fn open(&self, store: &str) -> BridgeResult<()> {
        self.cache(store).await.map(|_| ())
    }

    async fn keys(&self) -> BridgeResult<Vec<String>> {
        let value = JsFuture::from(self.caches.keys())
            .await
            .map_err(|err| js_error("caches.keys", err))?;
        Ok(Array::from(&value)
            .iter()
            .filter_map(|name| name.as_string())
            .collect())
    }

    async fn delete(&self, store: &str) -> BridgeResult<bool> {
        let value = JsFuture::from(self.caches.delete(store))
            .await
            .map_err(|err| js_error("caches.delete", err))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn lookup(
        &self,
        store: &str,
        request: &FetchRequest,
    ) -> BridgeResult<Option<FetchResponse>> {
        // Opening a missing store would create it.
        if !self.has(store).await? {
            return Ok(None);
        }
        let cache = self.cache(store).await?;
        let value = JsFuture::from(cache.match_with_str(request.cache_key()))
            .await
            .map_err(|err| js_error("cache.match", err))?;
        if value.is_undefined() {
            return Ok(None);
        }
        let response = value
            .dyn_into::<Response>()
            .map_err(|_| BridgeError::OperationFailed("cache.match returned non-Response".into()))?;
        from_web_response(&response).await.map(Some)
    }

    async fn put(
        &self,
        store: &str,
        request: &FetchRequest,
        response: FetchResponse,
    ) -> BridgeResult<()> {
        let cache = self.existing(store).await?;
        let web_response = to_web_response(&response)?;
        JsFuture::from(cache.put_with_str(request.cache_key(), &web_response))
            .await
            .map_err(|err| js_error("cache.put", err))?;
        Ok(())
    }

    /// The Cache API has no transactions; entries written before a failure
    /// are deleted again.
    async fn put_all(
        &self,
        store: &str,
        entries: Vec<(FetchRequest, FetchResponse)>,
    ) -> BridgeResult<()> {
        let cache = self.existing(store).await?;
        let prepared = entries
            .iter()
            .map(|(request, response)| Ok((request.cache_key(), to_web_response(response)?)))
            .collect::<BridgeResult<Vec<_>>>()?;

        let mut written: Vec<&str> = Vec::with_capacity(prepared.len());
        for (key, response) in &prepared {
            if let Err(err) = JsFuture::from(cache.put_with_str(key, response)).await {
                warn!(store, key, "Batch write failed; rolling back");
                for done in &written {
                    if JsFuture::from(cache.delete_with_str(done)).await.is_err() {
                        warn!(store, key = done, "Rollback delete failed");
                    }
                }
                return Err(js_error("cache.put", err));
            }
            written.push(*key);
        }
        debug!(store, count = written.len(), "Batch stored");
        Ok(())
    }
}
