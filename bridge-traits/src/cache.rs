//! Named request→response stores.
//!
//! Modelled on the browser Cache Storage: a set of stores addressed by name,
//! each mapping request keys to stored responses.

use crate::{
    error::Result,
    http::{FetchRequest, FetchResponse},
    platform::PlatformSendSync,
};

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait CacheStorage: PlatformSendSync {
    /// Open a store, creating it if missing.
    async fn open(&self, store: &str) -> Result<()>;

    /// Names of all existing stores.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Delete a store. Returns `false` if it did not exist.
    async fn delete(&self, store: &str) -> Result<bool>;

    /// Look up a stored response for `request` in `store`.
    async fn lookup(&self, store: &str, request: &FetchRequest) -> Result<Option<FetchResponse>>;

    /// Store one response.
    async fn put(&self, store: &str, request: &FetchRequest, response: FetchResponse) -> Result<()>;

    /// Store a batch of responses. Either every entry is stored or none is.
    async fn put_all(&self, store: &str, entries: Vec<(FetchRequest, FetchResponse)>) -> Result<()>;
}
