//! # Offline Cache Worker
//!
//! Lifecycle state machine of the background worker that keeps the app
//! shell available with no network.
//!
//! ## Phases
//!
//! ```text
//! Parsed ──install──▶ Installing ──▶ Installed
//!                          │                 │
//!                          │             activate
//!                          │                 ▼
//!                          │            Activating ──▶ Activated
//!                          │                 │
//!                          └─────────────────┴── failure ──▶ Redundant
//! ```
//!
//! - **install** fetches every listed asset and writes them to the versioned
//!   store in one batch. If any fetch fails nothing is written and the worker
//!   becomes [`WorkerPhase::Redundant`]; the app keeps working online.
//! - **activate** deletes every store not named for this version, then
//!   claims all open clients. A storage or host failure makes the worker
//!   redundant.
//! - **fetch** answers from the current store first, falls back to the
//!   network, and copies successful same-origin responses into the store.
//!   Navigations that fail outright get the offline document.

use crate::error::{OfflineError, Result};
use crate::fallback::offline_fallback_document;
use crate::manifest::CacheManifest;
use bridge_traits::cache::CacheStorage;
use bridge_traits::http::{FetchRequest, FetchResponse, Fetcher, HttpMethod};
use bridge_traits::lifecycle::WorkerHost;
use core_runtime::events::{CoreEvent, EventBus, OfflineEvent};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerPhase {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

pub struct OfflineWorker {
    manifest: CacheManifest,
    fetcher: Arc<dyn Fetcher>,
    storage: Arc<dyn CacheStorage>,
    host: Arc<dyn WorkerHost>,
    phase: Mutex<WorkerPhase>,
    event_bus: Option<EventBus>,
}

impl OfflineWorker {
    pub fn new(
        manifest: CacheManifest,
        fetcher: Arc<dyn Fetcher>,
        storage: Arc<dyn CacheStorage>,
        host: Arc<dyn WorkerHost>,
    ) -> Self {
        Self {
            manifest,
            fetcher,
            storage,
            host,
            phase: Mutex::new(WorkerPhase::Parsed),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub fn phase(&self) -> WorkerPhase {
        *self.phase.lock()
    }

    fn transition(
        &self,
        operation: &'static str,
        from: WorkerPhase,
        to: WorkerPhase,
    ) -> Result<()> {
        let mut phase = self.phase.lock();
        if *phase != from {
            return Err(OfflineError::InvalidPhase {
                operation,
                phase: *phase,
            });
        }
        *phase = to;
        Ok(())
    }

    fn set_phase(&self, phase: WorkerPhase) {
        *self.phase.lock() = phase;
    }

    // ========================================================================
    // Install
    // ========================================================================

    /// Populates the versioned store with every listed asset.
    ///
    /// Returns the number of assets stored. On success the host is asked to
    /// activate this worker without waiting for older instances.
    #[instrument(skip(self), fields(store = %self.manifest.store_name()))]
    pub async fn install(&self) -> Result<usize> {
        self.transition("install", WorkerPhase::Parsed, WorkerPhase::Installing)?;
        info!(assets = self.manifest.assets().len(), "Installing offline cache");

        match self.populate_store().await {
            Ok(count) => {
                self.set_phase(WorkerPhase::Installed);
                info!(count, "All assets cached");
                self.emit(OfflineEvent::Installed {
                    store: self.manifest.store_name().to_string(),
                    assets: count,
                });
                if let Err(err) = self.host.skip_waiting().await {
                    warn!(error = %err, "Host refused immediate activation");
                }
                Ok(count)
            }
            Err(reason) => {
                self.set_phase(WorkerPhase::Redundant);
                error!(%reason, "Offline cache install failed");
                self.emit(OfflineEvent::InstallFailed {
                    store: self.manifest.store_name().to_string(),
                    reason: reason.clone(),
                });
                Err(OfflineError::InstallFailed {
                    store: self.manifest.store_name().to_string(),
                    reason,
                })
            }
        }
    }

    async fn populate_store(&self) -> std::result::Result<usize, String> {
        let mut batch = Vec::with_capacity(self.manifest.assets().len());
        for request in self.manifest.requests() {
            let response = self
                .fetcher
                .fetch(&request)
                .await
                .map_err(|err| format!("{}: {err}", request.url))?;
            if !response.is_success() {
                return Err(format!("{}: HTTP {}", request.url, response.status));
            }
            debug!(url = %request.url, bytes = response.body.len(), "Fetched asset");
            batch.push((request, response));
        }

        let store = self.manifest.store_name();
        self.storage
            .open(store)
            .await
            .map_err(|err| format!("could not open store: {err}"))?;
        let count = batch.len();
        self.storage
            .put_all(store, batch)
            .await
            .map_err(|err| format!("could not write store: {err}"))?;
        Ok(count)
    }

    // ========================================================================
    // Activate
    // ========================================================================

    /// Purges stale stores and claims every open client.
    ///
    /// Returns the names of the deleted stores.
    #[instrument(skip(self), fields(store = %self.manifest.store_name()))]
    pub async fn activate(&self) -> Result<Vec<String>> {
        self.transition("activate", WorkerPhase::Installed, WorkerPhase::Activating)?;

        match self.purge_and_claim().await {
            Ok(purged) => {
                self.set_phase(WorkerPhase::Activated);
                info!(purged = purged.len(), "Offline cache activated");
                self.emit(OfflineEvent::Activated {
                    store: self.manifest.store_name().to_string(),
                    purged: purged.clone(),
                });
                Ok(purged)
            }
            Err(err) => {
                self.set_phase(WorkerPhase::Redundant);
                error!(error = %err, "Offline cache activation failed");
                Err(err)
            }
        }
    }

    async fn purge_and_claim(&self) -> Result<Vec<String>> {
        let mut purged = Vec::new();
        for name in self.storage.keys().await? {
            if !self.manifest.is_stale(&name) {
                continue;
            }
            if self.storage.delete(&name).await? {
                info!(store = %name, "Deleted stale cache");
                purged.push(name);
            }
        }
        self.host.claim_clients().await?;
        Ok(purged)
    }

    // ========================================================================
    // Fetch
    // ========================================================================

    /// Answers one intercepted request.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let phase = self.phase();
        if phase == WorkerPhase::Redundant {
            return Err(OfflineError::InvalidPhase {
                operation: "handle fetch",
                phase,
            });
        }

        if request.method != HttpMethod::Get {
            return self.from_network(request).await;
        }

        let store = self.manifest.store_name();
        match self.storage.lookup(store, request).await {
            Ok(Some(response)) => {
                debug!(url = %request.url, "Serving from cache");
                self.emit(OfflineEvent::ServedFromCache {
                    url: request.url.clone(),
                });
                return Ok(response);
            }
            Ok(None) => {}
            Err(err) => warn!(url = %request.url, error = %err, "Cache lookup failed"),
        }

        let response = self.from_network(request).await?;
        if self.should_store(request, &response) {
            if let Err(err) = self.storage.put(store, request, response.clone()).await {
                warn!(url = %request.url, error = %err, "Could not cache response");
            }
        }
        Ok(response)
    }

    async fn from_network(&self, request: &FetchRequest) -> Result<FetchResponse> {
        match self.fetcher.fetch(request).await {
            Ok(response) => Ok(response),
            Err(err) if request.is_navigation() => {
                warn!(url = %request.url, error = %err, "Navigation failed; serving offline page");
                self.emit(OfflineEvent::FallbackServed {
                    url: request.url.clone(),
                });
                Ok(offline_fallback_document())
            }
            Err(err) => Err(OfflineError::Network(err.to_string())),
        }
    }

    fn should_store(&self, request: &FetchRequest, response: &FetchResponse) -> bool {
        request.method == HttpMethod::Get
            && response.status == 200
            && response.is_same_origin()
            && self.manifest.is_same_origin(&request.url)
    }

    fn emit(&self, event: OfflineEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Offline(event)).ok();
        }
    }
}
