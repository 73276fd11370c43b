//! Worker takeover and the deferred install prompt.

use crate::error::js_error;
use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    lifecycle::{InstallOutcome, InstallPrompt, WorkerHost},
};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, ServiceWorkerGlobalScope};

/// Lifecycle controls of the running service worker.
pub struct ServiceWorkerHost {
    scope: ServiceWorkerGlobalScope,
}

impl ServiceWorkerHost {
    /// Wrap the worker's global scope.
    pub fn new(scope: ServiceWorkerGlobalScope) -> Self {
        Self { scope }
    }
}

#[async_trait(?Send)]
impl WorkerHost for ServiceWorkerHost {
    async fn skip_waiting(&self) -> BridgeResult<()> {
        let promise = self
            .scope
            .skip_waiting()
            .map_err(|err| js_error("skipWaiting", err))?;
        JsFuture::from(promise)
            .await
            .map_err(|err| js_error("skipWaiting", err))?;
        Ok(())
    }

    async fn claim_clients(&self) -> BridgeResult<()> {
        JsFuture::from(self.scope.clients().claim())
            .await
            .map_err(|err| js_error("clients.claim", err))?;
        Ok(())
    }
}

/// A `beforeinstallprompt` event held back for later.
///
/// The event type has no `web-sys` binding, so its `prompt()` method and
/// `userChoice` promise are reached by reflection.
pub struct DeferredInstallPrompt {
    event: Event,
}

impl DeferredInstallPrompt {
    /// Capture `event`, suppressing the browser's own prompt.
    pub fn capture(event: Event) -> Self {
        event.prevent_default();
        Self { event }
    }

    fn property(&self, name: &str) -> BridgeResult<JsValue> {
        Reflect::get(&self.event, &JsValue::from_str(name))
            .map_err(|err| js_error("beforeinstallprompt", err))
    }
}

#[async_trait(?Send)]
impl InstallPrompt for DeferredInstallPrompt {
    async fn prompt(&self) -> BridgeResult<InstallOutcome> {
        let prompt = self
            .property("prompt")?
            .dyn_into::<Function>()
            .map_err(|_| BridgeError::NotAvailable("install prompt".to_string()))?;
        prompt
            .call0(&self.event)
            .map_err(|err| js_error("prompt()", err))?;

        let choice = self
            .property("userChoice")?
            .dyn_into::<Promise>()
            .map_err(|_| BridgeError::NotAvailable("userChoice".to_string()))?;
        let choice = JsFuture::from(choice)
            .await
            .map_err(|err| js_error("userChoice", err))?;
        let outcome = Reflect::get(&choice, &JsValue::from_str("outcome"))
            .map_err(|err| js_error("userChoice.outcome", err))?;

        Ok(match outcome.as_string().as_deref() {
            Some("accepted") => InstallOutcome::Accepted,
            _ => InstallOutcome::Dismissed,
        })
    }
}
