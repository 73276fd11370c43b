//! Service worker entry point.
//!
//! Routes the worker's `install`, `activate` and `fetch` events to one
//! [`OfflineWorker`]. Only same-origin `GET` requests are intercepted; the
//! browser handles everything else as if no worker were running.

use crate::cache::WasmCacheStorage;
use crate::error::{to_js_error, WasmError};
use crate::http::{from_web_request, to_web_response, WasmFetcher};
use crate::lifecycle::ServiceWorkerHost;
use crate::{init_runtime, load_config};
use bridge_traits::http::{FetchRequest, HttpMethod};
use core_offline::{CacheManifest, OfflineWorker, WorkerPhase};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Event, ExtendableEvent, FetchEvent, ServiceWorkerGlobalScope};

/// Start the offline cache worker in the current service worker scope.
///
/// Call synchronously from the worker script's top level so the lifecycle
/// listeners exist before the browser dispatches `install`.
#[wasm_bindgen]
pub fn start_service_worker(config_json: Option<String>) -> Result<(), JsValue> {
    init_runtime();
    let config = load_config(config_json)?;

    let scope = js_sys::global()
        .dyn_into::<ServiceWorkerGlobalScope>()
        .map_err(|_| WasmError::Unavailable("service worker scope".to_string()))?;
    let manifest = CacheManifest::new(&config.offline, &scope.registration().scope())
        .map_err(WasmError::from)?;
    info!(store = manifest.store_name(), "Starting offline cache worker");

    let worker = Rc::new(OfflineWorker::new(
        manifest,
        Arc::new(WasmFetcher::new()),
        Arc::new(WasmCacheStorage::new()?),
        Arc::new(ServiceWorkerHost::new(scope.clone())),
    ));

    listen(&scope, "install", {
        let worker = Rc::clone(&worker);
        move |event| {
            let worker = Rc::clone(&worker);
            wait_until(&event, async move {
                worker.install().await.map_err(to_js_error)?;
                Ok(JsValue::UNDEFINED)
            });
        }
    })?;

    listen(&scope, "activate", {
        let worker = Rc::clone(&worker);
        move |event| {
            let worker = Rc::clone(&worker);
            wait_until(&event, async move {
                worker.activate().await.map_err(to_js_error)?;
                Ok(JsValue::UNDEFINED)
            });
        }
    })?;

    listen(&scope, "fetch", move |event| {
        let Ok(event) = event.dyn_into::<FetchEvent>() else {
            return;
        };
        let Some(request) = intercepted(&worker, &event) else {
            return;
        };
        let worker = Rc::clone(&worker);
        let response = future_to_promise(async move {
            let response = worker.handle_fetch(&request).await.map_err(to_js_error)?;
            Ok(to_web_response(&response).map_err(to_js_error)?.into())
        });
        if let Err(err) = event.respond_with(&response) {
            warn!(error = ?err, "respondWith failed");
        }
    })?;

    Ok(())
}

/// The request to answer, or `None` to let the browser handle it.
fn intercepted(worker: &OfflineWorker, event: &FetchEvent) -> Option<FetchRequest> {
    if worker.phase() == WorkerPhase::Redundant {
        return None;
    }
    match from_web_request(&event.request()) {
        Ok(Some(request))
            if request.method == HttpMethod::Get
                && worker.manifest().is_same_origin(&request.url) =>
        {
            Some(request)
        }
        Ok(_) => None,
        Err(err) => {
            warn!(error = %err, "Could not read intercepted request");
            None
        }
    }
}

fn wait_until<F>(event: &Event, work: F)
where
    F: std::future::Future<Output = Result<JsValue, JsValue>> + 'static,
{
    let Some(event) = event.dyn_ref::<ExtendableEvent>() else {
        return;
    };
    if let Err(err) = event.wait_until(&future_to_promise(work)) {
        warn!(error = ?err, "waitUntil failed");
    }
}

fn listen(
    scope: &ServiceWorkerGlobalScope,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    scope.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    // The worker lives as long as its scope.
    closure.forget();
    Ok(())
}
