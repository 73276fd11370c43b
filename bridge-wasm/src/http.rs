//! Browser `fetch` adapter and conversions between bridge and web types.
//!
//! The fetcher works in both page and worker contexts: it resolves `fetch`
//! on whichever global scope is running.

use crate::error::{js_error, js_message};
use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    http::{FetchRequest, FetchResponse, Fetcher, HttpMethod, RequestDestination, ResponseType},
};
use bytes::Bytes;
use js_sys::{try_iter, Array, Promise, Uint8Array};
use std::collections::HashMap;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, ResponseInit, Window, WorkerGlobalScope};

/// Network fetch through the global `fetch` function.
#[derive(Debug, Default, Clone, Copy)]
pub struct WasmFetcher;

impl WasmFetcher {
    /// Create a fetcher for the current global scope.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl Fetcher for WasmFetcher {
    async fn fetch(&self, request: &FetchRequest) -> BridgeResult<FetchResponse> {
        let web_request = build_request(request)?;
        let result = JsFuture::from(global_fetch(&web_request)?).await;

        // A rejected fetch means no response arrived at all.
        let value = result.map_err(|err| {
            BridgeError::Network(format!("{}: {}", request.url, js_message(&err)))
        })?;
        let response = value
            .dyn_into::<Response>()
            .map_err(|_| BridgeError::OperationFailed("fetch returned non-Response".into()))?;

        let converted = from_web_response(&response).await?;
        debug!(url = %request.url, status = converted.status, "Fetched");
        Ok(converted)
    }
}

fn global_fetch(request: &Request) -> BridgeResult<Promise> {
    let global = js_sys::global();
    if let Some(worker) = global.dyn_ref::<WorkerGlobalScope>() {
        return Ok(worker.fetch_with_request(request));
    }
    if let Some(window) = global.dyn_ref::<Window>() {
        return Ok(window.fetch_with_request(request));
    }
    Err(BridgeError::NotAvailable("fetch".to_string()))
}

/// Build a web `Request` for `request`.
pub(crate) fn build_request(request: &FetchRequest) -> BridgeResult<Request> {
    let init = RequestInit::new();
    init.set_method(request.method.as_str());

    let headers = Headers::new().map_err(|err| js_error("create headers", err))?;
    for (key, value) in &request.headers {
        headers
            .set(key, value)
            .map_err(|err| js_error("set header", err))?;
    }
    init.set_headers(&headers);

    Request::new_with_str_and_init(&request.url, &init)
        .map_err(|err| js_error("build request", err))
}

/// Convert an intercepted web `Request` into bridge data.
///
/// Returns `None` for methods the bridge does not model.
pub(crate) fn from_web_request(request: &Request) -> BridgeResult<Option<FetchRequest>> {
    let Some(method) = HttpMethod::parse(&request.method()) else {
        return Ok(None);
    };
    let destination = match request.destination() {
        web_sys::RequestDestination::Document => RequestDestination::Document,
        web_sys::RequestDestination::Script => RequestDestination::Script,
        web_sys::RequestDestination::Style => RequestDestination::Style,
        web_sys::RequestDestination::Image => RequestDestination::Image,
        web_sys::RequestDestination::Manifest => RequestDestination::Manifest,
        web_sys::RequestDestination::Audio => RequestDestination::Audio,
        _ => RequestDestination::Other,
    };

    Ok(Some(FetchRequest {
        method,
        url: request.url(),
        headers: collect_headers(&request.headers())?,
        destination,
    }))
}

/// Read a web `Response` fully into bridge data.
pub(crate) async fn from_web_response(response: &Response) -> BridgeResult<FetchResponse> {
    let response_type = match response.type_() {
        web_sys::ResponseType::Cors => ResponseType::Cors,
        web_sys::ResponseType::Opaque | web_sys::ResponseType::Opaqueredirect => {
            ResponseType::Opaque
        }
        web_sys::ResponseType::Error => ResponseType::Error,
        _ => ResponseType::Basic,
    };
    let headers = collect_headers(&response.headers())?;
    let body = read_body(response).await?;

    Ok(FetchResponse {
        status: response.status(),
        response_type,
        headers,
        body,
    })
}

/// Build a web `Response` from bridge data.
pub(crate) fn to_web_response(response: &FetchResponse) -> BridgeResult<Response> {
    // The Response constructor only accepts statuses a server could send.
    if !(200..=599).contains(&response.status) {
        return Ok(Response::error());
    }

    let headers = Headers::new().map_err(|err| js_error("create headers", err))?;
    for (key, value) in &response.headers {
        headers
            .set(key, value)
            .map_err(|err| js_error("set header", err))?;
    }
    let init = ResponseInit::new();
    init.set_status(response.status);
    init.set_headers(&headers);

    let body = if response.body.is_empty() {
        None
    } else {
        Some(Uint8Array::from(response.body.as_ref()))
    };
    Response::new_with_opt_buffer_source_and_init(body.as_ref().map(|array| &**array), &init)
        .map_err(|err| js_error("build response", err))
}

async fn read_body(response: &Response) -> BridgeResult<Bytes> {
    let promise = response
        .array_buffer()
        .map_err(|err| js_error("response.array_buffer", err))?;
    let buffer = JsFuture::from(promise)
        .await
        .map_err(|err| js_error("response buffer", err))?;
    let array = Uint8Array::new(&buffer);
    let mut bytes = vec![0u8; array.length() as usize];
    array.copy_to(&mut bytes);
    Ok(Bytes::from(bytes))
}

fn collect_headers(headers: &Headers) -> BridgeResult<HashMap<String, String>> {
    let iterator = try_iter(&JsValue::from(headers.clone()))
        .map_err(|err| js_error("iterate headers", err))?
        .ok_or_else(|| BridgeError::OperationFailed("Headers iterator unavailable".into()))?;

    let mut map = HashMap::new();
    for entry in iterator {
        let entry = entry.map_err(|err| js_error("header iteration", err))?;
        let pair = Array::from(&entry);
        if pair.length() >= 2 {
            if let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                map.insert(key, value);
            }
        }
    }

    Ok(map)
}
