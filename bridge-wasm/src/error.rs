//! Error types for the browser adapters

use bridge_traits::error::BridgeError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type for browser adapter operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors raised while talking to browser APIs
#[derive(Error, Debug)]
pub enum WasmError {
    /// JavaScript error from web-sys
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// A global the adapter needs does not exist in this context
    #[error("Browser API not available: {0}")]
    Unavailable(String),

    /// An element the page adapters expect is missing from the document
    #[error("Missing page element #{0}")]
    MissingElement(String),

    /// Configuration passed from JavaScript could not be used
    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    /// Player service failed to start
    #[error("Player error: {0}")]
    Service(#[from] core_service::ServiceError),

    /// Offline worker setup failed
    #[error("Offline worker error: {0}")]
    Offline(#[from] core_offline::OfflineError),
}

impl WasmError {
    /// Name of the `DOMException` carried by `value`, if any.
    pub fn dom_exception_name(value: &JsValue) -> Option<String> {
        value
            .dyn_ref::<web_sys::DomException>()
            .map(|exception| exception.name())
    }
}

impl From<WasmError> for BridgeError {
    fn from(err: WasmError) -> Self {
        match err {
            WasmError::Unavailable(what) => BridgeError::NotAvailable(what),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

impl From<WasmError> for JsValue {
    fn from(err: WasmError) -> Self {
        to_js_error(err)
    }
}

impl From<JsValue> for WasmError {
    fn from(js_value: JsValue) -> Self {
        WasmError::JavaScript(js_message(&js_value))
    }
}

/// Readable message for a thrown JavaScript value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        message
    } else if let Some(exception) = value.dyn_ref::<web_sys::DomException>() {
        format!("{}: {}", exception.name(), exception.message())
    } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        error.message().into()
    } else {
        format!("{value:?}")
    }
}

/// Wrap a JavaScript failure as a bridge error with some context.
pub(crate) fn js_error(context: &str, err: JsValue) -> BridgeError {
    BridgeError::OperationFailed(format!("{context}: {}", js_message(&err)))
}

/// Convert any displayable error into a JavaScript `Error`.
pub(crate) fn to_js_error<E: std::fmt::Display>(err: E) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
