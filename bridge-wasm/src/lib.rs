//! # Browser Adapters
//!
//! `web-sys` implementations of the SoundScape bridge traits, plus the two
//! entry points JavaScript calls.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It will not compile for native targets.
//!
//! # Implementations
//!
//! Page context:
//! - [`HtmlAudioMedia`]: the `<audio>` element
//! - [`ObjectUrlBinder`]: uploads as `blob:` URLs
//! - [`DomRenderer`] and [`AlertNotifier`]: view snapshots and notices
//! - [`DeferredInstallPrompt`]: the captured `beforeinstallprompt` event
//!
//! Worker context:
//! - [`WasmFetcher`]: global `fetch`
//! - [`WasmCacheStorage`]: the Cache Storage API
//! - [`ServiceWorkerHost`]: `skipWaiting` and `clients.claim`
//!
//! # Entry Points
//!
//! ```javascript
//! // page
//! import init, { start_player } from './pkg/bridge_wasm.js';
//! await init();
//! const player = await start_player(null);
//!
//! // service-worker.js
//! importScripts('./pkg/bridge_wasm.js');
//! wasm_bindgen('./pkg/bridge_wasm_bg.wasm').then(() => wasm_bindgen.start_service_worker(null));
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod binder;
pub mod cache;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod media;
pub mod page;
pub mod ui;
pub mod worker;

// Re-export commonly used types
pub use binder::ObjectUrlBinder;
pub use cache::WasmCacheStorage;
pub use error::{WasmError, WasmResult};
pub use http::WasmFetcher;
pub use lifecycle::{DeferredInstallPrompt, ServiceWorkerHost};
pub use media::HtmlAudioMedia;
pub use page::{start_player, PlayerHandle};
pub use ui::{AlertNotifier, DomRenderer, ElementIds};
pub use worker::start_service_worker;

use core_runtime::config::AppConfig;
use core_runtime::logging::{init_logging, LoggingConfig};

/// Install the panic hook and console logging once per context.
pub(crate) fn init_runtime() {
    console_error_panic_hook::set_once();
    if init_logging(LoggingConfig::default()).is_err() {
        tracing::debug!("Logging already initialized");
    }
}

/// Parse the configuration handed over from JavaScript; `None` means defaults.
pub(crate) fn load_config(json: Option<String>) -> WasmResult<AppConfig> {
    match json {
        Some(json) => Ok(AppConfig::from_json(&json)?),
        None => Ok(AppConfig::default()),
    }
}
