//! Workspace façade crate.
//!
//! Host shells depend on `soundscape-workspace` and pick features instead of
//! wiring each crate individually:
//!
//! - `player` (default): the page-side playlist/transport service
//!   (`core-service`).
//! - `offline-cache`: the offline cache worker (`core-offline`).
//! - `wasm`: both of the above plus the browser adapters from `bridge-wasm`.

#[cfg(feature = "player")]
pub use core_service as service;

#[cfg(feature = "offline-cache")]
pub use core_offline as offline;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use bridge_wasm as web;
