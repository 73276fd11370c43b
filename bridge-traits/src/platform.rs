//! Thread-safety bound shared by every bridge trait.
//!
//! Native hosts share bridge objects with Tokio tasks, so they must be
//! `Send + Sync`. In the browser everything runs on the page (or worker)
//! thread and `web-sys` handles such as `HtmlAudioElement` are neither.

/// `Send + Sync` natively; no bound on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> PlatformSendSync for T {}

/// `Send + Sync` natively; no bound on `wasm32`.
#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSendSync for T {}
