//! Time-related abstractions.
//!
//! - Native: `tokio::time::sleep`, so paused-clock tests can drive timers.
//! - WASM: `gloo-timers`, backed by `setTimeout`.

pub use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub use tokio::time::sleep;

/// Sleeps for the specified duration using the browser's `setTimeout`.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await
}
