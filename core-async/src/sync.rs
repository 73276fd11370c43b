//! Synchronization primitives.
//!
//! - Native: `tokio::sync::Mutex`, `Send + Sync`, safe to hold across awaits.
//! - WASM: `futures::lock::Mutex`, single-threaded but with the same
//!   `lock().await` surface.

#[cfg(not(target_arch = "wasm32"))]
pub use tokio::sync::{Mutex, MutexGuard};

#[cfg(target_arch = "wasm32")]
pub use futures::lock::{Mutex, MutexGuard};
