//! Task spawning.
//!
//! The player only ever spawns background loops whose results nobody awaits
//! (sleep-timer ticks, delayed track skips), so the surface is a single
//! fire-and-forget [`spawn_detached`].
//!
//! - Native: `tokio::spawn`; the future must be `Send`.
//! - WASM: `wasm_bindgen_futures::spawn_local`; the future stays on the page
//!   thread and need not be `Send`.

use std::future::Future;

/// Spawns a detached task on the Tokio runtime.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime, like `tokio::spawn`.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    drop(tokio::spawn(future));
}

/// Spawns a detached task on the browser event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn detached_task_runs() {
        let flag = Arc::new(AtomicBool::new(false));
        let task_flag = Arc::clone(&flag);

        spawn_detached(async move {
            task_flag.store(true, Ordering::SeqCst);
        });

        tokio::task::yield_now().await;
        assert!(flag.load(Ordering::SeqCst));
    }
}
