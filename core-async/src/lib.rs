//! Runtime-agnostic async shims for the SoundScape player.
//!
//! The player runs natively under Tokio (tests, desktop hosts) and in the
//! browser on `wasm32`, where the page event loop is the only executor. Every
//! other crate in the workspace goes through this crate instead of naming
//! `tokio` directly so both builds share one code path.
//!
//! # Modules
//!
//! - `task`: fire-and-forget task spawning
//! - `time`: `sleep` and `Duration`
//! - `sync`: async `Mutex`

pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn_detached;
pub use time::{sleep, Duration};
