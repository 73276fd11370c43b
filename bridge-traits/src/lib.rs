//! # Host Bridge Traits
//!
//! Capability traits the SoundScape core needs from its host.
//!
//! ## Overview
//!
//! The player core never touches browser APIs directly. Each trait below is a
//! capability that the page (or the background cache worker) provides, so the
//! playlist logic and the caching strategy stay testable natively while
//! `bridge-wasm` supplies the `web-sys` implementations.
//!
//! ## Traits
//!
//! ### Page context
//! - [`MediaElement`](playback::MediaElement) - The audio element: source, play/pause, seek
//! - [`ResourceBinder`](storage::ResourceBinder) - Makes uploaded bytes playable, releases them on removal
//! - [`Notifier`](ui::Notifier) - User-visible notices (rejections, playback failures)
//! - [`ViewRenderer`](ui::ViewRenderer) - Draws a [`PlayerView`](ui::PlayerView) snapshot
//! - [`InstallPrompt`](lifecycle::InstallPrompt) - Deferred install prompt captured from the host
//!
//! ### Worker context
//! - [`Fetcher`](http::Fetcher) - Network fetch
//! - [`CacheStorage`](cache::CacheStorage) - Named, versioned request→response stores
//! - [`WorkerHost`](lifecycle::WorkerHost) - `skipWaiting` / `clients.claim`
//!
//! ## Error Handling
//!
//! Bridge operations return [`BridgeError`](error::BridgeError). Playback
//! attempts return [`PlayError`](playback::PlayError) instead, because an
//! autoplay refusal is an expected outcome the controller must tell apart from
//! a real failure.
//!
//! ## Thread Safety
//!
//! Trait objects are bounded by [`PlatformSendSync`](platform::PlatformSendSync):
//! `Send + Sync` natively, unbounded on `wasm32` where `web-sys` handles are
//! single-threaded.

pub mod cache;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod platform;
pub mod playback;
pub mod storage;
pub mod ui;

pub use error::BridgeError;

// Re-export commonly used types
pub use cache::CacheStorage;
pub use http::{FetchRequest, FetchResponse, Fetcher, HttpMethod, RequestDestination, ResponseType};
pub use lifecycle::{InstallOutcome, InstallPrompt, WorkerHost};
pub use playback::{MediaElement, MediaErrorKind, PlayError};
pub use storage::{ResourceBinder, ResourceLocator, UploadedFile};
pub use ui::{Notice, NoticeLevel, Notifier, PlayerView, PlaylistRow, ViewRenderer};
