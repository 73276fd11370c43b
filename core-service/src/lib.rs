//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (media element,
//! resource binder, notifier, renderer, install prompt) into the playlist
//! controller and runs the background loops that need a clock: sleep-timer
//! ticks and the delayed skip past a broken track. Browser builds get their
//! adapters from `bridge-wasm`; tests and native hosts pass fakes.
//!
//! ```ignore
//! use core_service::{PlayerDependencies, PlayerService, UiEvent};
//!
//! let deps = PlayerDependencies::new(media, notifier).with_renderer(renderer);
//! let service = PlayerService::bootstrap(&AppConfig::default(), deps)?;
//! service.dispatch(UiEvent::FilesSelected(files)).await;
//! service.dispatch(UiEvent::PlayPause).await;
//! ```

pub mod error;
pub mod input;
pub mod install;
pub mod service;

pub use error::{Result, ServiceError};
pub use input::{shortcut_for, KeyAction, KeyCode, KeyInput, MediaEvent, UiEvent};
pub use install::InstallPromptManager;
pub use service::{PlayerDependencies, PlayerService};
