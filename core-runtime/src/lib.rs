//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the player and the offline
//! cache worker:
//! - Logging and tracing initialisation
//! - Application configuration
//! - Typed event bus
//!
//! ## Overview
//!
//! Nothing in here knows about playlists or caches beyond the configuration
//! values and event payloads they exchange. Domain crates take an
//! [`AppConfig`](config::AppConfig) section at construction and may emit onto
//! an [`EventBus`](events::EventBus).

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
