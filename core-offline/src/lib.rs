//! # Offline Cache Module
//!
//! Background worker that serves the app shell from a versioned store.
//!
//! ## Overview
//!
//! This module handles:
//! - Resolving the asset manifest against the worker scope
//! - Atomic install of every listed asset into `<namespace>-<version>`
//! - Purging stores left behind by older versions on activation
//! - Cache-first request handling with network fill and an offline page
//!
//! Host access goes through [`bridge_traits::Fetcher`],
//! [`bridge_traits::CacheStorage`] and [`bridge_traits::WorkerHost`].

pub mod error;
pub mod fallback;
pub mod manifest;
pub mod memory;
pub mod worker;

pub use error::{OfflineError, Result};
pub use fallback::offline_fallback_document;
pub use manifest::CacheManifest;
pub use memory::MemoryCacheStorage;
pub use worker::{OfflineWorker, WorkerPhase};
