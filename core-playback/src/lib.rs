//! # Playlist & Transport Module
//!
//! Page-side player core: upload validation, playlist bookkeeping, transport
//! controls and the sleep timer.
//!
//! ## Overview
//!
//! This module handles:
//! - Validating uploaded files by media type, extension and size
//! - Keeping the current selection valid across insert/remove/navigate
//! - Driving the host media element through [`bridge_traits::MediaElement`]
//! - A one-shot sleep timer that pauses playback on expiry
//! - Deriving the [`bridge_traits::PlayerView`] rendered by the host
//!
//! Audio decoding is left to the host media element.

pub mod binding;
pub mod controller;
pub mod error;
pub mod playlist;
pub mod sleep_timer;
pub mod track;
pub mod view;

pub use binding::InlineBinder;
pub use controller::{ErrorSkip, PlayerController, PlayerState, UploadRejection, UploadReport};
pub use error::{PlaybackError, Result};
pub use playlist::{Playlist, Removal};
pub use sleep_timer::{parse_minutes, SleepTimer, TimerGeneration, TimerState, TimerTick};
pub use track::{mime_for_extension, validate_upload, TrackId, TrackRecord};
