//! # Event Bus System
//!
//! Typed events published by the player and the offline cache worker over a
//! `tokio::sync::broadcast` channel.
//!
//! ## Overview
//!
//! The bus is optional for every producer: the controller and the worker emit
//! only when one was attached with `with_event_bus`. Hosts subscribe to drive
//! analytics, debug panels or tests. Emitting with no subscribers is not an
//! error for producers; they ignore the `SendError`.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, SleepTimerEvent};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut stream = bus.subscribe();
//!
//! bus.emit(CoreEvent::SleepTimer(SleepTimerEvent::Expired)).ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event, CoreEvent::SleepTimer(SleepTimerEvent::Expired));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events; it can keep
//!   receiving.
//! - **`RecvError::Closed`**: every sender was dropped.

use bridge_traits::playback::MediaErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

pub use crate::config::DEFAULT_EVENT_BUFFER_SIZE;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Playlist and transport events
    Player(PlayerEvent),
    /// Sleep-timer events
    SleepTimer(SleepTimerEvent),
    /// Offline cache worker events
    Offline(OfflineEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Player(e) => e.description(),
            CoreEvent::SleepTimer(e) => e.description(),
            CoreEvent::Offline(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Player(PlayerEvent::MediaError { .. }) => EventSeverity::Error,
            CoreEvent::Offline(OfflineEvent::InstallFailed { .. }) => EventSeverity::Error,
            CoreEvent::Player(PlayerEvent::UploadRejected { .. }) => EventSeverity::Warning,
            CoreEvent::Player(PlayerEvent::PlaybackBlocked { .. }) => EventSeverity::Warning,
            CoreEvent::Offline(OfflineEvent::FallbackServed { .. }) => EventSeverity::Warning,
            CoreEvent::SleepTimer(SleepTimerEvent::Expired) => EventSeverity::Info,
            CoreEvent::Offline(OfflineEvent::Installed { .. })
            | CoreEvent::Offline(OfflineEvent::Activated { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

impl fmt::Display for CoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Player Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A validated file was appended to the playlist.
    TrackAdded {
        track_id: String,
        name: String,
        index: usize,
    },
    /// A file was refused during upload.
    UploadRejected { file_name: String, reason: String },
    /// The media element was pointed at a track.
    TrackLoaded { track_id: String, index: usize },
    /// Playback started or resumed.
    PlaybackStarted { track_id: String },
    /// Playback paused or stopped.
    PlaybackPaused { track_id: String },
    /// The host refused autonomous playback.
    PlaybackBlocked { track_id: String },
    /// A track left the playlist.
    TrackRemoved { track_id: String, index: usize },
    /// The last track left the playlist.
    PlaylistCleared,
    /// The active track failed to load or play.
    MediaError {
        track_id: Option<String>,
        kind: MediaErrorKind,
    },
}

impl PlayerEvent {
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::TrackAdded { .. } => "Track added to playlist",
            PlayerEvent::UploadRejected { .. } => "Upload rejected",
            PlayerEvent::TrackLoaded { .. } => "Track loaded",
            PlayerEvent::PlaybackStarted { .. } => "Playback started",
            PlayerEvent::PlaybackPaused { .. } => "Playback paused",
            PlayerEvent::PlaybackBlocked { .. } => "Playback blocked by host",
            PlayerEvent::TrackRemoved { .. } => "Track removed from playlist",
            PlayerEvent::PlaylistCleared => "Playlist cleared",
            PlayerEvent::MediaError { .. } => "Media error",
        }
    }
}

// ============================================================================
// Sleep Timer Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SleepTimerEvent {
    /// A countdown started, replacing any earlier one.
    Started { seconds: u32 },
    /// The countdown reached zero.
    Expired,
}

impl SleepTimerEvent {
    pub fn description(&self) -> &str {
        match self {
            SleepTimerEvent::Started { .. } => "Sleep timer started",
            SleepTimerEvent::Expired => "Sleep timer expired",
        }
    }
}

// ============================================================================
// Offline Cache Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OfflineEvent {
    /// Every listed asset was stored.
    Installed { store: String, assets: usize },
    /// Install did not complete; the version is not cache-ready.
    InstallFailed { store: String, reason: String },
    /// Stale stores were purged and clients claimed.
    Activated { store: String, purged: Vec<String> },
    /// A request was answered from the store.
    ServedFromCache { url: String },
    /// A navigation failed and the offline document was served.
    FallbackServed { url: String },
}

impl OfflineEvent {
    pub fn description(&self) -> &str {
        match self {
            OfflineEvent::Installed { .. } => "Offline cache installed",
            OfflineEvent::InstallFailed { .. } => "Offline cache install failed",
            OfflineEvent::Activated { .. } => "Offline cache activated",
            OfflineEvent::ServedFromCache { .. } => "Served from offline cache",
            OfflineEvent::FallbackServed { .. } => "Served offline fallback page",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel for [`CoreEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus; `capacity` bounds how far a subscriber may
    /// fall behind before it sees `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
