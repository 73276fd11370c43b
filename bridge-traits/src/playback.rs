//! Media element bridge and supporting playback types.
//!
//! The host owns the actual audio engine (an `<audio>` element in the browser).
//! The core drives it through [`MediaElement`] and receives its asynchronous
//! signals (ended, error, time updates) as plain method calls on the
//! controller, so there is no callback registration at this layer.

use crate::{platform::PlatformSendSync, storage::ResourceLocator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Outcome of a refused or failed playback attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    /// The host refused to start playback on its own, typically an autoplay
    /// policy that requires a fresh user gesture.
    #[error("Playback blocked by host policy: {0}")]
    Blocked(String),

    /// Playback could not start for any other reason.
    #[error("Playback failed: {0}")]
    Failed(String),
}

impl PlayError {
    /// Returns `true` if the host refused autonomous playback.
    pub fn is_policy_block(&self) -> bool {
        matches!(self, PlayError::Blocked(_))
    }
}

/// Category of a media error reported by the host while loading or playing
/// the active resource.
///
/// Mirrors the four standard media error codes; anything else maps to
/// [`MediaErrorKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaErrorKind {
    /// Fetching the resource was aborted.
    Aborted,
    /// A network error interrupted loading.
    Network,
    /// The resource could not be decoded.
    Decode,
    /// The resource format is not supported.
    SourceNotSupported,
    /// The host reported an error without a known category.
    Unknown,
}

impl MediaErrorKind {
    /// Map a standard media error code (`1..=4`) to its category.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => MediaErrorKind::Aborted,
            2 => MediaErrorKind::Network,
            3 => MediaErrorKind::Decode,
            4 => MediaErrorKind::SourceNotSupported,
            _ => MediaErrorKind::Unknown,
        }
    }

    /// User-facing explanation for this category.
    pub fn description(&self) -> &'static str {
        match self {
            MediaErrorKind::Aborted => "Loading of the audio file was aborted",
            MediaErrorKind::Network => "A network error interrupted loading of the audio file",
            MediaErrorKind::Decode => "The audio file is corrupted or could not be decoded",
            MediaErrorKind::SourceNotSupported => "This audio format is not supported",
            MediaErrorKind::Unknown => "An unknown error occurred while playing the audio file",
        }
    }
}

/// Trait for the host audio element.
///
/// Source changes, pause and seek are synchronous on every host; only `play`
/// resolves later because hosts may refuse it.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait MediaElement: PlatformSendSync {
    /// Point the element at `locator` and reset it to the start. `None`
    /// detaches the current resource.
    fn set_source(&self, locator: Option<&ResourceLocator>);

    /// Start or resume playback of the current source.
    async fn play(&self) -> Result<(), PlayError>;

    /// Pause playback, keeping the position.
    fn pause(&self);

    /// Total duration, or `None` while metadata is pending or unknown.
    fn duration(&self) -> Option<Duration>;

    /// Current playback position.
    fn current_time(&self) -> Duration;

    /// Move the playback position.
    fn seek(&self, position: Duration);
}
