//! # Playback Error Types
//!
//! Errors raised by the playlist/transport controller. None of them is fatal:
//! each one is reported to the user and the controller falls back to a
//! narrower but consistent state.

use bridge_traits::{error::BridgeError, playback::MediaErrorKind};
use thiserror::Error;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Errors that can occur during playlist and playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Upload Errors
    // ========================================================================
    /// The file is neither declared as audio nor carries an accepted extension.
    #[error("{file_name} is not a valid audio file")]
    NotAudio {
        file_name: String,
        declared_type: String,
    },

    /// The file exceeds the upload ceiling.
    #[error(
        "{} is too large ({:.2} MB); the limit is {:.0} MB",
        .file_name,
        megabytes(*.size),
        megabytes(*.limit)
    )]
    FileTooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },

    /// The file's bytes could not be made playable.
    #[error("Could not read {file_name}: {reason}")]
    FileUnreadable { file_name: String, reason: String },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// A transport control was used before anything was uploaded.
    #[error("Please upload audio files first")]
    EmptyPlaylist,

    /// A playlist index outside `0..len`.
    #[error("Track index {index} is out of range (playlist has {len} tracks)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The host refused to start playback without a user gesture.
    #[error("Playback was blocked by the browser: {0}")]
    PlaybackBlocked(String),

    /// Playback could not start.
    #[error("Could not start playback: {0}")]
    PlaybackFailed(String),

    /// The active track failed to load or decode.
    #[error("Error playing {file_name}: {}", .kind.description())]
    Media {
        file_name: String,
        kind: MediaErrorKind,
    },

    // ========================================================================
    // Sleep Timer Errors
    // ========================================================================
    /// Sleep-timer input is not a positive whole number of minutes.
    #[error("Invalid sleep timer value {0:?}: enter a whole number of minutes greater than zero")]
    InvalidTimerInput(String),

    // ========================================================================
    // Bridge Errors
    // ========================================================================
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    /// Returns `true` for per-file validation failures (type, size).
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::NotAudio { .. } | PlaybackError::FileTooLarge { .. }
        )
    }

    /// Returns `true` for any reason a file was skipped during upload.
    pub fn is_upload_error(&self) -> bool {
        self.is_validation_error() || matches!(self, PlaybackError::FileUnreadable { .. })
    }

    /// Returns `true` for failures while starting or sustaining playback.
    pub fn is_playback_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::PlaybackBlocked(_)
                | PlaybackError::PlaybackFailed(_)
                | PlaybackError::Media { .. }
        )
    }

    /// Text shown to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_quotes_size_and_limit() {
        let err = PlaybackError::FileTooLarge {
            file_name: "concert.flac".to_string(),
            size: 150 * 1024 * 1024,
            limit: 100 * 1024 * 1024,
        };
        assert_eq!(
            err.user_message(),
            "concert.flac is too large (150.00 MB); the limit is 100 MB"
        );
        assert!(err.is_validation_error());
        assert!(err.is_upload_error());
        assert!(!err.is_playback_error());
    }

    #[test]
    fn media_message_is_category_specific() {
        let decode = PlaybackError::Media {
            file_name: "broken.mp3".to_string(),
            kind: MediaErrorKind::Decode,
        };
        let network = PlaybackError::Media {
            file_name: "broken.mp3".to_string(),
            kind: MediaErrorKind::Network,
        };
        assert!(decode.user_message().starts_with("Error playing broken.mp3: "));
        assert_ne!(decode.user_message(), network.user_message());
        assert!(decode.is_playback_error());
    }

    #[test]
    fn unreadable_is_upload_but_not_validation() {
        let err = PlaybackError::FileUnreadable {
            file_name: "a.mp3".to_string(),
            reason: "read aborted".to_string(),
        };
        assert!(err.is_upload_error());
        assert!(!err.is_validation_error());
    }
}
