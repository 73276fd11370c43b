//! User-facing surface: notices and view snapshots.
//!
//! The core renders by handing a complete [`PlayerView`] to the host after
//! every state change. The host decides how to draw it; the snapshot is the
//! only thing it needs.

use crate::platform::PlatformSendSync;
use serde::{Deserialize, Serialize};

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Shows notices to the user (alert, toast, status line).
pub trait Notifier: PlatformSendSync {
    fn notify(&self, notice: Notice);
}

/// One entry of the rendered playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRow {
    /// Position in the playlist; used for click and remove controls.
    pub index: usize,
    /// File name without extension.
    pub title: String,
    /// Full file name.
    pub file_name: String,
    /// Size in megabytes, e.g. `2.00 MB`.
    pub size_label: String,
    /// Whether this row is the current selection.
    pub active: bool,
}

/// Complete snapshot of what the player shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Now-playing title (file name without extension).
    pub title: String,
    /// Now-playing subtitle (size in MB).
    pub subtitle: String,
    /// Now-playing full file name.
    pub file_name: String,
    pub is_playing: bool,
    pub current_index: Option<usize>,
    pub rows: Vec<PlaylistRow>,
    /// Placeholder shown instead of rows when the playlist is empty.
    pub empty_message: Option<String>,
    /// Elapsed time as `M:SS`.
    pub position_label: String,
    /// Total time as `M:SS`.
    pub duration_label: String,
    /// Seek slider position in `0..=100`.
    pub progress_percent: f64,
    /// Sleep-timer countdown as `MM:SS`.
    pub timer_display: String,
    /// Whether the sleep timer has run out.
    pub timer_expired: bool,
    /// Terminal sleep-timer label, present once expired.
    pub timer_label: Option<String>,
}

/// Draws view snapshots.
pub trait ViewRenderer: PlatformSendSync {
    fn render(&self, view: &PlayerView);
}
