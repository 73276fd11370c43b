//! Typed UI and media signals.
//!
//! Hosts translate raw DOM events into these values; the service never sees
//! host event objects.

use bridge_traits::playback::MediaErrorKind;
use bridge_traits::storage::UploadedFile;
use serde::{Deserialize, Serialize};

/// User intents from the page.
#[derive(Debug, Clone)]
pub enum UiEvent {
    PlayPause,
    Next,
    Previous,
    /// Seek slider moved, 0 to 100.
    Seek(f64),
    /// Start pressed with the raw timer input.
    StartTimer(String),
    FilesSelected(Vec<UploadedFile>),
    FilesDropped(Vec<UploadedFile>),
    TrackClicked(usize),
    RemoveClicked(usize),
    Key(KeyInput),
    InstallClicked,
}

/// Signals from the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Ended,
    Error(MediaErrorKind),
    TimeUpdate,
    LoadedMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    Space,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl KeyCode {
    /// Maps a DOM `KeyboardEvent.code` value.
    pub fn from_dom(code: &str) -> Self {
        match code {
            "Space" => KeyCode::Space,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            other => KeyCode::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub code: KeyCode,
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    /// Focus is inside the sleep-timer input.
    pub in_timer_input: bool,
}

impl KeyInput {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            meta: false,
            in_timer_input: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn in_timer_input(mut self) -> Self {
        self.in_timer_input = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    TogglePlayPause,
    Previous,
    Next,
}

/// Resolves a key press to a shortcut.
///
/// Nothing fires while the timer input has focus, so typing there behaves
/// normally.
pub fn shortcut_for(key: &KeyInput) -> Option<KeyAction> {
    if key.in_timer_input {
        return None;
    }
    let modifier = key.ctrl || key.meta;
    match key.code {
        KeyCode::Space => Some(KeyAction::TogglePlayPause),
        KeyCode::ArrowLeft if modifier => Some(KeyAction::Previous),
        KeyCode::ArrowRight if modifier => Some(KeyAction::Next),
        _ => None,
    }
}
