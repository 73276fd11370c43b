//! Playlist entries and upload validation.

use crate::error::{PlaybackError, Result};
use bridge_traits::storage::{ResourceLocator, UploadedFile};
use core_runtime::config::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declared media types that say nothing about the content.
const UNTRUSTWORTHY_TYPES: &[&str] = &["", "application/octet-stream", "binary/octet-stream"];

/// Stable identity of a playlist entry, independent of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One uploaded, validated audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub id: TrackId,
    /// Original file name.
    pub name: String,
    /// Playable reference to the file bytes.
    pub url: ResourceLocator,
    /// Size in bytes.
    pub size: u64,
    pub mime_type: String,
}

impl TrackRecord {
    pub fn new(
        name: impl Into<String>,
        url: ResourceLocator,
        size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            url,
            size,
            mime_type: mime_type.into(),
        }
    }

    /// File name without its final extension.
    ///
    /// Names with nothing before the last dot (`.mp3`) are shown as-is.
    pub fn title(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }

    /// Size in megabytes with two decimals, e.g. `"2.00 MB"`.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size as f64 / (1024.0 * 1024.0))
    }
}

/// Media type implied by a lowercase extension.
pub fn mime_for_extension(extension: &str) -> String {
    match extension {
        "mp3" => "audio/mpeg".to_string(),
        "wav" => "audio/wav".to_string(),
        "ogg" => "audio/ogg".to_string(),
        "m4a" => "audio/mp4".to_string(),
        "aac" => "audio/aac".to_string(),
        "flac" => "audio/flac".to_string(),
        "webm" => "audio/webm".to_string(),
        other => format!("audio/{other}"),
    }
}

fn is_untrustworthy(declared_type: &str) -> bool {
    let declared = declared_type.trim();
    UNTRUSTWORTHY_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(declared))
}

/// Checks one uploaded file and returns the media type to play it as.
///
/// A file is audio when its declared type starts with `audio/`, or when the
/// declared type is uninformative and the extension is on the allow-list.
/// The type check runs before the size check.
pub fn validate_upload(file: &UploadedFile, config: &PlayerConfig) -> Result<String> {
    let declared = file.declared_type.trim();
    let mime_type = if declared.to_ascii_lowercase().starts_with("audio/") {
        declared.to_string()
    } else {
        match file.extension() {
            Some(ext) if is_untrustworthy(declared) && config.allows_extension(&ext) => {
                mime_for_extension(&ext)
            }
            _ => {
                return Err(PlaybackError::NotAudio {
                    file_name: file.name.clone(),
                    declared_type: file.declared_type.clone(),
                })
            }
        }
    };

    if file.size > config.max_upload_bytes {
        return Err(PlaybackError::FileTooLarge {
            file_name: file.name.clone(),
            size: file.size,
            limit: config.max_upload_bytes,
        });
    }

    Ok(mime_type)
}
