//! Uploaded files and resource binding.
//!
//! A [`ResourceBinder`] turns the bytes of an uploaded file into a locator the
//! media element can play. Depending on the binder the locator is either a
//! transient, session-scoped reference that must be released, or a
//! self-contained encoding that needs no release at all.

use crate::{error::Result, platform::PlatformSendSync};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A file handed over by the host from the file picker or a drop.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name including extension.
    pub name: String,
    /// Media type declared by the host; may be empty.
    pub declared_type: String,
    /// Size in bytes as reported by the host.
    pub size: u64,
    /// File contents.
    pub data: Bytes,
}

impl UploadedFile {
    /// Construct an uploaded file; `size` is taken from `data`.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size: data.len() as u64,
            data,
        }
    }

    /// Override the reported size (hosts report it before reading contents).
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Lowercased extension after the last `.`, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Playable resource locator (object URL, data URL, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binds uploaded bytes to a playable locator.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ResourceBinder: PlatformSendSync {
    /// Produce a locator for `file`. `mime_type` is the resolved media type
    /// the resource should be tagged with.
    async fn bind(&self, file: &UploadedFile, mime_type: &str) -> Result<ResourceLocator>;

    /// Release a locator previously returned by [`bind`](Self::bind). Called
    /// exactly once per locator, when its track leaves the playlist.
    fn release(&self, locator: &ResourceLocator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let file = UploadedFile::new("Song.MP3", "", Bytes::new());
        assert_eq!(file.extension().as_deref(), Some("mp3"));
    }

    #[test]
    fn extension_requires_stem_and_suffix() {
        assert_eq!(UploadedFile::new(".hidden", "", Bytes::new()).extension(), None);
        assert_eq!(UploadedFile::new("trailing.", "", Bytes::new()).extension(), None);
        assert_eq!(UploadedFile::new("noext", "", Bytes::new()).extension(), None);
    }

    #[test]
    fn size_defaults_to_data_length() {
        let file = UploadedFile::new("a.wav", "audio/wav", Bytes::from_static(b"abcd"));
        assert_eq!(file.size, 4);
        assert_eq!(file.with_size(10).size, 10);
    }
}
