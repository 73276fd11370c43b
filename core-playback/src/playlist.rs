//! Ordered track list and current-selection bookkeeping.
//!
//! [`Playlist`] keeps `current` either `None` or a valid index at all times.
//! It knows nothing about the media element; the controller turns index
//! changes into loads.

use crate::error::{PlaybackError, Result};
use crate::track::{TrackId, TrackRecord};

/// Result of removing one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub track: TrackRecord,
    /// The removed entry was the current selection.
    pub was_current: bool,
}

#[derive(Debug, Default, Clone)]
pub struct Playlist {
    tracks: Vec<TrackRecord>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&TrackRecord> {
        self.tracks.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&TrackRecord> {
        self.current.and_then(|index| self.tracks.get(index))
    }

    pub fn current_id(&self) -> Option<TrackId> {
        self.current().map(|track| track.id)
    }

    /// Appends a track and returns its index. Selection is unchanged.
    pub fn push(&mut self, track: TrackRecord) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    /// Makes `index` the current selection.
    pub fn select(&mut self, index: usize) -> Result<&TrackRecord> {
        let len = self.tracks.len();
        match self.tracks.get(index) {
            Some(track) => {
                self.current = Some(index);
                Ok(track)
            }
            None => Err(PlaybackError::IndexOutOfRange { index, len }),
        }
    }

    /// Index after the current one, wrapping. With nothing selected this is 0.
    pub fn next_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        Some(match self.current {
            Some(i) => (i + 1) % self.tracks.len(),
            None => 0,
        })
    }

    /// Index before the current one, wrapping. With nothing selected this is
    /// the last entry.
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some(match self.current {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        })
    }

    /// Removes the entry at `index`, keeping the selection pointed at the
    /// same logical track where possible.
    ///
    /// - Removing the current entry selects whatever shifted into its slot,
    ///   clamped to the new last index, or clears the selection when the list
    ///   becomes empty.
    /// - Removing an entry before the current one shifts the selection down
    ///   by one.
    pub fn remove(&mut self, index: usize) -> Option<Removal> {
        if index >= self.tracks.len() {
            return None;
        }
        let track = self.tracks.remove(index);
        let was_current = self.current == Some(index);

        self.current = match self.current {
            _ if self.tracks.is_empty() => None,
            Some(current) if current == index => Some(index.min(self.tracks.len() - 1)),
            Some(current) if current > index => Some(current - 1),
            other => other,
        };

        Some(Removal { track, was_current })
    }
}
