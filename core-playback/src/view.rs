//! View model derivation.

use crate::playlist::Playlist;
use crate::sleep_timer::SleepTimer;
use bridge_traits::ui::{PlayerView, PlaylistRow};
use std::time::Duration;

pub const EMPTY_TITLE: &str = "Select an audio file";
pub const EMPTY_SUBTITLE: &str = "Upload a file to get started";
pub const EMPTY_FILE_NAME: &str = "Select a sound to get started";
pub const EMPTY_PLAYLIST_MESSAGE: &str = "No files loaded";

/// Playback position as `M:SS`.
pub fn format_clock(time: Duration) -> String {
    let total = time.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

/// Countdown as zero-padded `MM:SS`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Playback progress in `0..=100`; zero while the duration is unknown.
pub fn progress_percent(position: Duration, duration: Option<Duration>) -> f64 {
    match duration {
        Some(total) if !total.is_zero() => {
            (position.as_secs_f64() / total.as_secs_f64() * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

pub(crate) struct ViewInputs<'a> {
    pub playlist: &'a Playlist,
    pub is_playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub timer: &'a SleepTimer,
}

pub(crate) fn build_view(inputs: ViewInputs<'_>) -> PlayerView {
    let ViewInputs {
        playlist,
        is_playing,
        position,
        duration,
        timer,
    } = inputs;
    let current = playlist.current_index();

    let rows: Vec<PlaylistRow> = playlist
        .tracks()
        .iter()
        .enumerate()
        .map(|(index, track)| PlaylistRow {
            index,
            title: track.title().to_string(),
            file_name: track.name.clone(),
            size_label: track.size_label(),
            active: current == Some(index),
        })
        .collect();

    let (title, subtitle, file_name) = match playlist.current() {
        Some(track) => (
            track.title().to_string(),
            track.size_label(),
            track.name.clone(),
        ),
        None => (
            EMPTY_TITLE.to_string(),
            EMPTY_SUBTITLE.to_string(),
            EMPTY_FILE_NAME.to_string(),
        ),
    };

    PlayerView {
        title,
        subtitle,
        file_name,
        is_playing,
        current_index: current,
        empty_message: rows
            .is_empty()
            .then(|| EMPTY_PLAYLIST_MESSAGE.to_string()),
        rows,
        position_label: format_clock(position),
        duration_label: format_clock(duration.unwrap_or_default()),
        progress_percent: progress_percent(position, duration),
        timer_display: timer.display(),
        timer_expired: timer.is_expired(),
        timer_label: timer.label().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackRecord;
    use bridge_traits::storage::ResourceLocator;

    #[test]
    fn clock_formats() {
        assert_eq!(format_clock(Duration::ZERO), "0:00");
        assert_eq!(format_clock(Duration::from_secs(75)), "1:15");
        assert_eq!(format_clock(Duration::from_millis(3_599_900)), "59:59");
    }

    #[test]
    fn countdown_is_zero_padded() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(300), "05:00");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(6000), "100:00");
    }

    #[test]
    fn progress_handles_unknown_duration() {
        assert_eq!(progress_percent(Duration::from_secs(5), None), 0.0);
        assert_eq!(progress_percent(Duration::from_secs(5), Some(Duration::ZERO)), 0.0);
        assert_eq!(
            progress_percent(Duration::from_secs(30), Some(Duration::from_secs(120))),
            25.0
        );
    }

    #[test]
    fn empty_view_shows_placeholders() {
        let playlist = Playlist::new();
        let timer = SleepTimer::new();
        let view = build_view(ViewInputs {
            playlist: &playlist,
            is_playing: false,
            position: Duration::ZERO,
            duration: None,
            timer: &timer,
        });
        assert_eq!(view.title, EMPTY_TITLE);
        assert_eq!(view.subtitle, EMPTY_SUBTITLE);
        assert_eq!(view.file_name, EMPTY_FILE_NAME);
        assert_eq!(view.empty_message.as_deref(), Some(EMPTY_PLAYLIST_MESSAGE));
        assert_eq!(view.timer_display, "00:00");
        assert!(view.rows.is_empty());
    }

    #[test]
    fn selected_track_drives_header_and_active_row() {
        let mut playlist = Playlist::new();
        playlist.push(TrackRecord::new(
            "intro.wav",
            ResourceLocator::new("blob:a"),
            1024 * 1024,
            "audio/wav",
        ));
        playlist.push(TrackRecord::new(
            "Rain Sounds.mp3",
            ResourceLocator::new("blob:b"),
            2 * 1024 * 1024,
            "audio/mpeg",
        ));
        playlist.select(1).unwrap();
        let timer = SleepTimer::new();

        let view = build_view(ViewInputs {
            playlist: &playlist,
            is_playing: true,
            position: Duration::from_secs(10),
            duration: Some(Duration::from_secs(40)),
            timer: &timer,
        });

        assert_eq!(view.title, "Rain Sounds");
        assert_eq!(view.subtitle, "2.00 MB");
        assert_eq!(view.file_name, "Rain Sounds.mp3");
        assert_eq!(view.current_index, Some(1));
        assert!(view.rows[1].active);
        assert!(!view.rows[0].active);
        assert_eq!(view.empty_message, None);
        assert_eq!(view.position_label, "0:10");
        assert_eq!(view.duration_label, "0:40");
        assert_eq!(view.progress_percent, 25.0);
    }
}
