//! # Player Controller
//!
//! Owns the playlist, the current selection, the playing flag and the sleep
//! timer for one page session, and mediates between UI intents and the host
//! media element.
//!
//! ## Overview
//!
//! Every public operation mutates in-memory state, then re-renders the view
//! before returning, so whatever the user sees is never behind the playlist.
//! Suspension only happens at host boundaries: binding uploaded bytes and
//! asking the media element to play.
//!
//! Failures are never fatal. Rejected uploads are reported per file; play
//! refusals and media errors leave the controller paused with a consistent
//! selection. Anything that needs a delay (ticking the sleep timer, skipping
//! past a broken track) is driven from outside through
//! [`PlayerController::tick_sleep_timer`] and
//! [`PlayerController::skip_failed_track`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut player = PlayerController::new(config, media, binder, notifier)
//!     .with_renderer(renderer);
//!
//! let report = player.upload(files).await;
//! player.toggle_play_pause().await;
//! let generation = player.start_sleep_timer("30")?;
//! ```

use crate::error::{PlaybackError, Result};
use crate::playlist::Playlist;
use crate::sleep_timer::{parse_minutes, SleepTimer, TimerGeneration, TimerTick};
use crate::track::{validate_upload, TrackId, TrackRecord};
use crate::view::{build_view, ViewInputs};
use bridge_traits::playback::{MediaElement, MediaErrorKind, PlayError};
use bridge_traits::storage::{ResourceBinder, UploadedFile};
use bridge_traits::ui::{Notice, Notifier, PlayerView, ViewRenderer};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{CoreEvent, EventBus, PlayerEvent, SleepTimerEvent};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Observable player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    pub current_index: Option<usize>,
    pub is_playing: bool,
    /// `None` when no countdown is running.
    pub timer_seconds_remaining: Option<u32>,
}

/// A file that was skipped during upload.
#[derive(Debug)]
pub struct UploadRejection {
    pub file_name: String,
    pub error: PlaybackError,
}

/// Outcome of one upload batch.
#[derive(Debug, Default)]
pub struct UploadReport {
    /// Playlist indices of the accepted files, in input order.
    pub accepted: Vec<usize>,
    pub rejected: Vec<UploadRejection>,
}

/// Pending skip past a track that failed to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorSkip {
    pub track_id: TrackId,
    /// Playback was active when the error struck.
    pub resume: bool,
}

/// Per-session playlist/transport controller.
pub struct PlayerController {
    config: PlayerConfig,
    playlist: Playlist,
    is_playing: bool,
    timer: SleepTimer,
    position: Duration,
    duration: Option<Duration>,
    media: Arc<dyn MediaElement>,
    binder: Arc<dyn ResourceBinder>,
    notifier: Arc<dyn Notifier>,
    renderer: Option<Arc<dyn ViewRenderer>>,
    event_bus: Option<EventBus>,
}

impl PlayerController {
    pub fn new(
        config: PlayerConfig,
        media: Arc<dyn MediaElement>,
        binder: Arc<dyn ResourceBinder>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            playlist: Playlist::new(),
            is_playing: false,
            timer: SleepTimer::new(),
            position: Duration::ZERO,
            duration: None,
            media,
            binder,
            notifier,
            renderer: None,
            event_bus: None,
        }
    }

    /// Attaches a renderer and draws the initial view.
    pub fn with_renderer(mut self, renderer: Arc<dyn ViewRenderer>) -> Self {
        self.renderer = Some(renderer);
        self.refresh();
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn state(&self) -> PlayerState {
        PlayerState {
            current_index: self.playlist.current_index(),
            is_playing: self.is_playing,
            timer_seconds_remaining: self.timer.remaining(),
        }
    }

    pub fn timer_display(&self) -> String {
        self.timer.display()
    }

    /// Current view model.
    pub fn view(&self) -> PlayerView {
        build_view(ViewInputs {
            playlist: &self.playlist,
            is_playing: self.is_playing,
            position: self.position,
            duration: self.duration,
            timer: &self.timer,
        })
    }

    // ========================================================================
    // Upload
    // ========================================================================

    /// Validates, binds and appends each file independently.
    ///
    /// If nothing was selected before the batch, the first playlist entry is
    /// loaded once at least one file has been accepted.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload(&mut self, files: Vec<UploadedFile>) -> UploadReport {
        let mut report = UploadReport::default();

        for file in files {
            match self.accept_file(&file).await {
                Ok(index) => report.accepted.push(index),
                Err(error) => {
                    warn!(file = %file.name, %error, "Upload rejected");
                    self.notifier.notify(Notice::error(error.user_message()));
                    self.emit(PlayerEvent::UploadRejected {
                        file_name: file.name.clone(),
                        reason: error.to_string(),
                    });
                    report.rejected.push(UploadRejection {
                        file_name: file.name,
                        error,
                    });
                }
            }
        }

        if self.playlist.current_index().is_none() && !self.playlist.is_empty() {
            self.load_track(0).await;
        }

        info!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            "Upload batch processed"
        );
        report
    }

    async fn accept_file(&mut self, file: &UploadedFile) -> Result<usize> {
        let mime_type = validate_upload(file, &self.config)?;
        let url = self
            .binder
            .bind(file, &mime_type)
            .await
            .map_err(|err| PlaybackError::FileUnreadable {
                file_name: file.name.clone(),
                reason: err.to_string(),
            })?;

        let track = TrackRecord::new(file.name.clone(), url, file.size, mime_type);
        let track_id = track.id;
        let index = self.playlist.push(track);
        debug!(file = %file.name, index, "Track added");
        self.emit(PlayerEvent::TrackAdded {
            track_id: track_id.to_string(),
            name: file.name.clone(),
            index,
        });
        self.refresh();
        Ok(index)
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Points the media element at `index`, keeping the play/pause state.
    ///
    /// Returns `false` (and changes nothing) when `index` is out of range.
    #[instrument(skip(self))]
    pub async fn load_track(&mut self, index: usize) -> bool {
        let track = match self.playlist.select(index) {
            Ok(track) => track.clone(),
            Err(error) => {
                debug!(%error, "Ignoring load of missing track");
                return false;
            }
        };

        self.media.set_source(Some(&track.url));
        self.position = Duration::ZERO;
        self.duration = None;
        self.emit(PlayerEvent::TrackLoaded {
            track_id: track.id.to_string(),
            index,
        });
        self.refresh();

        if self.is_playing {
            self.start_playback(true).await;
        }
        true
    }

    /// Selecting a playlist row.
    pub async fn select_track(&mut self, index: usize) -> bool {
        self.load_track(index).await
    }

    pub async fn toggle_play_pause(&mut self) {
        if self.playlist.is_empty() {
            self.notifier
                .notify(Notice::warning(PlaybackError::EmptyPlaylist.user_message()));
            return;
        }

        if self.playlist.current_index().is_none() {
            self.load_track(0).await;
        }

        if self.is_playing {
            self.pause();
        } else {
            self.start_playback(false).await;
        }
    }

    /// Pauses playback if it is active.
    pub fn pause(&mut self) {
        self.media.pause();
        if self.is_playing {
            self.is_playing = false;
            if let Some(id) = self.playlist.current_id() {
                self.emit(PlayerEvent::PlaybackPaused {
                    track_id: id.to_string(),
                });
            }
        }
        self.refresh();
    }

    pub async fn next(&mut self) {
        if let Some(index) = self.playlist.next_index() {
            self.load_track(index).await;
        }
    }

    pub async fn previous(&mut self) {
        if let Some(index) = self.playlist.previous_index() {
            self.load_track(index).await;
        }
    }

    /// Removes the entry at `index` and releases its resource binding.
    ///
    /// Removing the current entry stops playback and loads whatever took its
    /// slot, or clears the player when the playlist is now empty.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, index: usize) -> Option<TrackRecord> {
        let removal = self.playlist.remove(index)?;
        self.binder.release(&removal.track.url);
        self.emit(PlayerEvent::TrackRemoved {
            track_id: removal.track.id.to_string(),
            index,
        });
        debug!(file = %removal.track.name, index, "Track removed");

        if removal.was_current {
            self.pause();
        }

        match self.playlist.current_index() {
            Some(slot) if removal.was_current => {
                self.load_track(slot).await;
            }
            None if self.playlist.is_empty() => {
                self.media.pause();
                self.media.set_source(None);
                self.is_playing = false;
                self.position = Duration::ZERO;
                self.duration = None;
                self.emit(PlayerEvent::PlaylistCleared);
            }
            _ => {}
        }

        self.refresh();
        Some(removal.track)
    }

    /// Moves the playback point to `percent` (0 to 100) of the duration.
    ///
    /// Returns `false` while the duration is unknown.
    pub fn seek(&mut self, percent: f64) -> bool {
        if percent.is_nan() || self.playlist.current().is_none() {
            return false;
        }
        let Some(duration) = self.media.duration() else {
            return false;
        };
        let target = duration.mul_f64(percent.clamp(0.0, 100.0) / 100.0);
        self.media.seek(target);
        self.position = target;
        self.duration = Some(duration);
        self.refresh();
        true
    }

    async fn start_playback(&mut self, autonomous: bool) {
        let Some(track_id) = self.playlist.current_id() else {
            return;
        };

        match self.media.play().await {
            Ok(()) => {
                self.is_playing = true;
                self.emit(PlayerEvent::PlaybackStarted {
                    track_id: track_id.to_string(),
                });
            }
            Err(PlayError::Blocked(reason)) if autonomous => {
                info!(%reason, "Host refused autonomous playback; staying paused");
                self.is_playing = false;
                self.emit(PlayerEvent::PlaybackBlocked {
                    track_id: track_id.to_string(),
                });
            }
            Err(err) => {
                warn!(error = %err, "Play attempt failed");
                self.is_playing = false;
                let error = match err {
                    PlayError::Blocked(reason) => {
                        self.emit(PlayerEvent::PlaybackBlocked {
                            track_id: track_id.to_string(),
                        });
                        PlaybackError::PlaybackBlocked(reason)
                    }
                    PlayError::Failed(reason) => PlaybackError::PlaybackFailed(reason),
                };
                self.notifier.notify(Notice::error(error.user_message()));
            }
        }
        self.refresh();
    }

    // ========================================================================
    // Media Signals
    // ========================================================================

    /// The active track played to the end.
    pub async fn on_media_ended(&mut self) {
        self.next().await;
    }

    /// The active track failed to load or decode.
    ///
    /// Reports the category-specific message and pauses. The returned
    /// [`ErrorSkip`] should be handed to [`Self::skip_failed_track`] after the
    /// configured delay. Errors with nothing selected (such as the one fired
    /// when the source is cleared) are ignored.
    pub fn on_media_error(&mut self, kind: MediaErrorKind) -> Option<ErrorSkip> {
        let track = self.playlist.current()?.clone();
        let resume = self.is_playing;

        let error = PlaybackError::Media {
            file_name: track.name.clone(),
            kind,
        };
        warn!(file = %track.name, ?kind, "Media error on active track");
        self.notifier.notify(Notice::error(error.user_message()));
        self.emit(PlayerEvent::MediaError {
            track_id: Some(track.id.to_string()),
            kind,
        });
        self.pause();

        Some(ErrorSkip {
            track_id: track.id,
            resume,
        })
    }

    /// Advances past a failed track.
    ///
    /// Does nothing unless the failed track is still current and there is
    /// somewhere else to go. Returns whether a skip happened.
    pub async fn skip_failed_track(&mut self, skip: ErrorSkip) -> bool {
        if self.playlist.current_id() != Some(skip.track_id) || self.playlist.len() < 2 {
            debug!("Skip no longer applicable");
            return false;
        }
        self.is_playing = skip.resume;
        self.next().await;
        true
    }

    pub fn on_time_update(&mut self) {
        self.position = self.media.current_time();
        self.duration = self.media.duration();
        self.refresh();
    }

    pub fn on_loaded_metadata(&mut self) {
        self.duration = self.media.duration();
        self.refresh();
    }

    // ========================================================================
    // Sleep Timer
    // ========================================================================

    /// Starts a countdown from user input, replacing any running one.
    ///
    /// The caller ticks the returned generation once per second.
    pub fn start_sleep_timer(&mut self, input: &str) -> Result<TimerGeneration> {
        let started = parse_minutes(input).and_then(|minutes| self.timer.start(minutes));
        let generation = match started {
            Ok(generation) => generation,
            Err(error) => {
                self.notifier.notify(Notice::error(error.user_message()));
                return Err(error);
            }
        };

        let seconds = self.timer.remaining().unwrap_or_default();
        info!(seconds, "Sleep timer started");
        self.emit_timer(SleepTimerEvent::Started { seconds });
        self.refresh();
        Ok(generation)
    }

    /// One second elapsed for countdown `generation`.
    ///
    /// Returns `None` for a superseded or finished countdown, which tells the
    /// ticking task to stop.
    pub fn tick_sleep_timer(&mut self, generation: TimerGeneration) -> Option<TimerTick> {
        let tick = self.timer.tick(generation)?;
        if tick == TimerTick::Expired {
            info!("Sleep timer expired");
            if self.is_playing {
                self.pause();
            }
            self.emit_timer(SleepTimerEvent::Expired);
        }
        self.refresh();
        Some(tick)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn refresh(&self) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&self.view());
        }
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Player(event)).ok();
        }
    }

    fn emit_timer(&self, event: SleepTimerEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::SleepTimer(event)).ok();
        }
    }
}
