//! # Player Service
//!
//! Page-session façade over [`PlayerController`].
//!
//! The controller is a plain state object; this layer shares it between host
//! callbacks, turns [`UiEvent`]s and [`MediaEvent`]s into controller calls,
//! and owns the two background loops the controller cannot run itself:
//!
//! - the once-per-second sleep-timer tick, bound to a timer generation so a
//!   newer countdown retires the older loop at its next tick;
//! - the delayed skip past a track that failed to play.

use crate::error::Result;
use crate::input::{shortcut_for, KeyAction, MediaEvent, UiEvent};
use crate::install::InstallPromptManager;
use bridge_traits::lifecycle::{InstallOutcome, InstallPrompt};
use bridge_traits::playback::MediaElement;
use bridge_traits::storage::{ResourceBinder, UploadedFile};
use bridge_traits::ui::{Notifier, PlayerView, ViewRenderer};
use core_async::sync::Mutex;
use core_async::{sleep, spawn_detached};
use core_playback::{
    ErrorSkip, InlineBinder, PlayerController, PlayerState, TimerGeneration, TimerTick,
    UploadReport,
};
use core_runtime::config::{AppConfig, ResourceBinding};
use core_runtime::events::{CoreEvent, EventBus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const TICK: Duration = Duration::from_secs(1);

/// Host capabilities the player needs.
pub struct PlayerDependencies {
    pub media: Arc<dyn MediaElement>,
    /// Session-scoped binder used for [`ResourceBinding::Transient`]. Hosts
    /// without one fall back to inline binding.
    pub transient_binder: Option<Arc<dyn ResourceBinder>>,
    pub notifier: Arc<dyn Notifier>,
    pub renderer: Option<Arc<dyn ViewRenderer>>,
}

impl PlayerDependencies {
    pub fn new(media: Arc<dyn MediaElement>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            media,
            transient_binder: None,
            notifier,
            renderer: None,
        }
    }

    pub fn with_transient_binder(mut self, binder: Arc<dyn ResourceBinder>) -> Self {
        self.transient_binder = Some(binder);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ViewRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }
}

fn select_binder(
    binding: ResourceBinding,
    transient: Option<Arc<dyn ResourceBinder>>,
) -> Arc<dyn ResourceBinder> {
    match (binding, transient) {
        (ResourceBinding::Transient, Some(binder)) => binder,
        (ResourceBinding::Transient, None) => {
            warn!("No transient resource binder available; inlining uploads");
            Arc::new(InlineBinder::new())
        }
        (ResourceBinding::Inline, _) => Arc::new(InlineBinder::new()),
    }
}

/// Shared handle to one page session's player.
#[derive(Clone)]
pub struct PlayerService {
    controller: Arc<Mutex<PlayerController>>,
    install: Arc<InstallPromptManager>,
    event_bus: EventBus,
    error_skip_delay: Duration,
}

impl PlayerService {
    /// Validates `config` and wires the controller to the host.
    pub fn bootstrap(config: &AppConfig, deps: PlayerDependencies) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(config.event_buffer_size);
        let binder = select_binder(config.player.resource_binding, deps.transient_binder);
        let mut controller =
            PlayerController::new(config.player.clone(), deps.media, binder, deps.notifier)
                .with_event_bus(event_bus.clone());
        if let Some(renderer) = deps.renderer {
            controller = controller.with_renderer(renderer);
        }

        info!(
            binding = ?config.player.resource_binding,
            max_upload_mb = config.player.max_upload_mb(),
            "Player service ready"
        );
        Ok(Self {
            controller: Arc::new(Mutex::new(controller)),
            install: Arc::new(InstallPromptManager::new()),
            event_bus,
            error_skip_delay: config.player.error_skip_delay(),
        })
    }

    /// Subscribes to player and sleep-timer events.
    pub fn subscribe(&self) -> core_runtime::events::Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }

    pub async fn state(&self) -> PlayerState {
        self.controller.lock().await.state()
    }

    pub async fn view(&self) -> PlayerView {
        self.controller.lock().await.view()
    }

    pub fn install_prompt(&self) -> &InstallPromptManager {
        &self.install
    }

    /// The host deferred its own install prompt.
    pub fn on_install_prompt_available(&self, prompt: Arc<dyn InstallPrompt>) {
        self.install.on_prompt_available(prompt);
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Handles one UI event.
    ///
    /// Returns `true` when the event was acted on. For key presses this
    /// tells the host whether to suppress the browser default.
    pub async fn dispatch(&self, event: UiEvent) -> bool {
        match event {
            UiEvent::PlayPause => self.controller.lock().await.toggle_play_pause().await,
            UiEvent::Next => self.controller.lock().await.next().await,
            UiEvent::Previous => self.controller.lock().await.previous().await,
            UiEvent::Seek(percent) => return self.controller.lock().await.seek(percent),
            UiEvent::StartTimer(input) => return self.start_sleep_timer(&input).await.is_ok(),
            UiEvent::FilesSelected(files) | UiEvent::FilesDropped(files) => {
                self.upload(files).await;
            }
            UiEvent::TrackClicked(index) => {
                return self.controller.lock().await.select_track(index).await
            }
            UiEvent::RemoveClicked(index) => {
                return self.controller.lock().await.remove(index).await.is_some()
            }
            UiEvent::Key(key) => {
                let Some(action) = shortcut_for(&key) else {
                    return false;
                };
                debug!(?action, "Keyboard shortcut");
                let mut controller = self.controller.lock().await;
                match action {
                    KeyAction::TogglePlayPause => controller.toggle_play_pause().await,
                    KeyAction::Previous => controller.previous().await,
                    KeyAction::Next => controller.next().await,
                }
            }
            UiEvent::InstallClicked => return self.prompt_install().await.is_some(),
        }
        true
    }

    /// Handles one media element signal.
    pub async fn handle_media(&self, event: MediaEvent) {
        match event {
            MediaEvent::Ended => self.controller.lock().await.on_media_ended().await,
            MediaEvent::TimeUpdate => self.controller.lock().await.on_time_update(),
            MediaEvent::LoadedMetadata => self.controller.lock().await.on_loaded_metadata(),
            MediaEvent::Error(kind) => {
                let skip = self.controller.lock().await.on_media_error(kind);
                if let Some(skip) = skip {
                    self.schedule_error_skip(skip);
                }
            }
        }
    }

    pub async fn upload(&self, files: Vec<UploadedFile>) -> UploadReport {
        self.controller.lock().await.upload(files).await
    }

    // ========================================================================
    // Background Loops
    // ========================================================================

    /// Starts a countdown and its ticking loop.
    pub async fn start_sleep_timer(&self, input: &str) -> Result<TimerGeneration> {
        let generation = self.controller.lock().await.start_sleep_timer(input)?;
        self.spawn_timer_loop(generation);
        Ok(generation)
    }

    fn spawn_timer_loop(&self, generation: TimerGeneration) {
        let controller = Arc::clone(&self.controller);
        spawn_detached(async move {
            loop {
                sleep(TICK).await;
                match controller.lock().await.tick_sleep_timer(generation) {
                    Some(TimerTick::Running { .. }) => continue,
                    Some(TimerTick::Expired) => break,
                    None => {
                        debug!("Sleep timer superseded");
                        break;
                    }
                }
            }
        });
    }

    fn schedule_error_skip(&self, skip: ErrorSkip) {
        let controller = Arc::clone(&self.controller);
        let delay = self.error_skip_delay;
        spawn_detached(async move {
            sleep(delay).await;
            let skipped = controller.lock().await.skip_failed_track(skip).await;
            debug!(skipped, "Error skip fired");
        });
    }

    async fn prompt_install(&self) -> Option<InstallOutcome> {
        match self.install.prompt().await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "Install prompt failed");
                None
            }
        }
    }
}
