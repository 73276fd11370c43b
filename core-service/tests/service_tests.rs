//! Service-level tests: event dispatch, keyboard shortcuts and the
//! clock-driven loops, run on a paused Tokio clock.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::lifecycle::{InstallOutcome, InstallPrompt};
use bridge_traits::playback::{MediaElement, MediaErrorKind, PlayError};
use bridge_traits::storage::{ResourceBinder, ResourceLocator, UploadedFile};
use bridge_traits::ui::{Notice, Notifier};
use bytes::Bytes;
use core_runtime::config::{AppConfig, ResourceBinding};
use core_runtime::events::{CoreEvent, SleepTimerEvent};
use core_service::{
    KeyCode, KeyInput, MediaEvent, PlayerDependencies, PlayerService, ServiceError, UiEvent,
};
use mockall::mock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeMedia {
    source: Mutex<Option<String>>,
    pauses: AtomicUsize,
}

#[async_trait]
impl MediaElement for FakeMedia {
    fn set_source(&self, locator: Option<&ResourceLocator>) {
        *self.source.lock().unwrap() = locator.map(|l| l.as_str().to_string());
    }

    async fn play(&self) -> Result<(), PlayError> {
        Ok(())
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn duration(&self) -> Option<Duration> {
        Some(Duration::from_secs(180))
    }

    fn current_time(&self) -> Duration {
        Duration::ZERO
    }

    fn seek(&self, _position: Duration) {}
}

#[derive(Default)]
struct CountingBinder {
    bound: AtomicUsize,
}

#[async_trait]
impl ResourceBinder for CountingBinder {
    async fn bind(&self, _file: &UploadedFile, _mime_type: &str) -> BridgeResult<ResourceLocator> {
        let n = self.bound.fetch_add(1, Ordering::SeqCst);
        Ok(ResourceLocator::new(format!("blob:{n}")))
    }

    fn release(&self, _locator: &ResourceLocator) {}
}

#[derive(Default)]
struct SilentNotifier {
    count: AtomicUsize,
}

impl Notifier for SilentNotifier {
    fn notify(&self, _notice: Notice) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

mock! {
    pub Prompt {}

    #[async_trait]
    impl InstallPrompt for Prompt {
        async fn prompt(&self) -> BridgeResult<InstallOutcome>;
    }
}

struct Setup {
    service: PlayerService,
    media: Arc<FakeMedia>,
    notifier: Arc<SilentNotifier>,
}

fn setup_with(config: AppConfig, binder: Option<Arc<dyn ResourceBinder>>) -> Setup {
    let media = Arc::new(FakeMedia::default());
    let notifier = Arc::new(SilentNotifier::default());
    let mut deps = PlayerDependencies::new(media.clone(), notifier.clone());
    if let Some(binder) = binder {
        deps = deps.with_transient_binder(binder);
    }
    let service = PlayerService::bootstrap(&config, deps).unwrap();
    Setup {
        service,
        media,
        notifier,
    }
}

fn setup() -> Setup {
    setup_with(
        AppConfig::default(),
        Some(Arc::new(CountingBinder::default())),
    )
}

fn mp3(name: &str) -> UploadedFile {
    UploadedFile::new(name, "audio/mpeg", Bytes::from_static(b"ID3"))
}

async fn with_tracks(n: usize) -> Setup {
    let s = setup();
    let files = (0..n).map(|i| mp3(&format!("song{i}.mp3"))).collect();
    s.service.dispatch(UiEvent::FilesSelected(files)).await;
    s
}

// ============================================================================
// Bootstrap
// ============================================================================

#[test]
fn invalid_config_is_rejected() {
    let mut config = AppConfig::default();
    config.player.max_upload_bytes = 0;
    let deps = PlayerDependencies::new(
        Arc::new(FakeMedia::default()),
        Arc::new(SilentNotifier::default()),
    );
    assert!(matches!(
        PlayerService::bootstrap(&config, deps),
        Err(ServiceError::Runtime(_))
    ));
}

#[tokio::test]
async fn inline_binding_produces_data_urls() {
    let config = AppConfig::builder()
        .resource_binding(ResourceBinding::Inline)
        .build()
        .unwrap();
    let s = setup_with(config, Some(Arc::new(CountingBinder::default())));
    s.service.dispatch(UiEvent::FilesDropped(vec![mp3("a.mp3")])).await;

    let source = s.media.source.lock().unwrap().clone().unwrap();
    assert!(source.starts_with("data:audio/mpeg;base64,"));
}

#[tokio::test]
async fn transient_binding_without_host_binder_falls_back_to_inline() {
    let s = setup_with(AppConfig::default(), None);
    s.service.dispatch(UiEvent::FilesSelected(vec![mp3("a.mp3")])).await;

    let source = s.media.source.lock().unwrap().clone().unwrap();
    assert!(source.starts_with("data:"));
}

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test]
async fn upload_then_play_via_events() {
    let s = with_tracks(1).await;
    assert!(s.service.dispatch(UiEvent::PlayPause).await);

    let state = s.service.state().await;
    assert_eq!(state.current_index, Some(0));
    assert!(state.is_playing);
    assert_eq!(s.media.source.lock().unwrap().as_deref(), Some("blob:0"));
}

#[tokio::test]
async fn playlist_clicks_select_and_remove() {
    let s = with_tracks(3).await;
    assert!(s.service.dispatch(UiEvent::TrackClicked(2)).await);
    assert_eq!(s.service.state().await.current_index, Some(2));

    assert!(s.service.dispatch(UiEvent::RemoveClicked(0)).await);
    assert_eq!(s.service.state().await.current_index, Some(1));
    assert!(!s.service.dispatch(UiEvent::RemoveClicked(9)).await);
    assert!(!s.service.dispatch(UiEvent::TrackClicked(9)).await);
    assert_eq!(s.service.view().await.rows.len(), 2);
}

#[tokio::test]
async fn seek_event_reports_whether_it_moved() {
    let s = setup();
    assert!(!s.service.dispatch(UiEvent::Seek(50.0)).await);

    let s = with_tracks(1).await;
    assert!(s.service.dispatch(UiEvent::Seek(50.0)).await);
    assert_eq!(s.service.view().await.position_label, "1:30");
}

#[tokio::test]
async fn keyboard_shortcuts_drive_transport() {
    let s = with_tracks(3).await;

    let next = KeyInput::new(KeyCode::ArrowRight).with_ctrl();
    assert!(s.service.dispatch(UiEvent::Key(next)).await);
    assert_eq!(s.service.state().await.current_index, Some(1));

    let prev = KeyInput::new(KeyCode::ArrowLeft).with_meta();
    assert!(s.service.dispatch(UiEvent::Key(prev)).await);
    assert_eq!(s.service.state().await.current_index, Some(0));

    assert!(s.service.dispatch(UiEvent::Key(KeyInput::new(KeyCode::Space))).await);
    assert!(s.service.state().await.is_playing);
}

#[tokio::test]
async fn shortcuts_are_ignored_while_typing_a_timer_value() {
    let s = with_tracks(2).await;

    let space = KeyInput::new(KeyCode::Space).in_timer_input();
    let next = KeyInput::new(KeyCode::ArrowRight).with_ctrl().in_timer_input();
    assert!(!s.service.dispatch(UiEvent::Key(space)).await);
    assert!(!s.service.dispatch(UiEvent::Key(next)).await);

    let state = s.service.state().await;
    assert_eq!(state.current_index, Some(0));
    assert!(!state.is_playing);
}

#[tokio::test]
async fn unbound_keys_are_not_consumed() {
    let s = with_tracks(1).await;
    let key = KeyInput::new(KeyCode::from_dom("KeyK"));
    assert!(!s.service.dispatch(UiEvent::Key(key)).await);
}

// ============================================================================
// Sleep Timer Loop
// ============================================================================

#[tokio::test(start_paused = true)]
async fn sleep_timer_pauses_after_countdown() {
    let s = with_tracks(1).await;
    let mut events = s.service.subscribe();
    s.service.dispatch(UiEvent::PlayPause).await;
    assert!(s.service.dispatch(UiEvent::StartTimer("1".into())).await);

    tokio::time::sleep(Duration::from_millis(59_500)).await;
    assert!(s.service.state().await.is_playing);
    assert_eq!(s.service.view().await.timer_display, "00:01");

    tokio::time::sleep(Duration::from_secs(1)).await;
    let state = s.service.state().await;
    assert!(!state.is_playing);
    assert_eq!(state.timer_seconds_remaining, None);
    assert_eq!(s.media.pauses.load(Ordering::SeqCst), 1);
    assert_eq!(s.service.view().await.timer_label.as_deref(), Some("Time's up!"));

    let mut expired = 0;
    while let Ok(event) = events.try_recv() {
        if event == CoreEvent::SleepTimer(SleepTimerEvent::Expired) {
            expired += 1;
        }
    }
    assert_eq!(expired, 1);
}

#[tokio::test(start_paused = true)]
async fn restarting_timer_retires_old_loop() {
    let s = with_tracks(1).await;
    s.service.dispatch(UiEvent::PlayPause).await;
    s.service.dispatch(UiEvent::StartTimer("1".into())).await;

    tokio::time::sleep(Duration::from_millis(30_500)).await;
    s.service.dispatch(UiEvent::StartTimer("2".into())).await;

    // The first countdown would have expired here.
    tokio::time::sleep(Duration::from_millis(60_250)).await;
    let state = s.service.state().await;
    assert!(state.is_playing);
    assert_eq!(state.timer_seconds_remaining, Some(60));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(!s.service.state().await.is_playing);
}

#[tokio::test]
async fn invalid_timer_input_is_not_consumed() {
    let s = setup();
    assert!(!s.service.dispatch(UiEvent::StartTimer("soon".into())).await);
    assert_eq!(s.notifier.count.load(Ordering::SeqCst), 1);
    assert_eq!(s.service.state().await.timer_seconds_remaining, None);
}

// ============================================================================
// Error Auto-Skip
// ============================================================================

#[tokio::test(start_paused = true)]
async fn broken_track_is_skipped_after_delay() {
    let s = with_tracks(3).await;
    s.service.dispatch(UiEvent::PlayPause).await;

    s.service
        .handle_media(MediaEvent::Error(MediaErrorKind::Decode))
        .await;
    assert!(!s.service.state().await.is_playing);
    assert_eq!(s.notifier.count.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(1_900)).await;
    assert_eq!(s.service.state().await.current_index, Some(0));

    tokio::time::sleep(Duration::from_millis(200)).await;
    let state = s.service.state().await;
    assert_eq!(state.current_index, Some(1));
    assert!(state.is_playing);
}

#[tokio::test(start_paused = true)]
async fn skip_is_dropped_if_user_moved_on() {
    let s = with_tracks(3).await;
    s.service
        .handle_media(MediaEvent::Error(MediaErrorKind::Network))
        .await;
    s.service.dispatch(UiEvent::TrackClicked(2)).await;

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(s.service.state().await.current_index, Some(2));
}

#[tokio::test]
async fn ended_advances() {
    let s = with_tracks(2).await;
    s.service.handle_media(MediaEvent::Ended).await;
    assert_eq!(s.service.state().await.current_index, Some(1));
}

// ============================================================================
// Install Prompt
// ============================================================================

#[tokio::test]
async fn install_prompt_runs_once() {
    let s = setup();
    assert!(!s.service.dispatch(UiEvent::InstallClicked).await);

    let mut prompt = MockPrompt::new();
    prompt
        .expect_prompt()
        .times(1)
        .returning(|| Ok(InstallOutcome::Accepted));
    s.service.on_install_prompt_available(Arc::new(prompt));
    assert!(s.service.install_prompt().is_available());

    assert!(s.service.dispatch(UiEvent::InstallClicked).await);
    assert!(!s.service.install_prompt().is_available());
    assert!(!s.service.dispatch(UiEvent::InstallClicked).await);
}

#[tokio::test]
async fn installed_elsewhere_hides_affordance() {
    let s = setup();
    s.service
        .on_install_prompt_available(Arc::new(MockPrompt::new()));
    s.service.install_prompt().on_installed();
    assert!(!s.service.install_prompt().is_available());
}
