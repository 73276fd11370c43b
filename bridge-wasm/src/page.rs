//! Page entry point: builds the player service and wires the DOM to it.

use crate::binder::ObjectUrlBinder;
use crate::error::{js_message, to_js_error, WasmError, WasmResult};
use crate::lifecycle::DeferredInstallPrompt;
use crate::media::HtmlAudioMedia;
use crate::ui::{
    require, AlertNotifier, DomRenderer, ElementIds, FILE_REMOVE_CLASS, INDEX_ATTRIBUTE,
    TRACK_REMOVE_CLASS, TRACK_ROW_CLASS,
};
use crate::{init_runtime, load_config};
use bridge_traits::storage::UploadedFile;
use bridge_traits::ui::{Notice, Notifier};
use bytes::Bytes;
use core_async::spawn_detached;
use core_playback::PlaybackError;
use core_service::{
    shortcut_for, KeyCode, KeyInput, MediaEvent, PlayerDependencies, PlayerService, UiEvent,
};
use js_sys::{Promise, Uint8Array};
use std::sync::Arc;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{
    Document, DragEvent, Element, Event, EventTarget, File, FileList, HtmlElement,
    HtmlInputElement, KeyboardEvent, Window,
};

const SERVICE_WORKER_URL: &str = "/service-worker.js";
const INSTALL_LABEL: &str = "📱 Install App";
const DRAG_OVER_CLASS: &str = "drag-over";

/// JavaScript handle to a running player.
#[wasm_bindgen]
pub struct PlayerHandle {
    service: PlayerService,
}

#[wasm_bindgen]
impl PlayerHandle {
    /// Resolves to the current `{ current_index, is_playing, timer_seconds_remaining }`.
    pub fn state(&self) -> Promise {
        let service = self.service.clone();
        future_to_promise(async move {
            serde_wasm_bindgen::to_value(&service.state().await).map_err(to_js_error)
        })
    }

    /// Resolves to the current view snapshot.
    pub fn view(&self) -> Promise {
        let service = self.service.clone();
        future_to_promise(async move {
            serde_wasm_bindgen::to_value(&service.view().await).map_err(to_js_error)
        })
    }
}

/// Start the player on the current page.
///
/// `config_json` is an optional JSON configuration document; absent fields
/// take defaults.
#[wasm_bindgen]
pub fn start_player(config_json: Option<String>) -> Result<PlayerHandle, JsValue> {
    init_runtime();
    let config = load_config(config_json)?;
    let window = web_sys::window().ok_or_else(|| WasmError::Unavailable("window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| WasmError::Unavailable("document".to_string()))?;
    let ids = ElementIds::default();

    let media = Arc::new(HtmlAudioMedia::new()?);
    let notifier = Arc::new(AlertNotifier::new(window.clone()));
    let renderer = Arc::new(DomRenderer::new(&document, &ids)?);
    let deps = PlayerDependencies::new(media.clone(), notifier.clone())
        .with_transient_binder(Arc::new(ObjectUrlBinder::new()))
        .with_renderer(renderer);
    let service = PlayerService::bootstrap(&config, deps).map_err(WasmError::from)?;

    let page = Page {
        service: service.clone(),
        document: document.clone(),
        ids,
        notifier,
        max_upload_bytes: config.player.max_upload_bytes,
    };
    page.wire_controls()?;
    page.wire_uploads()?;
    page.wire_playlist()?;
    page.wire_media(&media)?;
    page.wire_keyboard()?;
    page.wire_install(&window)?;
    register_service_worker(&window);

    info!("Player started");
    Ok(PlayerHandle { service })
}

#[derive(Clone)]
struct Page {
    service: PlayerService,
    document: Document,
    ids: ElementIds,
    notifier: Arc<AlertNotifier>,
    max_upload_bytes: u64,
}

impl Page {
    fn element(&self, id: &str) -> WasmResult<Element> {
        require(&self.document, id)
    }

    fn dispatch(&self, event: UiEvent) {
        let service = self.service.clone();
        spawn_detached(async move {
            service.dispatch(event).await;
        });
    }

    fn wire_controls(&self) -> WasmResult<()> {
        for (id, event) in [
            (&self.ids.play_pause, UiEvent::PlayPause),
            (&self.ids.previous, UiEvent::Previous),
            (&self.ids.next, UiEvent::Next),
        ] {
            let page = self.clone();
            listen(&self.element(id)?, "click", move |_| page.dispatch(event.clone()))?;
        }

        let timer_input = input(self.element(&self.ids.timer_input)?, &self.ids.timer_input)?;
        let page = self.clone();
        listen(&self.element(&self.ids.start_timer)?, "click", move |_| {
            page.dispatch(UiEvent::StartTimer(timer_input.value()))
        })?;

        let progress = input(self.element(&self.ids.progress)?, &self.ids.progress)?;
        let page = self.clone();
        listen(&progress.clone().into(), "input", move |_| {
            if let Ok(percent) = progress.value().parse::<f64>() {
                page.dispatch(UiEvent::Seek(percent));
            }
        })
    }

    fn wire_uploads(&self) -> WasmResult<()> {
        let file_input = input(self.element(&self.ids.file_input)?, &self.ids.file_input)?;
        let page = self.clone();
        listen(&file_input.clone().into(), "change", move |_| {
            if let Some(list) = file_input.files() {
                page.upload(list, UiEvent::FilesSelected);
            }
        })?;

        let area = self.element(&self.ids.upload_area)?;
        let body = self
            .document
            .body()
            .ok_or_else(|| WasmError::MissingElement("body".to_string()))?;
        for kind in ["dragenter", "dragover", "dragleave", "drop"] {
            listen(&area, kind, suppress_default)?;
            listen(&body, kind, suppress_default)?;
        }
        for (kind, highlighted) in [
            ("dragenter", true),
            ("dragover", true),
            ("dragleave", false),
            ("drop", false),
        ] {
            let target = area.clone();
            listen(&area, kind, move |_| {
                if let Err(err) = target
                    .class_list()
                    .toggle_with_force(DRAG_OVER_CLASS, highlighted)
                {
                    debug!(error = %js_message(&err), "Could not toggle drop highlight");
                }
            })?;
        }

        let page = self.clone();
        listen(&area, "drop", move |event| {
            let files = event
                .dyn_ref::<DragEvent>()
                .and_then(DragEvent::data_transfer)
                .and_then(|transfer| transfer.files());
            if let Some(list) = files {
                page.upload(list, UiEvent::FilesDropped);
            }
        })
    }

    /// Read every file and hand the batch to the service in one event.
    fn upload(&self, list: FileList, into_event: fn(Vec<UploadedFile>) -> UiEvent) {
        let files: Vec<File> = (0..list.length()).filter_map(|i| list.get(i)).collect();
        let page = self.clone();
        spawn_detached(async move {
            let mut uploads = Vec::with_capacity(files.len());
            for file in files {
                match page.read_file(&file).await {
                    Ok(upload) => uploads.push(upload),
                    Err(reason) => {
                        let error = PlaybackError::FileUnreadable {
                            file_name: file.name(),
                            reason,
                        };
                        warn!(%error, "Upload skipped");
                        page.notifier.notify(Notice::error(error.user_message()));
                    }
                }
            }
            page.service.dispatch(into_event(uploads)).await;
        });
    }

    /// Oversized files are passed on unread so validation can reject them
    /// without loading their contents.
    async fn read_file(&self, file: &File) -> Result<UploadedFile, String> {
        let size = file.size() as u64;
        if size > self.max_upload_bytes {
            return Ok(UploadedFile::new(file.name(), file.type_(), Bytes::new()).with_size(size));
        }
        let buffer = JsFuture::from(file.array_buffer())
            .await
            .map_err(|err| js_message(&err))?;
        let data = Uint8Array::new(&buffer).to_vec();
        Ok(UploadedFile::new(file.name(), file.type_(), Bytes::from(data)).with_size(size))
    }

    fn wire_playlist(&self) -> WasmResult<()> {
        let page = self.clone();
        listen(&self.element(&self.ids.playlist)?, "click", move |event| {
            if let Some(index) = clicked_index(&event, TRACK_REMOVE_CLASS) {
                page.dispatch(UiEvent::RemoveClicked(index));
            } else if let Some(index) = clicked_index(&event, TRACK_ROW_CLASS) {
                page.dispatch(UiEvent::TrackClicked(index));
            }
        })?;

        let page = self.clone();
        listen(&self.element(&self.ids.file_list)?, "click", move |event| {
            if let Some(index) = clicked_index(&event, FILE_REMOVE_CLASS) {
                page.dispatch(UiEvent::RemoveClicked(index));
            }
        })
    }

    fn wire_media(&self, media: &Arc<HtmlAudioMedia>) -> WasmResult<()> {
        let audio: EventTarget = media.element().clone().into();
        for (kind, signal) in [
            ("ended", MediaEvent::Ended),
            ("timeupdate", MediaEvent::TimeUpdate),
            ("loadedmetadata", MediaEvent::LoadedMetadata),
        ] {
            let service = self.service.clone();
            listen(&audio, kind, move |_| {
                let service = service.clone();
                spawn_detached(async move { service.handle_media(signal).await });
            })?;
        }

        let service = self.service.clone();
        let media = Arc::clone(media);
        listen(&audio, "error", move |_| {
            let service = service.clone();
            let kind = media.error_kind();
            spawn_detached(async move { service.handle_media(MediaEvent::Error(kind)).await });
        })
    }

    fn wire_keyboard(&self) -> WasmResult<()> {
        let page = self.clone();
        listen(&self.document.clone().into(), "keydown", move |event| {
            let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let mut key = KeyInput::new(KeyCode::from_dom(&keyboard.code()));
            if keyboard.ctrl_key() {
                key = key.with_ctrl();
            }
            if keyboard.meta_key() {
                key = key.with_meta();
            }
            let focused = page.document.active_element().map(|element| element.id());
            if focused.as_deref() == Some(page.ids.timer_input.as_str()) {
                key = key.in_timer_input();
            }

            // The browser default has to be suppressed before dispatch yields.
            if shortcut_for(&key).is_some() {
                event.prevent_default();
                page.dispatch(UiEvent::Key(key));
            }
        })
    }

    fn wire_install(&self, window: &Window) -> WasmResult<()> {
        let button = self
            .document
            .create_element("button")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| WasmError::Unavailable("button element".to_string()))?;
        button.set_text_content(Some(INSTALL_LABEL));
        button.set_class_name("install-btn");
        set_visible(&button, false);
        if let Some(header) = self.document.query_selector("header")? {
            header.append_child(&button)?;
        }

        let service = self.service.clone();
        let shown = button.clone();
        listen(&window.clone().into(), "beforeinstallprompt", move |event| {
            service.on_install_prompt_available(Arc::new(DeferredInstallPrompt::capture(event)));
            set_visible(&shown, true);
            info!("Install prompt ready");
        })?;

        let service = self.service.clone();
        let hidden = button.clone();
        listen(&window.clone().into(), "appinstalled", move |_| {
            service.install_prompt().on_installed();
            set_visible(&hidden, false);
        })?;

        let page = self.clone();
        let clicked = button.clone();
        listen(&button.into(), "click", move |_| {
            page.dispatch(UiEvent::InstallClicked);
            set_visible(&clicked, false);
        })
    }
}

fn register_service_worker(window: &Window) {
    let container = window.navigator().service_worker();
    spawn_detached(async move {
        match JsFuture::from(container.register(SERVICE_WORKER_URL)).await {
            Ok(_) => info!(url = SERVICE_WORKER_URL, "Service worker registered"),
            Err(err) => warn!(error = %js_message(&err), "Service worker registration failed"),
        }
    });
}

/// Playlist index carried by the nearest ancestor of the click target with
/// class `class`.
fn clicked_index(event: &Event, class: &str) -> Option<usize> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let element = target.closest(&format!(".{class}")).ok()??;
    element.get_attribute(INDEX_ATTRIBUTE)?.parse().ok()
}

fn input(element: Element, id: &str) -> WasmResult<HtmlInputElement> {
    element
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| WasmError::MissingElement(id.to_string()))
}

fn set_visible(element: &HtmlElement, visible: bool) {
    let display = if visible { "block" } else { "none" };
    if let Err(err) = element.style().set_property("display", display) {
        debug!(error = %js_message(&err), "Could not toggle visibility");
    }
}

fn suppress_default(event: Event) {
    event.prevent_default();
    event.stop_propagation();
}

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> WasmResult<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    // Listeners stay attached for the life of the page.
    closure.forget();
    Ok(())
}
