//! DOM rendering and user notices.

use crate::error::{js_message, WasmError, WasmResult};
use bridge_traits::ui::{Notice, NoticeLevel, Notifier, PlayerView, PlaylistRow, ViewRenderer};
use tracing::{error, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement, Window};

const PLAY_GLYPH: &str = "▶️";
const PAUSE_GLYPH: &str = "⏸️";
const REMOVE_ROW_GLYPH: &str = "✕";
const REMOVE_FILE_LABEL: &str = "Remove";

/// Attribute carrying a row's playlist position.
pub const INDEX_ATTRIBUTE: &str = "data-index";
/// Class of a clickable playlist row.
pub const TRACK_ROW_CLASS: &str = "playlist-track";
/// Class of the remove control inside a playlist row.
pub const TRACK_REMOVE_CLASS: &str = "playlist-track-remove";
/// Class of the remove control in the uploaded-file list.
pub const FILE_REMOVE_CLASS: &str = "remove-file";

/// Ids of the page elements the player reads and writes.
#[derive(Debug, Clone)]
pub struct ElementIds {
    /// Play/pause button.
    pub play_pause: String,
    /// Previous-track button.
    pub previous: String,
    /// Next-track button.
    pub next: String,
    /// Now-playing title.
    pub title: String,
    /// Now-playing subtitle.
    pub subtitle: String,
    /// Now-playing file name.
    pub file_name: String,
    /// Elapsed time label.
    pub current_time: String,
    /// Duration label.
    pub duration: String,
    /// Seek slider (`<input type="range">`).
    pub progress: String,
    /// Optional element toggled with the `playing` class.
    pub visualizer: String,
    /// Sleep-timer minutes field.
    pub timer_input: String,
    /// Sleep-timer start button.
    pub start_timer: String,
    /// Sleep-timer countdown label.
    pub timer_display: String,
    /// File picker (`<input type="file">`).
    pub file_input: String,
    /// Drag-and-drop target.
    pub upload_area: String,
    /// Uploaded-file list.
    pub file_list: String,
    /// Playlist container.
    pub playlist: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            play_pause: "play-pause-btn".into(),
            previous: "prev-btn".into(),
            next: "next-btn".into(),
            title: "track-title".into(),
            subtitle: "track-artist".into(),
            file_name: "current-track-name".into(),
            current_time: "current-time".into(),
            duration: "duration".into(),
            progress: "progress-bar".into(),
            visualizer: "visualizer".into(),
            timer_input: "timer-input".into(),
            start_timer: "start-timer-btn".into(),
            timer_display: "timer-display".into(),
            file_input: "audio-file-input".into(),
            upload_area: "upload-area".into(),
            file_list: "file-list".into(),
            playlist: "playlist-tracks".into(),
        }
    }
}

/// Look up a required element by id.
pub(crate) fn require(document: &Document, id: &str) -> WasmResult<Element> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| WasmError::MissingElement(id.to_string()))
}

/// Draws [`PlayerView`] snapshots into the page.
pub struct DomRenderer {
    document: Document,
    play_pause: Element,
    title: Element,
    subtitle: Element,
    file_name: Element,
    current_time: Element,
    duration: Element,
    progress: HtmlInputElement,
    visualizer: Option<Element>,
    timer_display: Element,
    file_list: Element,
    playlist: Element,
}

impl DomRenderer {
    /// Resolve every element up front so a broken page fails at startup.
    pub fn new(document: &Document, ids: &ElementIds) -> WasmResult<Self> {
        let progress = require(document, &ids.progress)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| WasmError::MissingElement(ids.progress.clone()))?;

        Ok(Self {
            document: document.clone(),
            play_pause: require(document, &ids.play_pause)?,
            title: require(document, &ids.title)?,
            subtitle: require(document, &ids.subtitle)?,
            file_name: require(document, &ids.file_name)?,
            current_time: require(document, &ids.current_time)?,
            duration: require(document, &ids.duration)?,
            progress,
            visualizer: document.get_element_by_id(&ids.visualizer),
            timer_display: require(document, &ids.timer_display)?,
            file_list: require(document, &ids.file_list)?,
            playlist: require(document, &ids.playlist)?,
        })
    }

    fn draw(&self, view: &PlayerView) -> Result<(), JsValue> {
        self.title.set_text_content(Some(&view.title));
        self.subtitle.set_text_content(Some(&view.subtitle));
        self.file_name.set_text_content(Some(&view.file_name));
        self.current_time.set_text_content(Some(&view.position_label));
        self.duration.set_text_content(Some(&view.duration_label));
        self.progress.set_value(&view.progress_percent.to_string());

        let glyph = if view.is_playing { PAUSE_GLYPH } else { PLAY_GLYPH };
        self.play_pause.set_text_content(Some(glyph));
        if let Some(visualizer) = &self.visualizer {
            visualizer
                .class_list()
                .toggle_with_force("playing", view.is_playing)?;
        }

        let timer = view.timer_label.as_deref().unwrap_or(&view.timer_display);
        self.timer_display.set_text_content(Some(timer));

        self.draw_playlist(view)?;
        self.draw_file_list(&view.rows)
    }

    fn draw_playlist(&self, view: &PlayerView) -> Result<(), JsValue> {
        self.playlist.set_inner_html("");
        if view.rows.is_empty() {
            let placeholder = self.document.create_element("p")?;
            placeholder.set_class_name("empty-message");
            placeholder.set_text_content(view.empty_message.as_deref());
            self.playlist.append_child(&placeholder)?;
            return Ok(());
        }

        for row in &view.rows {
            let item = self.document.create_element("div")?;
            item.set_class_name(if row.active {
                "playlist-track active"
            } else {
                TRACK_ROW_CLASS
            });
            item.set_attribute(INDEX_ATTRIBUTE, &row.index.to_string())?;

            let info = self.document.create_element("div")?;
            info.set_class_name("playlist-track-info");
            let title = self.document.create_element("div")?;
            title.set_class_name("playlist-track-title");
            title.set_text_content(Some(&row.title));
            let size = self.document.create_element("div")?;
            size.set_class_name("playlist-track-duration");
            size.set_text_content(Some(&row.size_label));
            info.append_child(&title)?;
            info.append_child(&size)?;

            let remove = self.document.create_element("button")?;
            remove.set_class_name(TRACK_REMOVE_CLASS);
            remove.set_attribute(INDEX_ATTRIBUTE, &row.index.to_string())?;
            remove.set_text_content(Some(REMOVE_ROW_GLYPH));

            item.append_child(&info)?;
            item.append_child(&remove)?;
            self.playlist.append_child(&item)?;
        }
        Ok(())
    }

    fn draw_file_list(&self, rows: &[PlaylistRow]) -> Result<(), JsValue> {
        self.file_list.set_inner_html("");
        for row in rows {
            let item = self.document.create_element("div")?;
            item.set_class_name("file-item");
            let name = self.document.create_element("span")?;
            name.set_class_name("file-name");
            name.set_text_content(Some(&row.file_name));
            let remove = self.document.create_element("button")?;
            remove.set_class_name(FILE_REMOVE_CLASS);
            remove.set_attribute(INDEX_ATTRIBUTE, &row.index.to_string())?;
            remove.set_text_content(Some(REMOVE_FILE_LABEL));
            item.append_child(&name)?;
            item.append_child(&remove)?;
            self.file_list.append_child(&item)?;
        }
        Ok(())
    }
}

impl ViewRenderer for DomRenderer {
    fn render(&self, view: &PlayerView) {
        if let Err(err) = self.draw(view) {
            error!(error = %js_message(&err), "Render failed");
        }
    }
}

/// Shows notices with `window.alert`.
pub struct AlertNotifier {
    window: Window,
}

impl AlertNotifier {
    /// Create a notifier bound to `window`.
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Notifier for AlertNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(message = %notice.message, "Notice"),
            NoticeLevel::Warning | NoticeLevel::Error => {
                warn!(message = %notice.message, "Notice")
            }
        }
        if let Err(err) = self.window.alert_with_message(&notice.message) {
            warn!(error = %js_message(&err), "Alert failed");
        }
    }
}
