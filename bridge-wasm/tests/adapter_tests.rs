#![cfg(target_arch = "wasm32")]
//! Browser tests for the page and worker adapters.
//!
//! Run with `wasm-pack test --headless --chrome bridge-wasm`.

use bridge_traits::cache::CacheStorage;
use bridge_traits::http::{FetchRequest, FetchResponse};
use bridge_traits::playback::MediaElement;
use bridge_traits::storage::{ResourceBinder, UploadedFile};
use bridge_traits::ui::{PlayerView, PlaylistRow, ViewRenderer};
use bridge_wasm::{
    DomRenderer, ElementIds, HtmlAudioMedia, ObjectUrlBinder, WasmCacheStorage, WasmError,
};
use bytes::Bytes;
use std::time::Duration;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Adds one element per id the renderer needs.
fn build_page(ids: &ElementIds) {
    let document = document();
    let body = document.body().unwrap();
    for id in [
        &ids.play_pause,
        &ids.title,
        &ids.subtitle,
        &ids.file_name,
        &ids.current_time,
        &ids.duration,
        &ids.timer_display,
        &ids.file_list,
        &ids.playlist,
    ] {
        if document.get_element_by_id(id).is_none() {
            let element = document.create_element("div").unwrap();
            element.set_id(id);
            body.append_child(&element).unwrap();
        }
    }
    if document.get_element_by_id(&ids.progress).is_none() {
        let slider = document.create_element("input").unwrap();
        slider.set_attribute("type", "range").unwrap();
        slider.set_id(&ids.progress);
        body.append_child(&slider).unwrap();
    }
}

fn text(id: &str) -> String {
    document()
        .get_element_by_id(id)
        .and_then(|element| element.text_content())
        .unwrap_or_default()
}

#[wasm_bindgen_test]
async fn object_url_binder_creates_blob_urls() {
    let binder = ObjectUrlBinder::new();
    let file = UploadedFile::new("song.mp3", "audio/mpeg", Bytes::from_static(b"ID3"));

    let locator = binder.bind(&file, "audio/mpeg").await.unwrap();
    assert!(locator.as_str().starts_with("blob:"));

    binder.release(&locator);
}

#[wasm_bindgen_test]
fn fresh_audio_element_has_no_duration() {
    let media = HtmlAudioMedia::new().unwrap();
    assert_eq!(media.duration(), None);
    assert_eq!(media.current_time(), Duration::ZERO);

    media.set_source(None);
    assert_eq!(media.element().get_attribute("src"), None);
}

#[wasm_bindgen_test]
fn renderer_draws_rows_and_labels() {
    let ids = ElementIds::default();
    build_page(&ids);
    let renderer = DomRenderer::new(&document(), &ids).unwrap();

    let view = PlayerView {
        title: "rain".into(),
        subtitle: "2.00 MB".into(),
        file_name: "rain.mp3".into(),
        is_playing: true,
        current_index: Some(0),
        rows: vec![
            PlaylistRow {
                index: 0,
                title: "rain".into(),
                file_name: "rain.mp3".into(),
                size_label: "2.00 MB".into(),
                active: true,
            },
            PlaylistRow {
                index: 1,
                title: "<b>waves</b>".into(),
                file_name: "<b>waves</b>.ogg".into(),
                size_label: "1.00 MB".into(),
                active: false,
            },
        ],
        position_label: "0:42".into(),
        duration_label: "3:05".into(),
        timer_display: "00:00".into(),
        ..PlayerView::default()
    };
    renderer.render(&view);

    assert_eq!(text(&ids.title), "rain");
    assert_eq!(text(&ids.current_time), "0:42");
    assert_eq!(text(&ids.play_pause), "⏸️");

    let playlist = document().get_element_by_id(&ids.playlist).unwrap();
    assert_eq!(playlist.query_selector_all(".playlist-track").unwrap().length(), 2);
    assert_eq!(playlist.query_selector_all(".active").unwrap().length(), 1);
    // File names are text, never markup.
    assert_eq!(playlist.query_selector_all("b").unwrap().length(), 0);
}

#[wasm_bindgen_test]
fn renderer_shows_placeholder_and_timer_label() {
    let ids = ElementIds::default();
    build_page(&ids);
    let renderer = DomRenderer::new(&document(), &ids).unwrap();

    renderer.render(&PlayerView {
        empty_message: Some("No files loaded".into()),
        timer_expired: true,
        timer_label: Some("Time's up!".into()),
        ..PlayerView::default()
    });

    assert_eq!(text(&ids.playlist), "No files loaded");
    assert_eq!(text(&ids.timer_display), "Time's up!");
    assert_eq!(text(&ids.play_pause), "▶️");
}

#[wasm_bindgen_test]
fn renderer_requires_its_elements() {
    let ids = ElementIds {
        title: "no-such-element".into(),
        ..ElementIds::default()
    };
    build_page(&ElementIds::default());
    assert!(matches!(
        DomRenderer::new(&document(), &ids),
        Err(WasmError::MissingElement(id)) if id == "no-such-element"
    ));
}

#[wasm_bindgen_test]
async fn cache_storage_round_trip() {
    let storage = WasmCacheStorage::new().unwrap();
    let store = "adapter-tests-v1";
    storage.open(store).await.unwrap();

    let request = FetchRequest::get("https://music.example/style.css#top");
    let response =
        FetchResponse::new(200, "body { color: red }").header("Content-Type", "text/css");
    storage
        .put_all(store, vec![(request.clone(), response)])
        .await
        .unwrap();

    let stored = storage.lookup(store, &request).await.unwrap().unwrap();
    assert_eq!(stored.status, 200);
    assert_eq!(stored.text(), Some("body { color: red }"));
    assert_eq!(stored.header_value("content-type"), Some("text/css"));
    assert!(storage.keys().await.unwrap().contains(&store.to_string()));

    assert!(storage.delete(store).await.unwrap());
    assert!(!storage.delete(store).await.unwrap());
}

#[wasm_bindgen_test]
async fn lookup_in_missing_store_does_not_create_it() {
    let storage = WasmCacheStorage::new().unwrap();
    let miss = storage
        .lookup("adapter-tests-missing", &FetchRequest::get("https://music.example/"))
        .await
        .unwrap();
    assert!(miss.is_none());
    assert!(!storage
        .keys()
        .await
        .unwrap()
        .contains(&"adapter-tests-missing".to_string()));
}

#[wasm_bindgen_test]
fn thrown_strings_become_javascript_errors() {
    let err = WasmError::from(JsValue::from_str("boom"));
    assert_eq!(err.to_string(), "JavaScript error: boom");
}
