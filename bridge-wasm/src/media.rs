//! `<audio>` element adapter.

use crate::error::{js_message, WasmError, WasmResult};
use async_trait::async_trait;
use bridge_traits::playback::{MediaElement, MediaErrorKind, PlayError};
use bridge_traits::storage::ResourceLocator;
use std::time::Duration;
use tracing::{debug, warn};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// Name of the exception a browser raises when autoplay policy refuses
/// `play()`.
const AUTOPLAY_REFUSAL: &str = "NotAllowedError";

/// Drives one detached `<audio>` element.
pub struct HtmlAudioMedia {
    element: HtmlAudioElement,
}

impl HtmlAudioMedia {
    /// Create a fresh, detached audio element.
    pub fn new() -> WasmResult<Self> {
        Ok(Self {
            element: HtmlAudioElement::new()?,
        })
    }

    /// The underlying element, for wiring its events.
    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    /// Category of the element's current error, if it has one.
    pub fn error_kind(&self) -> MediaErrorKind {
        self.element
            .error()
            .map(|error| MediaErrorKind::from_code(error.code()))
            .unwrap_or(MediaErrorKind::Unknown)
    }
}

#[async_trait(?Send)]
impl MediaElement for HtmlAudioMedia {
    fn set_source(&self, locator: Option<&ResourceLocator>) {
        match locator {
            Some(locator) => self.element.set_src(locator.as_str()),
            None => {
                if let Err(err) = self.element.remove_attribute("src") {
                    warn!(error = %js_message(&err), "Could not detach audio source");
                }
            }
        }
        self.element.load();
    }

    async fn play(&self) -> Result<(), PlayError> {
        let promise = self
            .element
            .play()
            .map_err(|err| PlayError::Failed(js_message(&err)))?;

        match JsFuture::from(promise).await {
            Ok(_) => Ok(()),
            Err(err) => {
                let message = js_message(&err);
                if WasmError::dom_exception_name(&err).as_deref() == Some(AUTOPLAY_REFUSAL) {
                    debug!(%message, "Autoplay refused");
                    Err(PlayError::Blocked(message))
                } else {
                    Err(PlayError::Failed(message))
                }
            }
        }
    }

    fn pause(&self) {
        if let Err(err) = self.element.pause() {
            warn!(error = %js_message(&err), "Pause failed");
        }
    }

    fn duration(&self) -> Option<Duration> {
        seconds(self.element.duration())
    }

    fn current_time(&self) -> Duration {
        seconds(self.element.current_time()).unwrap_or_default()
    }

    fn seek(&self, position: Duration) {
        self.element.set_current_time(position.as_secs_f64());
    }
}

/// Media timestamps are `NaN` before metadata loads and `Infinity` for
/// unbounded streams.
fn seconds(value: f64) -> Option<Duration> {
    if value.is_finite() && value >= 0.0 {
        Some(Duration::from_secs_f64(value))
    } else {
        None
    }
}
