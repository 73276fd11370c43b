//! Self-contained resource binding.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bridge_traits::error::Result;
use bridge_traits::storage::{ResourceBinder, ResourceLocator, UploadedFile};
use tracing::debug;

/// Encodes the file bytes into a `data:` URL.
///
/// The locator carries its own copy of the bytes, so there is nothing to
/// revoke and [`ResourceBinder::release`] does nothing. Memory use is roughly
/// 4/3 of the file size per track.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineBinder;

impl InlineBinder {
    pub fn new() -> Self {
        Self
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ResourceBinder for InlineBinder {
    async fn bind(&self, file: &UploadedFile, mime_type: &str) -> Result<ResourceLocator> {
        debug!(file = %file.name, bytes = file.data.len(), "Inlining audio file");
        let encoded = STANDARD.encode(&file.data);
        Ok(ResourceLocator::new(format!("data:{mime_type};base64,{encoded}")))
    }

    fn release(&self, _locator: &ResourceLocator) {}
}
