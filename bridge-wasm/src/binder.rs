//! Object URL binding for uploaded files.

use crate::error::js_error;
use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::storage::{ResourceBinder, ResourceLocator, UploadedFile};
use js_sys::{Array, Uint8Array};
use tracing::{debug, warn};
use web_sys::{Blob, BlobPropertyBag, Url};

/// Binds uploads to session-scoped `blob:` URLs.
///
/// Each URL pins its bytes in browser memory until [`release`] revokes it.
///
/// [`release`]: ResourceBinder::release
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectUrlBinder;

impl ObjectUrlBinder {
    /// Create a binder.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl ResourceBinder for ObjectUrlBinder {
    async fn bind(&self, file: &UploadedFile, mime_type: &str) -> BridgeResult<ResourceLocator> {
        let parts = Array::of1(&Uint8Array::from(file.data.as_ref()));
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|err| js_error("create blob", err))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|err| js_error("create object URL", err))?;

        debug!(file = %file.name, %url, "Bound upload");
        Ok(ResourceLocator::new(url))
    }

    fn release(&self, locator: &ResourceLocator) {
        if let Err(err) = Url::revoke_object_url(locator.as_str()) {
            warn!(url = %locator, error = ?err, "Could not revoke object URL");
        }
    }
}
