//! Custom install affordance.

use bridge_traits::error::Result;
use bridge_traits::lifecycle::{InstallOutcome, InstallPrompt};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Holds the host's deferred install prompt until the user asks for it.
#[derive(Default)]
pub struct InstallPromptManager {
    deferred: Mutex<Option<Arc<dyn InstallPrompt>>>,
}

impl InstallPromptManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The host offered an install prompt; show the affordance.
    pub fn on_prompt_available(&self, prompt: Arc<dyn InstallPrompt>) {
        *self.deferred.lock() = Some(prompt);
    }

    /// The app was installed by other means; hide the affordance.
    pub fn on_installed(&self) {
        self.deferred.lock().take();
    }

    pub fn is_available(&self) -> bool {
        self.deferred.lock().is_some()
    }

    /// Runs the deferred prompt once.
    ///
    /// Returns `None` if no prompt was available. The prompt is consumed
    /// whatever the user chooses.
    pub async fn prompt(&self) -> Result<Option<InstallOutcome>> {
        let Some(prompt) = self.deferred.lock().take() else {
            return Ok(None);
        };
        let outcome = prompt.prompt().await?;
        info!(?outcome, "Install prompt answered");
        Ok(Some(outcome))
    }
}
