//! Host lifecycle hooks: worker takeover and the install prompt.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};

/// Lifecycle controls of the background worker's host.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait WorkerHost: PlatformSendSync {
    /// Activate the newly installed worker without waiting for older
    /// instances to terminate.
    async fn skip_waiting(&self) -> Result<()>;

    /// Take control of every open client view.
    async fn claim_clients(&self) -> Result<()>;
}

/// User response to the install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

/// A deferred install prompt captured from the host.
///
/// The host hands one over when it would otherwise show its own install UI;
/// the app shows its own affordance and calls [`prompt`](Self::prompt) on
/// demand.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait InstallPrompt: PlatformSendSync {
    /// Show the host install dialog and wait for the user's choice.
    async fn prompt(&self) -> Result<InstallOutcome>;
}
