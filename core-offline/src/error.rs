use bridge_traits::error::BridgeError;
use thiserror::Error;

use crate::worker::WorkerPhase;

#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("Invalid worker scope {url}: {reason}")]
    InvalidScope { url: String, reason: String },

    #[error("Invalid asset path {path}: {reason}")]
    InvalidAsset { path: String, reason: String },

    #[error("Install of {store} failed: {reason}")]
    InstallFailed { store: String, reason: String },

    #[error("Cannot {operation} while worker is {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: WorkerPhase,
    },

    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, OfflineError>;
