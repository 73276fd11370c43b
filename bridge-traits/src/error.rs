use thiserror::Error;

/// Failure reported by a host capability.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host does not offer this capability in the current context.
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// No response arrived at all (offline, DNS failure, aborted).
    #[error("Network request failed: {0}")]
    Network(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
