//! Error types for the snapshot engine.

use bitcoin::OutPoint;

/// Errors that can occur while building snapshots, proofs or unlock items.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ledger cannot be opened or read.
    #[error(transparent)]
    Ledger(#[from] synapse_ledger::Error),

    /// The signer refused an output under [`crate::SigningFailurePolicy::FailFast`].
    #[error("Failed to sign claim for {0}")]
    SigningFailed(OutPoint),

    /// Malformed private key.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Malformed hex digest.
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// Malformed hex data.
    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// JSON export/import error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
