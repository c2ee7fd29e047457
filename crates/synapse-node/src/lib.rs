//! Synapse Node Library.
//!
//! Exposes the snapshot engine as a CLI application operating on a local ledger database.

mod cli;
mod commands;
mod logging;

pub use self::cli::run;

/// Errors surfaced by the command line front end.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Ledger(#[from] synapse_ledger::Error),

    #[error(transparent)]
    Snapshot(#[from] synapse_snapshot::Error),

    #[error("Proof of {leaf} folds to {computed}, expected {expected}")]
    ProofMismatch {
        leaf: synapse_snapshot::LeafHash,
        computed: synapse_snapshot::LeafHash,
        expected: synapse_snapshot::LeafHash,
    },

    #[error("Output {0} is not part of the snapshot")]
    UnknownOutput(bitcoin::OutPoint),

    #[error("Either a leaf or an outpoint must be given")]
    MissingProofTarget,

    #[error("Invalid log filter: {0}")]
    LogFilter(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
