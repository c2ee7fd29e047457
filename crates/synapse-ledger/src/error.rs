//! Error types for ledger storage.

use bitcoin::Txid;

/// Errors that can occur while reading or writing the ledger.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// RocksDB error, the store cannot be opened or read.
    #[error("RocksDB error: {0}")]
    Rocksdb(#[from] rocksdb::Error),

    /// Bincode serialization/deserialization error.
    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    /// CSV import error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid hex in an imported script.
    #[error("Invalid script hex for {txid}:{vout}: {source}")]
    InvalidScriptHex {
        txid: Txid,
        vout: u32,
        source: hex::FromHexError,
    },

    /// The same output appears twice in an import.
    #[error("Duplicate output {txid}:{vout}")]
    DuplicateOutput { txid: Txid, vout: u32 },

    /// An imported output index no transaction can have.
    #[error("Output index {vout} of {txid} is out of range")]
    InvalidVout { txid: Txid, vout: u32 },

    /// Imported rows for one transaction disagree on height or coinbase flag.
    #[error("Inconsistent rows for transaction {0}")]
    InconsistentEntry(Txid),

    /// Storage not initialized.
    #[error("Storage not initialized")]
    NotInitialized,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
