//! Ledger state (unspent output records) for Synapse.
//!
//! The ledger is an ordered key-value store holding one record per transaction. Keys are a
//! one byte tag followed by the raw txid; values are the serialized [`LedgerEntry`] listing
//! every output of the transaction, with spent outputs left as `None`.
//!
//! ## Backends
//!
//! - [`LedgerDb`]: RocksDB, the on-disk chainstate.
//! - [`MemoryLedger`]: insertion ordered in-memory map, mostly for tests.
//!
//! Both are consumed through [`EntrySource`], which only offers forward iteration and
//! point lookups.

mod entry;
mod error;
mod import;
mod memory;
mod source;
mod stats;
mod storage;

pub use entry::{ENTRY_KEY_LEN, LedgerEntry, TAG_COINS, TxOutEntry, entry_key, parse_entry_key};
pub use error::Error;
pub use import::{MAX_TX_OUTPUTS, UtxoCsvEntry, import_csv, read_csv_entries};
pub use memory::MemoryLedger;
pub use source::{EntrySource, RawCursor};
pub use stats::{LedgerStats, scan_stats};
pub use storage::LedgerDb;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Column family names for RocksDB.
mod cf {
    /// Column family for transaction records.
    /// Key: tag || txid = 33 bytes
    /// Value: LedgerEntry (bincode)
    pub const COINS: &str = "coins";
}
