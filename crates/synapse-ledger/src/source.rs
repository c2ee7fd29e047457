//! Sequential access to the raw ledger records.

use crate::{LedgerEntry, Result, entry_key};
use bitcoin::Txid;

/// Forward cursor over raw key/value records.
///
/// Mirrors a RocksDB raw iterator: position with [`RawCursor::seek_to_first`], read while
/// [`RawCursor::valid`], then [`RawCursor::next`]. Once the cursor becomes invalid,
/// [`RawCursor::status`] reports whether iteration ended normally or hit a read error.
pub trait RawCursor {
    fn seek_to_first(&mut self);

    fn valid(&self) -> bool;

    fn next(&mut self);

    fn key(&self) -> Option<&[u8]>;

    fn value(&self) -> Option<&[u8]>;

    fn status(&self) -> Result<()>;
}

/// Ordered key-value store holding the ledger records.
pub trait EntrySource {
    type Cursor<'a>: RawCursor
    where
        Self: 'a;

    /// Returns a fresh cursor positioned at the first record.
    fn cursor(&self) -> Result<Self::Cursor<'_>>;

    /// Point lookup by exact key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Looks up and decodes the record of `txid`.
    fn get_entry(&self, txid: &Txid) -> Result<Option<LedgerEntry>> {
        self.get(&entry_key(txid))?
            .map(|bytes| LedgerEntry::decode(&bytes))
            .transpose()
    }
}
