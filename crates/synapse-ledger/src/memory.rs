//! In-memory ledger.

use crate::source::{EntrySource, RawCursor};
use crate::{LedgerEntry, Result, entry_key};
use bitcoin::Txid;
use indexmap::IndexMap;

/// Ledger held in memory.
///
/// Iteration follows insertion order rather than key order, which makes it possible to
/// present the same records in any physical order.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    records: IndexMap<Vec<u8>, Vec<u8>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the record of `txid`, keeping its position if it already exists.
    pub fn insert_entry(&mut self, txid: &Txid, entry: &LedgerEntry) -> Result<()> {
        self.records.insert(entry_key(txid).to_vec(), entry.encode()?);
        Ok(())
    }

    /// Insert raw bytes under an arbitrary key.
    pub fn insert_raw(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.records.insert(key.into(), value.into());
    }

    pub fn remove_entry(&mut self, txid: &Txid) -> Option<Vec<u8>> {
        self.records.shift_remove(entry_key(txid).as_slice())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(Txid, LedgerEntry)> for MemoryLedger {
    fn from_iter<I: IntoIterator<Item = (Txid, LedgerEntry)>>(iter: I) -> Self {
        let records = iter
            .into_iter()
            .filter_map(|(txid, entry)| {
                entry
                    .encode()
                    .ok()
                    .map(|value| (entry_key(&txid).to_vec(), value))
            })
            .collect();
        Self { records }
    }
}

impl EntrySource for MemoryLedger {
    type Cursor<'a> = MemoryCursor<'a>;

    fn cursor(&self) -> Result<Self::Cursor<'_>> {
        Ok(MemoryCursor {
            records: &self.records,
            position: 0,
        })
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.records.get(key).cloned())
    }

    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.records.contains_key(key))
    }
}

/// Cursor over a [`MemoryLedger`] in insertion order.
pub struct MemoryCursor<'a> {
    records: &'a IndexMap<Vec<u8>, Vec<u8>>,
    position: usize,
}

impl RawCursor for MemoryCursor<'_> {
    fn seek_to_first(&mut self) {
        self.position = 0;
    }

    fn valid(&self) -> bool {
        self.position < self.records.len()
    }

    fn next(&mut self) {
        self.position += 1;
    }

    fn key(&self) -> Option<&[u8]> {
        self.records
            .get_index(self.position)
            .map(|(key, _)| key.as_slice())
    }

    fn value(&self) -> Option<&[u8]> {
        self.records
            .get_index(self.position)
            .map(|(_, value)| value.as_slice())
    }

    fn status(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TxOutEntry, parse_entry_key};
    use bitcoin::hashes::Hash;

    #[test]
    fn test_cursor_follows_insertion_order() {
        let mut txids = (0u8..32)
            .map(|b| Txid::from_byte_array([b; 32]))
            .collect::<Vec<_>>();
        fastrand::Rng::with_seed(7).shuffle(&mut txids);

        let ledger = txids
            .iter()
            .map(|txid| {
                let entry = LedgerEntry::new(0, false, vec![Some(TxOutEntry::new(1, vec![]))]);
                (*txid, entry)
            })
            .collect::<MemoryLedger>();

        let mut cursor = ledger.cursor().unwrap();
        let mut seen = Vec::new();
        while cursor.valid() {
            seen.push(cursor.key().and_then(parse_entry_key).unwrap());
            cursor.next();
        }
        assert_eq!(seen, txids);

        cursor.seek_to_first();
        assert!(cursor.valid());
    }

    #[test]
    fn test_point_lookup() {
        let txid = Txid::from_byte_array([5; 32]);
        let entry = LedgerEntry::new(2, true, vec![Some(TxOutEntry::new(7, vec![0x51]))]);
        let mut ledger = MemoryLedger::new();
        ledger.insert_entry(&txid, &entry).unwrap();

        assert_eq!(ledger.get_entry(&txid).unwrap(), Some(entry));
        assert!(ledger.remove_entry(&txid).is_some());
        assert!(ledger.is_empty());
    }
}
