//! UTXO set statistics gathered by a full scan.

use crate::source::{EntrySource, RawCursor};
use crate::{LedgerEntry, Result, parse_entry_key};
use bitcoin::Txid;

/// Summary of the records seen by one ledger scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStats {
    /// Transaction records with at least one unspent output.
    pub records: u64,
    /// Records with a transaction key whose value could not be decoded.
    pub malformed: u64,
    /// Keys that are not transaction records.
    pub foreign: u64,
    /// Total unspent outputs.
    pub unspent_outputs: u64,
    /// Sum of unspent output values in satoshis.
    pub total_amount: u64,
    /// The first records visited, as `(txid, number of output slots)`.
    pub head: Vec<(Txid, usize)>,
}

/// Scans the whole ledger, keeping the first `head_limit` records for display.
pub fn scan_stats<S: EntrySource>(source: &S, head_limit: usize) -> Result<LedgerStats> {
    let mut stats = LedgerStats::default();
    let mut cursor = source.cursor()?;
    cursor.seek_to_first();

    while cursor.valid() {
        if let (Some(key), Some(value)) = (cursor.key(), cursor.value()) {
            match parse_entry_key(key) {
                Some(txid) => match LedgerEntry::decode(value) {
                    Ok(entry) => {
                        let unspent = entry.unspent().count() as u64;
                        if unspent > 0 {
                            stats.records += 1;
                            stats.unspent_outputs += unspent;
                            stats.total_amount =
                                stats.total_amount.saturating_add(entry.unspent_amount());
                            if stats.head.len() < head_limit {
                                stats.head.push((txid, entry.outputs.len()));
                            }
                        }
                    }
                    Err(_) => stats.malformed += 1,
                },
                None => stats.foreign += 1,
            }
        }
        cursor.next();
    }
    cursor.status()?;

    Ok(stats)
}
