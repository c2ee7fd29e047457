//! Eligibility of ledger records for the snapshot.

use bitcoin::{OutPoint, Txid};
use synapse_ledger::{LedgerEntry, TxOutEntry, parse_entry_key};

/// Decides which ledger records and outputs take part in the snapshot.
///
/// A record is eligible when its key is a transaction record, it still holds unspent
/// value and its height lies in `[min_height, max_height]`. Within an eligible record,
/// every unspent output is eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UtxoFilter {
    /// Lowest admitted block height, inclusive.
    pub min_height: u32,
    /// Highest admitted block height, inclusive.
    pub max_height: u32,
}

impl Default for UtxoFilter {
    fn default() -> Self {
        Self {
            min_height: 0,
            max_height: u32::MAX,
        }
    }
}

impl UtxoFilter {
    pub fn new(min_height: Option<u32>, max_height: Option<u32>) -> Self {
        let default = Self::default();
        Self {
            min_height: min_height.unwrap_or(default.min_height),
            max_height: max_height.unwrap_or(default.max_height),
        }
    }

    /// Returns the txid if `key` is a transaction record key.
    pub fn accept_key(&self, key: &[u8]) -> Option<Txid> {
        parse_entry_key(key)
    }

    pub fn contains_height(&self, height: u32) -> bool {
        (self.min_height..=self.max_height).contains(&height)
    }

    pub fn accept_entry(&self, entry: &LedgerEntry) -> bool {
        entry.unspent_amount() > 0 && self.contains_height(entry.height)
    }

    /// Decodes a raw record and applies the record level checks.
    ///
    /// Malformed records are skipped.
    pub fn accept_record(&self, key: &[u8], value: &[u8]) -> Option<(Txid, LedgerEntry)> {
        let txid = self.accept_key(key)?;
        let entry = match LedgerEntry::decode(value) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::trace!("Skipping malformed record {txid}: {err}");
                return None;
            }
        };
        self.accept_entry(&entry).then_some((txid, entry))
    }

    /// Iterates over the eligible outputs of an accepted record.
    pub fn eligible_outputs<'a>(
        &self,
        txid: Txid,
        entry: &'a LedgerEntry,
    ) -> impl Iterator<Item = (OutPoint, &'a TxOutEntry)> + use<'a> {
        entry
            .unspent()
            .map(move |(vout, output)| (OutPoint::new(txid, vout), output))
    }
}
