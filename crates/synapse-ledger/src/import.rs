//! Ledger import from the human readable UTXO CSV format.

use crate::{Error, LedgerEntry, Result, TxOutEntry};
use bitcoin::Txid;
use std::collections::BTreeMap;
use std::io::Read;

/// Upper bound on the outputs of one transaction.
///
/// A block of maximum weight holds at most this many 9 byte outputs.
pub const MAX_TX_OUTPUTS: u32 = 111_111;

/// One row of a UTXO CSV dump.
///
/// Same column layout as `dumptxoutset --csv`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UtxoCsvEntry {
    pub txid: Txid,
    pub vout: u32,
    pub is_coinbase: bool,
    pub amount: u64,
    pub height: u32,
    pub script_pubkey: String,
}

/// Reads CSV rows (no header line) and groups them into ledger records by txid.
pub fn read_csv_entries<R: Read>(reader: R) -> Result<BTreeMap<Txid, LedgerEntry>> {
    let csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut entries: BTreeMap<Txid, LedgerEntry> = BTreeMap::new();

    for row in csv_reader.into_deserialize::<UtxoCsvEntry>() {
        let UtxoCsvEntry {
            txid,
            vout,
            is_coinbase,
            amount,
            height,
            script_pubkey,
        } = row?;

        if vout >= MAX_TX_OUTPUTS {
            return Err(Error::InvalidVout { txid, vout });
        }

        let script_pubkey = hex::decode(script_pubkey)
            .map_err(|source| Error::InvalidScriptHex { txid, vout, source })?;

        let entry = entries
            .entry(txid)
            .or_insert_with(|| LedgerEntry::new(height, is_coinbase, Vec::new()));

        if entry.height != height || entry.is_coinbase != is_coinbase {
            return Err(Error::InconsistentEntry(txid));
        }

        let index = vout as usize;
        if entry.outputs.len() <= index {
            entry.outputs.resize(index + 1, None);
        }
        if entry.outputs[index].is_some() {
            return Err(Error::DuplicateOutput { txid, vout });
        }
        entry.outputs[index] = Some(TxOutEntry::new(amount, script_pubkey));
    }

    Ok(entries)
}

/// Imports a UTXO CSV dump into `ledger`, returning the number of records written.
pub fn import_csv<R: Read>(ledger: &crate::LedgerDb, reader: R) -> Result<usize> {
    let entries = read_csv_entries(reader)?;
    let outputs: usize = entries.values().map(|entry| entry.unspent().count()).sum();
    let records = ledger.bulk_import(entries)?;
    tracing::info!("Imported {outputs} outputs in {records} ledger records");
    Ok(records)
}
