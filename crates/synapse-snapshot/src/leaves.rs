//! Lazy production of snapshot leaves from the ledger.

use crate::leaf::{LeafHash, leaf_hash};
use crate::{Result, UtxoFilter};
use bitcoin::OutPoint;
use std::collections::VecDeque;
use synapse_ledger::{EntrySource, RawCursor, TxOutEntry};

/// An eligible unspent output together with its leaf hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotUtxo {
    pub outpoint: OutPoint,
    pub output: TxOutEntry,
    pub height: u32,
    pub leaf: LeafHash,
}

/// Iterator over the eligible outputs of one ledger scan, in physical store order.
///
/// Every stream owns a fresh cursor; creating a new stream restarts the scan. A store
/// read error is yielded once and ends the stream.
pub struct UtxoStream<'a, S: EntrySource + 'a> {
    cursor: S::Cursor<'a>,
    filter: UtxoFilter,
    pending: VecDeque<SnapshotUtxo>,
    done: bool,
}

impl<'a, S: EntrySource + 'a> UtxoStream<'a, S> {
    pub fn new(source: &'a S, filter: UtxoFilter) -> Result<Self> {
        let mut cursor = source.cursor()?;
        cursor.seek_to_first();
        Ok(Self {
            cursor,
            filter,
            pending: VecDeque::new(),
            done: false,
        })
    }

    /// Advances the cursor to the next accepted record and queues its outputs.
    fn fill(&mut self) -> Result<()> {
        while self.pending.is_empty() && self.cursor.valid() {
            if let (Some(key), Some(value)) = (self.cursor.key(), self.cursor.value()) {
                if let Some((txid, entry)) = self.filter.accept_record(key, value) {
                    self.pending
                        .extend(self.filter.eligible_outputs(txid, &entry).map(
                            |(outpoint, output)| SnapshotUtxo {
                                outpoint,
                                leaf: leaf_hash(&outpoint, output),
                                output: output.clone(),
                                height: entry.height,
                            },
                        ));
                }
            }
            self.cursor.next();
        }

        if self.pending.is_empty() {
            self.done = true;
            self.cursor.status()?;
        }

        Ok(())
    }
}

impl<'a, S: EntrySource + 'a> Iterator for UtxoStream<'a, S> {
    type Item = Result<SnapshotUtxo>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Err(err) = self.fill() {
            return Some(Err(err));
        }
        self.pending.pop_front().map(Ok)
    }
}

/// Iterator over the leaf hashes of one ledger scan, in physical store order.
pub struct LeafStream<'a, S: EntrySource + 'a> {
    inner: UtxoStream<'a, S>,
}

impl<'a, S: EntrySource + 'a> LeafStream<'a, S> {
    pub fn new(source: &'a S, filter: UtxoFilter) -> Result<Self> {
        Ok(Self {
            inner: UtxoStream::new(source, filter)?,
        })
    }
}

impl<'a, S: EntrySource + 'a> Iterator for LeafStream<'a, S> {
    type Item = Result<LeafHash>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|utxo| utxo.map(|utxo| utxo.leaf))
    }
}
