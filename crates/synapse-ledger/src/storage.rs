//! Ledger storage implementation using RocksDB.

use crate::source::{EntrySource, RawCursor};
use crate::{Error, LedgerEntry, Result, cf, entry_key};
use bitcoin::Txid;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;

/// On-disk ledger of transaction records.
pub struct LedgerDb {
    /// RocksDB instance.
    db: DB,
}

impl LedgerDb {
    /// Open or create the ledger at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        // Enable bloom filters for faster point lookups
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        db_opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(cf::COINS, Options::default())];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!("Opened ledger at {}", path.display());

        Ok(Self { db })
    }

    /// Open an existing ledger without the right to write.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let db_opts = Options::default();
        let db = DB::open_cf_for_read_only(&db_opts, path, [cf::COINS], false)?;

        tracing::info!("Opened ledger at {} (read-only)", path.display());

        Ok(Self { db })
    }

    /// Store the record of `txid`, replacing any previous one.
    ///
    /// A fully spent record is removed instead.
    pub fn put_entry(&self, txid: &Txid, entry: &LedgerEntry) -> Result<()> {
        let cf = self.db.cf_handle(cf::COINS).ok_or(Error::NotInitialized)?;
        let key = entry_key(txid);
        if entry.is_fully_spent() {
            self.db.delete_cf(cf, key)?;
        } else {
            self.db.put_cf(cf, key, entry.encode()?)?;
        }
        Ok(())
    }

    pub fn delete_entry(&self, txid: &Txid) -> Result<()> {
        let cf = self.db.cf_handle(cf::COINS).ok_or(Error::NotInitialized)?;
        self.db.delete_cf(cf, entry_key(txid))?;
        Ok(())
    }

    /// Write raw bytes under an arbitrary key.
    ///
    /// Foreign records (other tags, metadata) share the keyspace with transaction records.
    pub fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.db.cf_handle(cf::COINS).ok_or(Error::NotInitialized)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    /// Import records in a single atomic batch.
    ///
    /// Returns the number of records written.
    pub fn bulk_import(
        &self,
        entries: impl IntoIterator<Item = (Txid, LedgerEntry)>,
    ) -> Result<usize> {
        let cf = self.db.cf_handle(cf::COINS).ok_or(Error::NotInitialized)?;

        let mut batch = WriteBatch::default();
        let mut count = 0;

        for (txid, entry) in entries {
            if entry.is_fully_spent() {
                continue;
            }
            batch.put_cf(cf, entry_key(&txid), entry.encode()?);
            count += 1;
        }

        self.db.write(batch)?;

        tracing::debug!("Imported {count} ledger records");

        Ok(count)
    }
}

impl EntrySource for LedgerDb {
    type Cursor<'a> = LedgerCursor<'a>;

    fn cursor(&self) -> Result<Self::Cursor<'_>> {
        let cf = self.db.cf_handle(cf::COINS).ok_or(Error::NotInitialized)?;
        let mut iter = self.db.raw_iterator_cf(cf);
        iter.seek_to_first();
        Ok(LedgerCursor { iter })
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.db.cf_handle(cf::COINS).ok_or(Error::NotInitialized)?;
        Ok(self.db.get_cf(cf, key)?)
    }
}

/// Raw cursor over the ledger column family, in lexicographic key order.
pub struct LedgerCursor<'a> {
    iter: rocksdb::DBRawIterator<'a>,
}

impl RawCursor for LedgerCursor<'_> {
    fn seek_to_first(&mut self) {
        self.iter.seek_to_first();
    }

    fn valid(&self) -> bool {
        self.iter.valid()
    }

    fn next(&mut self) {
        self.iter.next();
    }

    fn key(&self) -> Option<&[u8]> {
        self.iter.key()
    }

    fn value(&self) -> Option<&[u8]> {
        self.iter.value()
    }

    fn status(&self) -> Result<()> {
        Ok(self.iter.status()?)
    }
}
