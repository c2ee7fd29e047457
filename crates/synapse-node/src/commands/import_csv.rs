use crate::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;
use synapse_ledger::{LedgerDb, import_csv};

/// CSV import.
#[derive(Debug, Clone, clap::Parser)]
pub struct ImportCsv {
    /// UTXO set CSV, rows of `txid,vout,is_coinbase,amount,height,script_pubkey`.
    #[clap(long, value_name = "PATH")]
    csv: PathBuf,

    /// Ledger database to write into, created if missing.
    #[clap(long, short = 'd', value_name = "PATH")]
    ledger: PathBuf,
}

impl ImportCsv {
    pub fn run(self) -> Result<()> {
        let now = Instant::now();

        let ledger = LedgerDb::open(&self.ledger)?;
        let records = import_csv(&ledger, BufReader::new(File::open(&self.csv)?))?;

        tracing::info!(
            "Imported {records} records into {} in {}ms",
            self.ledger.display(),
            now.elapsed().as_millis()
        );

        Ok(())
    }
}
