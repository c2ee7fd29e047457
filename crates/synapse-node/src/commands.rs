pub mod dump_utxo;
pub mod import_csv;
pub mod merkle_root;
pub mod proof;
pub mod unlock_items;

use crate::Result;
use crate::cli::params::EngineParams;
use parking_lot::RwLock;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use synapse_ledger::LedgerDb;
use synapse_snapshot::{KeyWallet, SwapEngine};

/// Opens the ledger read-only and wraps it, together with `wallet`, in an engine.
fn open_engine(
    params: &EngineParams,
    wallet: KeyWallet,
) -> Result<SwapEngine<LedgerDb, KeyWallet>> {
    let ledger = params.ledger_params.open_read_only()?;
    Ok(new_engine(params, ledger, wallet))
}

fn new_engine(
    params: &EngineParams,
    ledger: LedgerDb,
    wallet: KeyWallet,
) -> SwapEngine<LedgerDb, KeyWallet> {
    SwapEngine::new(
        Arc::new(RwLock::new(ledger)),
        Arc::new(RwLock::new(wallet)),
        params.engine_config(),
    )
}

/// Writes `text` to `path`, or to stdout if no path is given.
fn emit(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            writeln!(file, "{text}")?;
            tracing::info!("Output written to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
