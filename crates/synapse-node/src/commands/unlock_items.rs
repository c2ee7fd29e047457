use crate::Result;
use crate::cli::params::EngineParams;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use synapse_snapshot::{KeyWallet, unlock_items_to_json};

/// Unlock items.
#[derive(Debug, Clone, clap::Parser)]
pub struct UnlockItems {
    /// File of WIF encoded private keys, one per line.
    #[clap(long, value_name = "PATH")]
    wallet: PathBuf,

    /// Write the unlock items JSON to this file instead of stdout.
    #[clap(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    #[allow(missing_docs)]
    #[clap(flatten)]
    pub engine_params: EngineParams,
}

impl UnlockItems {
    pub fn run(self) -> Result<()> {
        let ledger = self.engine_params.ledger_params.open_read_only()?;
        let filter = self.engine_params.filter_params.utxo_filter();

        let mut wallet = KeyWallet::from_wif_lines(BufReader::new(File::open(&self.wallet)?))?;
        let owned = wallet.discover(&ledger, filter)?;

        tracing::info!(
            "Wallet holds {} keys owning {owned} ledger transactions",
            wallet.key_count()
        );

        let engine = super::new_engine(&self.engine_params, ledger, wallet);
        let items = engine.get_unlock_items()?;

        let signed = items.iter().filter(|item| item.is_signed()).count();
        tracing::info!("Built {} unlock items, {signed} signed", items.len());

        super::emit(&unlock_items_to_json(&items)?, self.output.as_deref())
    }
}
