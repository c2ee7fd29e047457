use clap::Args;
use std::path::PathBuf;
use synapse_ledger::LedgerDb;
use synapse_snapshot::{EngineConfig, SigningFailurePolicy, UtxoFilter};

/// Location of the ledger database.
#[derive(Debug, Clone, Args)]
pub struct LedgerParams {
    /// Path to the ledger database.
    #[arg(long, short = 'd', value_name = "PATH")]
    pub ledger: PathBuf,
}

impl LedgerParams {
    /// Opens the ledger without write access, queries never modify it.
    pub fn open_read_only(&self) -> crate::Result<LedgerDb> {
        Ok(LedgerDb::open_read_only(&self.ledger)?)
    }
}

/// Height window selecting the records that enter the snapshot.
#[derive(Debug, Clone, Args)]
pub struct FilterParams {
    /// Lowest inclusion height of an eligible record.
    #[arg(long, value_name = "HEIGHT")]
    pub min_height: Option<u32>,

    /// Highest inclusion height of an eligible record.
    #[arg(long, value_name = "HEIGHT")]
    pub max_height: Option<u32>,
}

impl FilterParams {
    pub fn utxo_filter(&self) -> UtxoFilter {
        UtxoFilter::new(self.min_height, self.max_height)
    }
}

/// Parameters shared by every command that runs the snapshot engine.
#[derive(Debug, Clone, Args)]
pub struct EngineParams {
    #[allow(missing_docs)]
    #[clap(flatten)]
    pub ledger_params: LedgerParams,

    #[allow(missing_docs)]
    #[clap(flatten)]
    pub filter_params: FilterParams,

    /// What to do with owned outputs the wallet cannot sign for.
    ///
    /// One of `emit-empty`, `drop` or `fail-fast`.
    #[arg(long, value_name = "POLICY", default_value = "emit-empty")]
    pub on_signing_failure: SigningFailurePolicy,
}

impl EngineParams {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            filter: self.filter_params.utxo_filter(),
            signing_failure: self.on_signing_failure,
        }
    }
}
