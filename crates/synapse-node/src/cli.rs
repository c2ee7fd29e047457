pub mod params;

use crate::commands::dump_utxo::DumpUtxo;
use crate::commands::import_csv::ImportCsv;
use crate::commands::merkle_root::{DumpLeaves, MerkleRoot};
use crate::commands::proof::{Proof, Verify};
use crate::commands::unlock_items::UnlockItems;
use clap::Parser;

const VERSION: &str = "0.1.0";

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Compute the Merkle root of the ledger snapshot.
    #[command(name = "merkle-root")]
    MerkleRoot(MerkleRoot),

    /// Generate the inclusion proof of one leaf.
    Proof(Proof),

    /// Fold a proof and compare the result against a root.
    Verify(Verify),

    /// Build the unlock items of the outputs owned by a key wallet.
    #[command(name = "unlock-items")]
    UnlockItems(UnlockItems),

    /// Write the sorted leaf list of the snapshot.
    #[command(name = "dump-leaves")]
    DumpLeaves(DumpLeaves),

    /// Summarize the unspent outputs stored in the ledger.
    #[command(name = "dump-utxo")]
    DumpUtxo(DumpUtxo),

    /// Load a UTXO set CSV dump into the ledger.
    #[command(name = "import-csv")]
    ImportCsv(ImportCsv),
}

/// Synapse
#[derive(Debug, Parser)]
#[clap(version = VERSION)]
#[clap(about = "Snapshot Merkle engine over a ledger's unspent outputs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter directives, e.g. `synapse_snapshot=debug`.
    ///
    /// Overrides `RUST_LOG` when given.
    #[arg(long, short = 'l', value_name = "DIRECTIVES")]
    pub log: Option<String>,
}

pub fn run() -> crate::Result<()> {
    let Cli { command, log } = Cli::parse();

    crate::logging::init(log.as_deref())?;

    command.run()
}

impl Command {
    pub fn run(self) -> crate::Result<()> {
        match self {
            Self::MerkleRoot(cmd) => cmd.run(),
            Self::Proof(cmd) => cmd.run(),
            Self::Verify(cmd) => cmd.run(),
            Self::UnlockItems(cmd) => cmd.run(),
            Self::DumpLeaves(cmd) => cmd.run(),
            Self::DumpUtxo(cmd) => cmd.run(),
            Self::ImportCsv(cmd) => cmd.run(),
        }
    }
}
