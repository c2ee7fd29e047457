use crate::Result;
use crate::cli::params::EngineParams;
use std::path::PathBuf;
use synapse_snapshot::KeyWallet;

/// Merkle root.
#[derive(Debug, Clone, clap::Parser)]
pub struct MerkleRoot {
    /// Also write the sorted leaf list used for the root to this file.
    #[clap(long, value_name = "PATH")]
    dump_leaves: Option<PathBuf>,

    #[allow(missing_docs)]
    #[clap(flatten)]
    pub engine_params: EngineParams,
}

impl MerkleRoot {
    pub fn run(self) -> Result<()> {
        let engine = super::open_engine(&self.engine_params, KeyWallet::new())?;

        let root = match self.dump_leaves {
            Some(path) => {
                let snapshot = engine.dump_leaves(&path)?;
                snapshot.root()
            }
            None => engine.compute_merkle_root()?,
        };

        if root.is_null() {
            tracing::warn!("Snapshot is empty, no output passed the filter");
        }

        println!("{root}");

        Ok(())
    }
}

/// Leaf list export.
#[derive(Debug, Clone, clap::Parser)]
pub struct DumpLeaves {
    /// Destination of the leaf list, one hex digest per line.
    #[clap(long, short, value_name = "PATH")]
    output: PathBuf,

    #[allow(missing_docs)]
    #[clap(flatten)]
    pub engine_params: EngineParams,
}

impl DumpLeaves {
    pub fn run(self) -> Result<()> {
        let engine = super::open_engine(&self.engine_params, KeyWallet::new())?;
        let snapshot = engine.dump_leaves(&self.output)?;
        println!("{}", snapshot.root());
        Ok(())
    }
}
