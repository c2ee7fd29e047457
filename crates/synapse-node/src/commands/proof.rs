use crate::cli::params::EngineParams;
use crate::{Error, Result};
use bitcoin::OutPoint;
use std::path::PathBuf;
use synapse_ledger::{EntrySource, LedgerDb};
use synapse_snapshot::{
    KeyWallet, LeafHash, compute_proof_root, leaf_hash, proof_from_json, proof_to_json,
};

/// Inclusion proof.
#[derive(Debug, Clone, clap::Parser)]
#[clap(group = clap::ArgGroup::new("target").required(true))]
pub struct Proof {
    /// Leaf digest to prove, in hex.
    #[clap(long, value_name = "HASH", group = "target")]
    leaf: Option<LeafHash>,

    /// Output to prove, as `txid:vout`.
    #[clap(long, value_name = "OUTPOINT", group = "target")]
    outpoint: Option<OutPoint>,

    /// Write the proof JSON to this file instead of stdout.
    #[clap(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    #[allow(missing_docs)]
    #[clap(flatten)]
    pub engine_params: EngineParams,
}

impl Proof {
    pub fn run(self) -> Result<()> {
        let ledger = self.engine_params.ledger_params.open_read_only()?;

        let leaf = match (self.leaf, self.outpoint) {
            (Some(leaf), _) => leaf,
            (None, Some(outpoint)) => outpoint_leaf(&ledger, outpoint)?,
            (None, None) => return Err(Error::MissingProofTarget),
        };

        let engine = super::new_engine(&self.engine_params, ledger, KeyWallet::new());
        let proof = engine.get_proof(&leaf)?;

        if proof.is_empty() {
            tracing::warn!("Proof of {leaf} is empty, the leaf is absent or the only one");
        } else {
            tracing::info!("Proof of {leaf} has {} nodes", proof.len());
        }

        super::emit(&proof_to_json(&proof)?, self.output.as_deref())
    }
}

/// Leaf of an unspent output looked up in the ledger.
fn outpoint_leaf(ledger: &LedgerDb, outpoint: OutPoint) -> Result<LeafHash> {
    let entry = ledger
        .get_entry(&outpoint.txid)?
        .ok_or(Error::UnknownOutput(outpoint))?;
    let output = entry
        .output(outpoint.vout)
        .ok_or(Error::UnknownOutput(outpoint))?;
    Ok(leaf_hash(&outpoint, output))
}

/// Proof verification.
#[derive(Debug, Clone, clap::Parser)]
pub struct Verify {
    /// Leaf digest the proof starts from, in hex.
    #[clap(long, value_name = "HASH")]
    leaf: LeafHash,

    /// Proof JSON file.
    #[clap(long, value_name = "PATH")]
    proof: PathBuf,

    /// Expected root, in hex.
    #[clap(long, value_name = "HASH")]
    root: LeafHash,
}

impl Verify {
    pub fn run(self) -> Result<()> {
        let proof = proof_from_json(&std::fs::read_to_string(&self.proof)?)?;
        let computed = compute_proof_root(&self.leaf, &proof);

        if computed != self.root {
            return Err(Error::ProofMismatch {
                leaf: self.leaf,
                computed,
                expected: self.root,
            });
        }

        println!("Proof of {} is valid against {}", self.leaf, self.root);

        Ok(())
    }
}
