//! Top level entry points over shared ledger and wallet state.

use crate::forest::{self, Snapshot};
use crate::leaf::LeafHash;
use crate::proof::{Proof, compute_proof_root};
use crate::unlock::{Signer, SigningFailurePolicy, UnlockItem, Wallet, build_unlock_items};
use crate::{Result, UtxoFilter};
use parking_lot::RwLock;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use synapse_ledger::EntrySource;

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub filter: UtxoFilter,
    pub signing_failure: SigningFailurePolicy,
}

/// Snapshot engine over an injected ledger and wallet.
///
/// Every call rescans the ledger; nothing is cached between calls. Use
/// [`SwapEngine::snapshot`] to keep one scan around explicitly.
///
/// Lock order: ledger, then wallet.
pub struct SwapEngine<L, W> {
    ledger: Arc<RwLock<L>>,
    wallet: Arc<RwLock<W>>,
    config: EngineConfig,
}

impl<L, W> SwapEngine<L, W>
where
    L: EntrySource,
    W: Wallet + Signer,
{
    pub fn new(ledger: Arc<RwLock<L>>, wallet: Arc<RwLock<W>>, config: EngineConfig) -> Self {
        Self {
            ledger,
            wallet,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Root of the current snapshot, the null sentinel if it is empty.
    pub fn compute_merkle_root(&self) -> Result<LeafHash> {
        let ledger = self.ledger.read();
        let root = forest::compute_merkle_root(&*ledger, self.config.filter)?;
        tracing::info!("Computed snapshot root {root}");
        Ok(root)
    }

    /// Inclusion proof of `leaf` in the current snapshot, empty if it is absent.
    pub fn get_proof(&self, leaf: &LeafHash) -> Result<Proof> {
        let ledger = self.ledger.read();
        let proof = forest::get_proof(&*ledger, self.config.filter, leaf)?;
        if proof.is_empty() {
            tracing::debug!("Leaf {leaf} yields an empty proof");
        }
        Ok(proof)
    }

    pub fn compute_proof_root(&self, leaf: &LeafHash, proof: &Proof) -> LeafHash {
        compute_proof_root(leaf, proof)
    }

    /// Takes one snapshot of the ledger for repeated queries.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let ledger = self.ledger.read();
        Snapshot::collect(&*ledger, self.config.filter)
    }

    /// Writes the sorted leaf list of the current snapshot to `path`.
    pub fn dump_leaves(&self, path: &Path) -> Result<Snapshot> {
        let snapshot = self.snapshot()?;
        let mut writer = BufWriter::new(File::create(path)?);
        snapshot.write_leaves(&mut writer)?;
        tracing::info!("Wrote {} leaves to {}", snapshot.len(), path.display());
        Ok(snapshot)
    }

    /// Unlock items for the wallet's outputs in the current snapshot.
    pub fn get_unlock_items(&self) -> Result<Vec<UnlockItem>> {
        let ledger = self.ledger.read();
        let wallet = self.wallet.read();
        build_unlock_items(
            &*ledger,
            &*wallet,
            self.config.filter,
            self.config.signing_failure,
        )
    }
}
