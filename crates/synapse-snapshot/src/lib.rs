//! Snapshot Merkle engine for ledger migration.
//!
//! Computes a deterministic Merkle root over the unspent outputs of the ledger, proves
//! the inclusion of individual outputs, and builds unlock items that carry an output's
//! identity along with a signature authorizing its claim on the successor ledger.
//!
//! ## Tree
//!
//! - Leaves are `sha256d(outpoint || script || amount)` of every eligible output.
//! - Leaves are sorted ascending by value (the order of their hex form) before folding,
//!   the store order is irrelevant.
//! - Each level combines neighbours as `sha256d(left || right)`, an odd tail is paired
//!   with itself.
//! - The root of an empty snapshot is all zeros.

mod engine;
mod error;
mod export;
mod filter;
mod forest;
mod key_wallet;
mod leaf;
mod leaves;
mod proof;
mod unlock;

pub use self::engine::{EngineConfig, SwapEngine};
pub use self::error::Error;
pub use self::export::{
    ProofNodeJson, UnlockItemJson, parse_hash, proof_from_json, proof_to_json, read_leaves,
    unlock_items_from_json, unlock_items_to_json,
};
pub use self::filter::UtxoFilter;
pub use self::forest::{
    Snapshot, build_hash_list, compute_merkle_root, fold_root, get_proof, move_up,
};
pub use self::key_wallet::KeyWallet;
pub use self::leaf::{LeafHash, checked_leaf_hash, combine, leaf_hash, leaf_preimage};
pub use self::leaves::{LeafStream, SnapshotUtxo, UtxoStream};
pub use self::proof::{Proof, ProofNode, Side, compute_proof_root, verify_proof};
pub use self::unlock::{
    Signer, SigningFailurePolicy, UnlockItem, Wallet, build_unlock_items, claim_skeleton,
};

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, Error>;
