//! Construction of the snapshot Merkle tree.
//!
//! Leaves are sorted before folding so the root does not depend on the physical order in
//! which the store yields its records. Each level pairs neighbours left to right; an odd
//! trailing node is paired with itself.

use crate::leaf::{LeafHash, combine};
use crate::leaves::LeafStream;
use crate::proof::{Proof, generate_proof};
use crate::{Result, UtxoFilter};
use bitcoin::hashes::Hash;
use std::cmp::Ordering;
use std::io::Write;
use synapse_ledger::EntrySource;

/// Collects every eligible leaf of one ledger scan, sorted ascending by value.
///
/// If `target` is given, also returns the index of its first occurrence in the sorted list.
pub fn build_hash_list<S: EntrySource>(
    source: &S,
    filter: UtxoFilter,
    target: Option<&LeafHash>,
) -> Result<(Vec<LeafHash>, Option<usize>)> {
    let mut list = LeafStream::new(source, filter)?.collect::<Result<Vec<_>>>()?;
    list.sort_unstable_by(LeafHash::cmp_value);

    tracing::debug!("Collected {} snapshot leaves", list.len());

    let index = target.and_then(|target| position(&list, target));

    Ok((list, index))
}

/// Index of the first occurrence of `hash` in a sorted list.
fn position(list: &[LeafHash], hash: &LeafHash) -> Option<usize> {
    let index = list.partition_point(|leaf| leaf.cmp_value(hash) == Ordering::Less);
    (list.get(index) == Some(hash)).then_some(index)
}

/// Folds one level in place: `list[i] = combine(list[2i], list[2i + 1])`.
///
/// The resulting length is `ceil(n / 2)`.
pub fn move_up(list: &mut Vec<LeafHash>) {
    let count = list.len();
    let half = count.div_ceil(2);

    for i in 0..half {
        let left = i * 2;
        let right = if left + 1 < count { left + 1 } else { left };
        list[i] = combine(&list[left], &list[right]);
    }

    list.truncate(half);
}

/// Folds a sorted leaf list down to its root.
///
/// Returns the null sentinel for an empty list.
pub fn fold_root(mut list: Vec<LeafHash>) -> LeafHash {
    while list.len() > 1 {
        move_up(&mut list);
    }
    list.first().copied().unwrap_or_else(LeafHash::all_zeros)
}

/// Computes the snapshot root of the ledger in one full scan.
pub fn compute_merkle_root<S: EntrySource>(source: &S, filter: UtxoFilter) -> Result<LeafHash> {
    let (list, _) = build_hash_list(source, filter, None)?;
    Ok(fold_root(list))
}

/// Generates the inclusion proof of `leaf` in one full scan.
///
/// A leaf absent from the snapshot yields an empty proof.
pub fn get_proof<S: EntrySource>(source: &S, filter: UtxoFilter, leaf: &LeafHash) -> Result<Proof> {
    let (mut list, index) = build_hash_list(source, filter, Some(leaf))?;
    Ok(index
        .map(|index| generate_proof(&mut list, index))
        .unwrap_or_default())
}

/// A materialized snapshot: the sorted leaves of one scan.
///
/// Holding a `Snapshot` lets callers answer many root and proof queries without
/// rescanning the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    leaves: Vec<LeafHash>,
}

impl Snapshot {
    /// Builds a snapshot from leaves in any order.
    pub fn from_leaves(mut leaves: Vec<LeafHash>) -> Self {
        leaves.sort_unstable_by(LeafHash::cmp_value);
        Self { leaves }
    }

    /// Scans the ledger once and keeps the sorted leaves.
    pub fn collect<S: EntrySource>(source: &S, filter: UtxoFilter) -> Result<Self> {
        let (leaves, _) = build_hash_list(source, filter, None)?;
        Ok(Self { leaves })
    }

    /// Sorted leaves, in folding order.
    pub fn leaves(&self) -> &[LeafHash] {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn position(&self, leaf: &LeafHash) -> Option<usize> {
        position(&self.leaves, leaf)
    }

    pub fn contains(&self, leaf: &LeafHash) -> bool {
        self.position(leaf).is_some()
    }

    pub fn root(&self) -> LeafHash {
        fold_root(self.leaves.clone())
    }

    /// Inclusion proof of `leaf`, or `None` if it is not part of the snapshot.
    ///
    /// A snapshot of exactly one leaf proves it with an empty proof.
    pub fn proof(&self, leaf: &LeafHash) -> Option<Proof> {
        let index = self.position(leaf)?;
        let mut list = self.leaves.clone();
        Some(generate_proof(&mut list, index))
    }

    /// Every level of the tree, from the sorted leaves up to the root.
    pub fn levels(&self) -> Vec<Vec<LeafHash>> {
        let mut levels = Vec::new();
        let mut list = self.leaves.clone();
        while list.len() > 1 {
            let next = {
                let mut next = list.clone();
                move_up(&mut next);
                next
            };
            levels.push(std::mem::replace(&mut list, next));
        }
        if !list.is_empty() {
            levels.push(list);
        }
        levels
    }

    /// Writes the sorted leaves, one hex digest per line.
    pub fn write_leaves<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for leaf in &self.leaves {
            writeln!(writer, "{leaf}")?;
        }
        writer.flush()
    }
}
