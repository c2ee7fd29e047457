//! Inclusion proofs over the snapshot tree.

use crate::forest::move_up;
use crate::leaf::{LeafHash, combine};

/// Side on which a proof node is combined with the running hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The node hash is the left operand.
    Left,
    /// The node hash is the right operand.
    Right,
}

/// One level of an inclusion proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofNode {
    pub side: Side,
    pub hash: LeafHash,
}

/// Sibling hashes from the leaf level up to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proof(pub Vec<ProofNode>);

impl Proof {
    pub fn nodes(&self) -> &[ProofNode] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ProofNode>> for Proof {
    fn from(nodes: Vec<ProofNode>) -> Self {
        Self(nodes)
    }
}

/// Generates the proof for the leaf at `index` of a sorted leaf list.
///
/// The list is folded in place; on return it holds the root (or is empty). A single leaf
/// list yields an empty proof.
pub(crate) fn generate_proof(list: &mut Vec<LeafHash>, mut index: usize) -> Proof {
    debug_assert!(index < list.len());

    let mut nodes = Vec::new();

    while list.len() > 1 {
        let node = if index & 1 == 0 {
            // An odd tail is paired with itself, as in `move_up`.
            let sibling = list.get(index + 1).unwrap_or(&list[index]);
            ProofNode {
                side: Side::Right,
                hash: *sibling,
            }
        } else {
            ProofNode {
                side: Side::Left,
                hash: list[index - 1],
            }
        };
        nodes.push(node);

        move_up(list);
        index >>= 1;
    }

    Proof(nodes)
}

/// Recomputes the root committed to by `proof` for `leaf`.
///
/// Membership holds iff the result equals a trusted root.
pub fn compute_proof_root(leaf: &LeafHash, proof: &Proof) -> LeafHash {
    proof.0.iter().fold(*leaf, |hash, node| match node.side {
        Side::Left => combine(&node.hash, &hash),
        Side::Right => combine(&hash, &node.hash),
    })
}

pub fn verify_proof(leaf: &LeafHash, proof: &Proof, root: &LeafHash) -> bool {
    compute_proof_root(leaf, proof) == *root
}
