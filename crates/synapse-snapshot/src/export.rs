//! Text forms of roots, proofs, unlock items and leaf lists.

use crate::leaf::LeafHash;
use crate::proof::{Proof, ProofNode, Side};
use crate::unlock::UnlockItem;
use crate::{Error, Result};
use bitcoin::{OutPoint, ScriptBuf, Txid};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Proof node as exported: the side flag and the hex digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNodeJson {
    /// Whether the hash combines on the left of the running hash.
    pub left: bool,
    pub hash: String,
}

impl From<&ProofNode> for ProofNodeJson {
    fn from(node: &ProofNode) -> Self {
        Self {
            left: node.side == Side::Left,
            hash: node.hash.to_string(),
        }
    }
}

impl TryFrom<ProofNodeJson> for ProofNode {
    type Error = Error;

    fn try_from(node: ProofNodeJson) -> Result<Self> {
        Ok(Self {
            side: if node.left { Side::Left } else { Side::Right },
            hash: parse_hash(&node.hash)?,
        })
    }
}

/// Unlock item as exported, binary fields in hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockItemJson {
    pub txid: String,
    pub vout: u32,
    pub script: String,
    pub amount: u64,
    pub redeem: String,
}

impl From<&UnlockItem> for UnlockItemJson {
    fn from(item: &UnlockItem) -> Self {
        Self {
            txid: item.outpoint.txid.to_string(),
            vout: item.outpoint.vout,
            script: hex::encode(item.script_pubkey.as_bytes()),
            amount: item.amount,
            redeem: hex::encode(&item.redeem),
        }
    }
}

impl TryFrom<UnlockItemJson> for UnlockItem {
    type Error = Error;

    fn try_from(item: UnlockItemJson) -> Result<Self> {
        let UnlockItemJson {
            txid,
            vout,
            script,
            amount,
            redeem,
        } = item;

        let txid = txid
            .parse::<Txid>()
            .map_err(|err| Error::InvalidHash(format!("{txid}: {err}")))?;

        Ok(Self {
            outpoint: OutPoint::new(txid, vout),
            script_pubkey: ScriptBuf::from_bytes(hex::decode(script)?),
            amount,
            redeem: hex::decode(redeem)?,
        })
    }
}

/// Parses a digest from its hex text form.
pub fn parse_hash(s: &str) -> Result<LeafHash> {
    s.trim()
        .parse::<LeafHash>()
        .map_err(|err| Error::InvalidHash(format!("{s}: {err}")))
}

pub fn proof_to_json(proof: &Proof) -> Result<String> {
    let nodes = proof.nodes().iter().map(ProofNodeJson::from).collect::<Vec<_>>();
    Ok(serde_json::to_string_pretty(&nodes)?)
}

pub fn proof_from_json(s: &str) -> Result<Proof> {
    let nodes: Vec<ProofNodeJson> = serde_json::from_str(s)?;
    nodes
        .into_iter()
        .map(ProofNode::try_from)
        .collect::<Result<Vec<_>>>()
        .map(Proof)
}

pub fn unlock_items_to_json(items: &[UnlockItem]) -> Result<String> {
    let items = items.iter().map(UnlockItemJson::from).collect::<Vec<_>>();
    Ok(serde_json::to_string_pretty(&items)?)
}

pub fn unlock_items_from_json(s: &str) -> Result<Vec<UnlockItem>> {
    let items: Vec<UnlockItemJson> = serde_json::from_str(s)?;
    items.into_iter().map(UnlockItem::try_from).collect()
}

/// Reads a leaf list written by [`crate::Snapshot::write_leaves`].
///
/// Blank lines are ignored. The list is meant for offline audit, the order is kept as is.
pub fn read_leaves<R: BufRead>(reader: R) -> Result<Vec<LeafHash>> {
    let mut leaves = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        leaves.push(parse_hash(&line)?);
    }
    Ok(leaves)
}
