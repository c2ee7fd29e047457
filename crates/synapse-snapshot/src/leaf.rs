//! Leaf hashing of individual outputs.

use bitcoin::OutPoint;
use bitcoin::consensus::serialize;
use bitcoin::hashes::{Hash, HashEngine, hash_newtype, sha256d};
use std::cmp::Ordering;
use synapse_ledger::TxOutEntry;

hash_newtype! {
    /// Digest of one node of the snapshot tree, a leaf or an interior node.
    ///
    /// Displayed most significant byte first, like txids.
    #[hash_newtype(backward)]
    pub struct LeafHash(sha256d::Hash);
}

impl LeafHash {
    /// Returns `true` for the sentinel used as the root of an empty snapshot.
    pub fn is_null(&self) -> bool {
        *self == Self::all_zeros()
    }

    /// Compares digests as 256-bit numbers, most significant byte first.
    ///
    /// This is the order of the hex text form. The derived `Ord` compares the raw
    /// (little-endian) bytes instead and must not be used to order snapshot leaves.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        self.as_byte_array()
            .iter()
            .rev()
            .cmp(other.as_byte_array().iter().rev())
    }
}

/// Serializes the leaf preimage of an unspent output.
///
/// Layout: outpoint (txid || vout LE32) || script (compact size prefixed) || amount LE64.
pub fn leaf_preimage(outpoint: &OutPoint, output: &TxOutEntry) -> Vec<u8> {
    let mut data = serialize(outpoint);
    data.extend_from_slice(&serialize(&output.script()));
    data.extend_from_slice(&serialize(&output.amount));
    data
}

/// Computes the leaf hash of an unspent output.
pub fn leaf_hash(outpoint: &OutPoint, output: &TxOutEntry) -> LeafHash {
    LeafHash::hash(&leaf_preimage(outpoint, output))
}

/// Same as [`leaf_hash`], but yields `None` for a spent (null) output.
pub fn checked_leaf_hash(outpoint: &OutPoint, output: Option<&TxOutEntry>) -> Option<LeafHash> {
    output.map(|output| leaf_hash(outpoint, output))
}

/// Hashes two sibling nodes into their parent. The operand order matters.
pub fn combine(left: &LeafHash, right: &LeafHash) -> LeafHash {
    let mut engine = LeafHash::engine();
    engine.input(left.as_byte_array());
    engine.input(right.as_byte_array());
    LeafHash::from_engine(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::Txid;

    fn outpoint(byte: u8, vout: u32) -> OutPoint {
        OutPoint::new(Txid::from_byte_array([byte; 32]), vout)
    }

    #[test]
    fn test_leaf_hash_preimage() {
        let output = TxOutEntry::new(5_000_000_000, vec![0x51, 0x52]);
        let op = outpoint(0xab, 1);

        let mut preimage = vec![0xab; 32];
        preimage.extend_from_slice(&1u32.to_le_bytes());
        preimage.extend_from_slice(&[0x02, 0x51, 0x52]);
        preimage.extend_from_slice(&5_000_000_000u64.to_le_bytes());

        assert_eq!(leaf_preimage(&op, &output), preimage);
        assert_eq!(
            leaf_hash(&op, &output).to_byte_array(),
            sha256d::Hash::hash(&preimage).to_byte_array()
        );
    }

    #[test]
    fn test_leaf_hash_covers_every_field() {
        let output = TxOutEntry::new(1_000, vec![0x51]);
        let base = leaf_hash(&outpoint(1, 0), &output);

        assert_ne!(base, leaf_hash(&outpoint(2, 0), &output));
        assert_ne!(base, leaf_hash(&outpoint(1, 1), &output));
        assert_ne!(base, leaf_hash(&outpoint(1, 0), &TxOutEntry::new(1_001, vec![0x51])));
        assert_ne!(base, leaf_hash(&outpoint(1, 0), &TxOutEntry::new(1_000, vec![0x52])));
        assert_eq!(base, leaf_hash(&outpoint(1, 0), &output));
    }

    #[test]
    fn test_checked_leaf_hash_skips_null_output() {
        let op = outpoint(1, 0);
        assert_eq!(checked_leaf_hash(&op, None), None);
        let output = TxOutEntry::new(1, vec![]);
        assert_eq!(checked_leaf_hash(&op, Some(&output)), Some(leaf_hash(&op, &output)));
    }

    #[test]
    fn test_combine_is_order_sensitive() {
        let a = LeafHash::from_byte_array([1; 32]);
        let b = LeafHash::from_byte_array([2; 32]);

        let mut concat = [1u8; 64];
        concat[32..].copy_from_slice(&[2; 32]);

        assert_eq!(
            combine(&a, &b).to_byte_array(),
            sha256d::Hash::hash(&concat).to_byte_array()
        );
        assert_ne!(combine(&a, &b), combine(&b, &a));
    }

    #[test]
    fn test_hex_is_most_significant_byte_first() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0xab;
        let hash = LeafHash::from_byte_array(bytes);
        let hex = hash.to_string();
        assert!(hex.starts_with("ab00"));
        assert_eq!(hex.len(), 64);
        assert_eq!(hex.parse::<LeafHash>().unwrap(), hash);
        assert!(LeafHash::all_zeros().is_null());
    }

    #[test]
    fn test_value_order_follows_hex_form() {
        let mut high = [0u8; 32];
        high[31] = 0x01;
        let mut low = [0u8; 32];
        low[0] = 0xff;
        let (high, low) = (LeafHash::from_byte_array(high), LeafHash::from_byte_array(low));

        // Raw byte order disagrees with the value.
        assert!(low > high);
        assert_eq!(high.cmp_value(&low), Ordering::Greater);
        assert_eq!(low.cmp_value(&high), Ordering::Less);
        assert_eq!(high.cmp_value(&high), Ordering::Equal);
        assert!(low.to_string() < high.to_string());
    }
}
