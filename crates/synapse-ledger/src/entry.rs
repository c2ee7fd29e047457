//! Ledger record model and key codec.

use bitcoin::hashes::Hash;
use bitcoin::{Amount, ScriptBuf, TxOut, Txid};
use serde::{Deserialize, Serialize};

/// Tag byte of a transaction record key.
pub const TAG_COINS: u8 = b'c';

/// Width of a transaction record key: tag (1 byte) || txid (32 bytes).
pub const ENTRY_KEY_LEN: usize = 33;

/// Convert a txid to its record key.
pub fn entry_key(txid: &Txid) -> [u8; ENTRY_KEY_LEN] {
    let mut key = [0u8; ENTRY_KEY_LEN];
    key[0] = TAG_COINS;
    key[1..].copy_from_slice(txid.as_byte_array());
    key
}

/// Parse a record key back to the txid.
///
/// Returns `None` for keys that are not transaction records (wrong width or tag).
pub fn parse_entry_key(key: &[u8]) -> Option<Txid> {
    if key.len() != ENTRY_KEY_LEN || key[0] != TAG_COINS {
        return None;
    }
    let txid_bytes: [u8; 32] = key[1..].try_into().ok()?;
    Some(Txid::from_byte_array(txid_bytes))
}

/// A single transaction output as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutEntry {
    /// Output value in satoshis.
    pub amount: u64,
    /// Spending condition of the output.
    pub script_pubkey: Vec<u8>,
}

impl TxOutEntry {
    pub fn new(amount: u64, script_pubkey: impl Into<Vec<u8>>) -> Self {
        Self {
            amount,
            script_pubkey: script_pubkey.into(),
        }
    }

    pub fn script(&self) -> ScriptBuf {
        ScriptBuf::from_bytes(self.script_pubkey.clone())
    }

    pub fn to_txout(&self) -> TxOut {
        TxOut {
            value: Amount::from_sat(self.amount),
            script_pubkey: self.script(),
        }
    }
}

impl From<TxOut> for TxOutEntry {
    fn from(txout: TxOut) -> Self {
        Self {
            amount: txout.value.to_sat(),
            script_pubkey: txout.script_pubkey.into_bytes(),
        }
    }
}

/// All outputs of one transaction and their spent status.
///
/// Outputs are indexed by `vout`; a spent output is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Block height at which the transaction was included.
    pub height: u32,
    /// Whether the transaction is a coinbase.
    pub is_coinbase: bool,
    /// Outputs by index, `None` once spent.
    pub outputs: Vec<Option<TxOutEntry>>,
}

impl LedgerEntry {
    pub fn new(height: u32, is_coinbase: bool, outputs: Vec<Option<TxOutEntry>>) -> Self {
        Self {
            height,
            is_coinbase,
            outputs,
        }
    }

    /// Builds a record from a freshly confirmed transaction, every output unspent.
    pub fn from_outputs(height: u32, is_coinbase: bool, outputs: Vec<TxOut>) -> Self {
        Self {
            height,
            is_coinbase,
            outputs: outputs.into_iter().map(|o| Some(o.into())).collect(),
        }
    }

    pub fn encode(&self) -> crate::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> crate::Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Returns the output at `vout` if it exists and is unspent.
    pub fn output(&self, vout: u32) -> Option<&TxOutEntry> {
        self.outputs.get(vout as usize).and_then(Option::as_ref)
    }

    /// Iterates over unspent outputs with their index.
    pub fn unspent(&self) -> impl Iterator<Item = (u32, &TxOutEntry)> {
        self.outputs
            .iter()
            .enumerate()
            .filter_map(|(vout, output)| output.as_ref().map(|o| (vout as u32, o)))
    }

    /// Sum of all unspent output values, saturating at `u64::MAX`.
    pub fn unspent_amount(&self) -> u64 {
        self.unspent()
            .fold(0u64, |acc, (_, o)| acc.saturating_add(o.amount))
    }

    pub fn is_fully_spent(&self) -> bool {
        self.outputs.iter().all(Option::is_none)
    }

    /// Marks `vout` spent, returning the output if it was unspent.
    ///
    /// Trailing spent outputs are trimmed.
    pub fn spend(&mut self, vout: u32) -> Option<TxOutEntry> {
        let spent = self.outputs.get_mut(vout as usize)?.take();
        while matches!(self.outputs.last(), Some(None)) {
            self.outputs.pop();
        }
        spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key_roundtrip() {
        let txid = Txid::from_byte_array([7u8; 32]);
        let key = entry_key(&txid);
        assert_eq!(key[0], TAG_COINS);
        assert_eq!(parse_entry_key(&key), Some(txid));
    }

    #[test]
    fn test_parse_entry_key_rejects_foreign_keys() {
        let txid = Txid::from_byte_array([7u8; 32]);
        let mut key = entry_key(&txid);
        key[0] = b'B';
        assert_eq!(parse_entry_key(&key), None);
        assert_eq!(parse_entry_key(&key[..32]), None);
        assert_eq!(parse_entry_key(b"height"), None);
    }

    #[test]
    fn test_unspent_amount_and_spend() {
        let mut entry = LedgerEntry::new(
            10,
            false,
            vec![
                Some(TxOutEntry::new(1_000, vec![0x51])),
                None,
                Some(TxOutEntry::new(2_500, vec![0x52])),
            ],
        );
        assert_eq!(entry.unspent_amount(), 3_500);
        assert_eq!(entry.unspent().map(|(vout, _)| vout).collect::<Vec<_>>(), vec![0, 2]);
        assert!(entry.output(1).is_none());

        assert_eq!(entry.spend(2), Some(TxOutEntry::new(2_500, vec![0x52])));
        assert_eq!(entry.outputs.len(), 1);
        assert_eq!(entry.spend(0).map(|o| o.amount), Some(1_000));
        assert!(entry.is_fully_spent());
        assert_eq!(entry.unspent_amount(), 0);
    }

    #[test]
    fn test_entry_encoding() {
        let entry = LedgerEntry::new(1, true, vec![Some(TxOutEntry::new(50, vec![0xac])), None]);
        let decoded = LedgerEntry::decode(&entry.encode().unwrap()).unwrap();
        assert_eq!(entry, decoded);
        assert!(LedgerEntry::decode(&[0xff]).is_err());
    }
}
