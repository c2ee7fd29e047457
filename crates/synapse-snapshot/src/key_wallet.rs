//! In-memory key wallet signing legacy claims.

use crate::leaves::UtxoStream;
use crate::unlock::{Signer, Wallet};
use crate::{Error, Result, UtxoFilter};
use bitcoin::hashes::Hash;
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::secp256k1::{All, Message, Secp256k1};
use bitcoin::sighash::SighashCache;
use bitcoin::{
    EcdsaSighashType, OutPoint, PrivateKey, PublicKey, ScriptBuf, Transaction, TxOut, Txid,
};
use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;
use synapse_ledger::EntrySource;

/// Script templates the wallet can sign for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptKind {
    P2pkh,
    P2pk,
}

/// A wallet of secp256k1 keys.
///
/// Owns every output paying to one of its keys through P2PKH or P2PK.
pub struct KeyWallet {
    secp: Secp256k1<All>,
    keys: Vec<(PrivateKey, PublicKey)>,
    scripts: HashMap<ScriptBuf, (usize, ScriptKind)>,
    transactions: BTreeSet<Txid>,
}

impl Default for KeyWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyWallet {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
            keys: Vec::new(),
            scripts: HashMap::new(),
            transactions: BTreeSet::new(),
        }
    }

    /// Reads WIF encoded keys, one per line. Blank lines and `#` comments are ignored.
    pub fn from_wif_lines<R: BufRead>(reader: R) -> Result<Self> {
        let mut wallet = Self::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let private_key =
                PrivateKey::from_wif(line).map_err(|err| Error::InvalidKey(err.to_string()))?;
            wallet.add_key(private_key);
        }
        Ok(wallet)
    }

    /// Adds a key, returning its public key.
    pub fn add_key(&mut self, private_key: PrivateKey) -> PublicKey {
        let public_key = private_key.public_key(&self.secp);
        let index = self.keys.len();
        self.keys.push((private_key, public_key));
        self.scripts.insert(
            ScriptBuf::new_p2pkh(&public_key.pubkey_hash()),
            (index, ScriptKind::P2pkh),
        );
        self.scripts
            .insert(ScriptBuf::new_p2pk(&public_key), (index, ScriptKind::P2pk));
        public_key
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_mine(&self, script_pubkey: &ScriptBuf) -> bool {
        self.scripts.contains_key(script_pubkey)
    }

    /// Marks a transaction as belonging to the wallet.
    pub fn track(&mut self, txid: Txid) {
        self.transactions.insert(txid);
    }

    /// Scans the ledger and tracks every transaction with an output paying to the wallet.
    ///
    /// Returns the number of newly tracked transactions.
    pub fn discover<S: EntrySource>(&mut self, source: &S, filter: UtxoFilter) -> Result<usize> {
        let mut found = 0;
        for utxo in UtxoStream::new(source, filter)? {
            let utxo = utxo?;
            let script = utxo.output.script();
            if self.is_mine(&script) && self.transactions.insert(utxo.outpoint.txid) {
                found += 1;
            }
        }

        tracing::info!("Discovered {found} wallet transactions");

        Ok(found)
    }
}

impl Wallet for KeyWallet {
    fn owned_transactions(&self) -> Vec<Txid> {
        self.transactions.iter().copied().collect()
    }
}

impl Signer for KeyWallet {
    fn sign_claim(
        &self,
        outpoint: &OutPoint,
        prevout: &TxOut,
        claim: &Transaction,
    ) -> Option<Vec<u8>> {
        let (index, kind) = *self.scripts.get(&prevout.script_pubkey)?;
        let (private_key, public_key) = &self.keys[index];

        let input_index = claim
            .input
            .iter()
            .position(|input| input.previous_output == *outpoint)?;

        let sighash = match SighashCache::new(claim).legacy_signature_hash(
            input_index,
            &prevout.script_pubkey,
            EcdsaSighashType::All.to_u32(),
        ) {
            Ok(sighash) => sighash,
            Err(err) => {
                tracing::debug!("Failed to compute sighash for {outpoint}: {err}");
                return None;
            }
        };

        let msg = Message::from_digest(sighash.to_byte_array());
        let signature = bitcoin::ecdsa::Signature {
            signature: self.secp.sign_ecdsa(&msg, &private_key.inner),
            sighash_type: EcdsaSighashType::All,
        };

        let signature = PushBytesBuf::try_from(signature.to_vec()).ok()?;
        let builder = Builder::new().push_slice(signature);
        let script_sig = match kind {
            ScriptKind::P2pkh => builder.push_key(public_key),
            ScriptKind::P2pk => builder,
        }
        .into_script();

        Some(script_sig.into_bytes())
    }
}
