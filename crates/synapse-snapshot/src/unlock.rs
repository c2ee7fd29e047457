//! Unlock items: claims moving locally owned outputs to the successor ledger.

use crate::{Error, Result, UtxoFilter};
use bitcoin::absolute::LockTime;
use bitcoin::transaction::Version;
use bitcoin::{OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use synapse_ledger::{EntrySource, LedgerEntry, entry_key};

/// Access to the set of transactions the local wallet considers its own.
pub trait Wallet {
    fn owned_transactions(&self) -> Vec<Txid>;
}

/// Produces the authorization (redeem data) spending an output in a claim.
pub trait Signer {
    /// Signs input 0 of `claim`, which spends `prevout` at `outpoint`.
    ///
    /// Returns `None` if the output cannot be signed for.
    fn sign_claim(&self, outpoint: &OutPoint, prevout: &TxOut, claim: &Transaction)
        -> Option<Vec<u8>>;
}

/// What to do with an output the signer refuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SigningFailurePolicy {
    /// Emit the item with empty redeem data.
    #[default]
    EmitEmpty,
    /// Leave the output out.
    Drop,
    /// Abort the whole enumeration.
    FailFast,
}

impl std::str::FromStr for SigningFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "emit-empty" => Ok(Self::EmitEmpty),
            "drop" => Ok(Self::Drop),
            "fail-fast" => Ok(Self::FailFast),
            other => Err(format!(
                "unknown signing failure policy `{other}`, \
                 expected one of: emit-empty, drop, fail-fast"
            )),
        }
    }
}

/// A claim on one ledger output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockItem {
    pub outpoint: OutPoint,
    pub script_pubkey: ScriptBuf,
    /// Output value in satoshis.
    pub amount: u64,
    /// Authorization produced by the signer, empty if signing failed.
    pub redeem: Vec<u8>,
}

impl UnlockItem {
    pub fn is_signed(&self) -> bool {
        !self.redeem.is_empty()
    }
}

/// Builds the synthetic transaction a claim signature commits to.
///
/// Version 1, no lock time, one input spending `outpoint` and no outputs.
pub fn claim_skeleton(outpoint: OutPoint) -> Transaction {
    Transaction {
        version: Version::ONE,
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: outpoint,
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::new(),
        }],
        output: Vec::new(),
    }
}

/// Builds unlock items for every unspent output of the wallet's transactions.
///
/// Transactions missing from the ledger, whose record does not decode, or whose record
/// fails `filter`, are skipped. The
/// signer is asked exactly once per output; refusals are handled according to `policy`.
pub fn build_unlock_items<S, W>(
    source: &S,
    wallet: &W,
    filter: UtxoFilter,
    policy: SigningFailurePolicy,
) -> Result<Vec<UnlockItem>>
where
    S: EntrySource,
    W: Wallet + Signer,
{
    let mut items = Vec::new();
    let mut unsigned = 0usize;

    for txid in wallet.owned_transactions() {
        let Some(value) = source.get(&entry_key(&txid))? else {
            tracing::debug!("Wallet transaction {txid} has no unspent record");
            continue;
        };

        let entry = match LedgerEntry::decode(&value) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::trace!("Skipping malformed record {txid}: {err}");
                continue;
            }
        };

        if !filter.accept_entry(&entry) {
            continue;
        }

        for (outpoint, output) in filter.eligible_outputs(txid, &entry) {
            let prevout = output.to_txout();
            let claim = claim_skeleton(outpoint);

            let redeem = match wallet.sign_claim(&outpoint, &prevout, &claim) {
                Some(redeem) => redeem,
                None => match policy {
                    SigningFailurePolicy::EmitEmpty => {
                        unsigned += 1;
                        Vec::new()
                    }
                    SigningFailurePolicy::Drop => {
                        tracing::debug!("Dropping unsignable output {outpoint}");
                        continue;
                    }
                    SigningFailurePolicy::FailFast => return Err(Error::SigningFailed(outpoint)),
                },
            };

            items.push(UnlockItem {
                outpoint,
                script_pubkey: prevout.script_pubkey,
                amount: output.amount,
                redeem,
            });
        }
    }

    if unsigned > 0 {
        tracing::warn!("{unsigned} unlock items were emitted without redeem data");
    }

    tracing::info!("Built {} unlock items", items.len());

    Ok(items)
}
