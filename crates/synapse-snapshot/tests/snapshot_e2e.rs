//! End-to-end tests of the snapshot engine over a RocksDB ledger.
//!
//! The ledger holds the coinbase outputs of the first six Bitcoin blocks, imported from the
//! CSV dump format. Expected roots were computed independently.

use bitcoin::hashes::Hash;
use bitcoin::{Network, OutPoint, PrivateKey, ScriptBuf, Txid};
use hex_literal::hex;
use parking_lot::RwLock;
use std::sync::Arc;
use synapse_ledger::{EntrySource, LedgerDb, LedgerEntry, TxOutEntry, import_csv};
use synapse_snapshot::{
    EngineConfig, KeyWallet, LeafHash, SigningFailurePolicy, SwapEngine, UtxoFilter,
    compute_proof_root, parse_hash, proof_from_json, proof_to_json, unlock_items_from_json,
    unlock_items_to_json,
};

// txid,vout,is_coinbase,amount,height,script_pubkey
const FIRST_SIX_BLOCKS: &str = "\
0e3e2357e806b6cdb1f70b54c3a3a17b6714ee1f0e68bebb44a74b1efd512098,0,true,5000000000,1,410496b538e853519c726a2c91e61ec11600ae1390813a627c66fb8be7947be63c52da7589379515d4e0a604f8141781e62294721166bf621e73a82cbf2342c858eeac
9b0fc92260312ce44e74ef369f5c66bbb85848f2eddd5a7a1cde251e54ccfdd5,0,true,5000000000,2,41047211a824f55b505228e4c3d5194c1fcfaa15a456abdf37f9b9d97a4040afc073dee6c89064984f03385237d92167c13e236446b417ab79a0fcae412ae3316b77ac
999e1c837c76a1b7fbb7e57baf87b309960f5ffefbf2a9b95dd890602272f644,0,true,5000000000,3,410494b9d3e76c5b1629ecf97fff95d7a4bbdac87cc26099ada28066c6ff1eb9191223cd897194a08d0c2726c5747f1db49e8cf90e75dc3e3550ae9b30086f3cd5aaac
df2b060fa2e5e9c8ed5eaf6a45c13753ec8c63282b2688322eba40cd98ea067a,0,true,5000000000,4,4104184f32b212815c6e522e66686324030ff7e5bf08efb21f8b00614fb7690e19131dd31304c54f37baa40db231c918106bb9fd43373e37ae31a0befc6ecaefb867ac
63522845d294ee9b0188ae5cac91bf389a0c3723f084ca1025e7d9cdfe481ce1,0,true,5000000000,5,410456579536d150fbce94ee62b47db2ca43af0a730a0467ba55c79e2a7ec9ce4ad297e35cdbb8e42a4643a60eef7c9abee2f5822f86b1da242d9c2301c431facfd8ac
20251a76e64e920e58291a30d4b212939aae976baca40e70818ceaa596fb9d37,0,true,5000000000,6,410408ce279174b34c077c7b2043e3f3d45a588b85ef4ca466740f848ead7fb498f0a795c982552fdfa41616a7c0333a269d62108588e260fd5a48ac8e4dbf49e2bcac
";

const ROOT_ALL: &str = "706f8544f96ff8d344f88bac554e50b267b45f014d11a2377286966286d8894d";
const ROOT_UP_TO_5: &str = "d4b3f0ad6b2fabce1d105fc80cacc884c5817e717f933462a6ffe57b1e9e1205";
const ROOT_2_TO_4: &str = "6a02e0bef02283bd35b776256a55b78c3683633d3557ef1cff385df81196f067";

// Leaves of all six outputs in folding order.
const SORTED_LEAVES: [&str; 6] = [
    "678ae95de912407663a1cf9161be1c26332adf9c5a9e69b30662e6a3dde314c5",
    "686aa1287c41605139797d062c60a32886f4457fca579a32de37e500d9a442a2",
    "a22b06f8991079f416fbe4522123d5e890ac101ffa134ac8c17211ea561d513b",
    "ab0b4f9c20e4b5cdbbcf28b8263a33188b89fb16976d9c07496bf08e2105e9db",
    "f1a556de61b025afc8a3b5e8491a06138588cd3cdc8cd559d7c10f60ab241532",
    "f67b86979cb087bb25a57210bb1dac307ba57da39d76a575a8cf45c01c9b1b9a",
];

fn open_ledger(dir: &tempfile::TempDir) -> LedgerDb {
    let ledger = LedgerDb::open(dir.path()).unwrap();
    assert_eq!(import_csv(&ledger, FIRST_SIX_BLOCKS.as_bytes()).unwrap(), 6);
    ledger
}

fn engine(
    ledger: LedgerDb,
    wallet: KeyWallet,
    config: EngineConfig,
) -> SwapEngine<LedgerDb, KeyWallet> {
    SwapEngine::new(
        Arc::new(RwLock::new(ledger)),
        Arc::new(RwLock::new(wallet)),
        config,
    )
}

fn genesis_spend_outpoint() -> OutPoint {
    OutPoint::new(
        "0e3e2357e806b6cdb1f70b54c3a3a17b6714ee1f0e68bebb44a74b1efd512098"
            .parse()
            .unwrap(),
        0,
    )
}

#[test]
fn test_root_of_first_six_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = open_ledger(&dir);

    let root = synapse_snapshot::compute_merkle_root(&ledger, UtxoFilter::default()).unwrap();
    assert_eq!(root.to_string(), ROOT_ALL);

    let windowed = |min, max| {
        synapse_snapshot::compute_merkle_root(&ledger, UtxoFilter::new(min, max))
            .unwrap()
            .to_string()
    };
    assert_eq!(windowed(None, Some(5)), ROOT_UP_TO_5);
    assert_eq!(windowed(Some(2), Some(4)), ROOT_2_TO_4);
    assert!(
        synapse_snapshot::compute_merkle_root(&ledger, UtxoFilter::new(Some(7), None))
            .unwrap()
            .is_null()
    );
}

#[test]
fn test_leaf_list_is_sorted_by_value() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = open_ledger(&dir);

    let snapshot = synapse_snapshot::Snapshot::collect(&ledger, UtxoFilter::default()).unwrap();
    let mut out = Vec::new();
    snapshot.write_leaves(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>(), SORTED_LEAVES);
    assert_eq!(snapshot.root().to_string(), ROOT_ALL);
}

#[test]
fn test_leaf_vector() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = open_ledger(&dir);

    let outpoint = genesis_spend_outpoint();
    let entry = ledger.get_entry(&outpoint.txid).unwrap().unwrap();
    let leaf = synapse_snapshot::leaf_hash(&outpoint, entry.output(0).unwrap());

    assert_eq!(
        leaf,
        LeafHash::from_byte_array(hex!(
            "321524ab600fc1d759d58cdc3ccd888513061a49e8b5a3c8af25b061de56a5f1"
        ))
    );
    assert_eq!(
        leaf.to_string(),
        "f1a556de61b025afc8a3b5e8491a06138588cd3cdc8cd559d7c10f60ab241532"
    );
}

#[test]
fn test_proof_through_text_form() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(open_ledger(&dir), KeyWallet::new(), EngineConfig::default());

    let root = engine.compute_merkle_root().unwrap();
    let snapshot = engine.snapshot().unwrap();

    for leaf in snapshot.leaves() {
        let proof = engine.get_proof(leaf).unwrap();
        assert_eq!(proof.len(), 3);

        // Verifier side: only the text forms and the trusted root are shared.
        let json = proof_to_json(&proof).unwrap();
        let leaf_text = leaf.to_string();
        let recomputed = compute_proof_root(
            &parse_hash(&leaf_text).unwrap(),
            &proof_from_json(&json).unwrap(),
        );
        assert_eq!(recomputed, root);
    }
}

#[test]
fn test_snapshot_follows_ledger_updates() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = open_ledger(&dir);
    let before = synapse_snapshot::Snapshot::collect(&ledger, UtxoFilter::default()).unwrap();

    // Spend the block 1 coinbase.
    let outpoint = genesis_spend_outpoint();
    let mut entry = ledger.get_entry(&outpoint.txid).unwrap().unwrap();
    let spent = entry.spend(0).unwrap();
    ledger.put_entry(&outpoint.txid, &entry).unwrap();

    let spent_leaf = synapse_snapshot::leaf_hash(&outpoint, &spent);
    let after = synapse_snapshot::Snapshot::collect(&ledger, UtxoFilter::default()).unwrap();

    assert!(before.contains(&spent_leaf));
    assert!(!after.contains(&spent_leaf));
    assert_eq!(after.len(), 5);
    assert_ne!(before.root(), after.root());
    assert!(
        synapse_snapshot::get_proof(&ledger, UtxoFilter::default(), &spent_leaf)
            .unwrap()
            .is_empty()
    );

    // The old snapshot still answers queries about the old state.
    let proof = before.proof(&spent_leaf).unwrap();
    assert_eq!(compute_proof_root(&spent_leaf, &proof), before.root());
}

#[test]
fn test_unlock_items_for_owned_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = open_ledger(&dir);

    let mut wallet = KeyWallet::new();
    let public_key = wallet.add_key(PrivateKey::from_slice(&[0x11; 32], Network::Bitcoin).unwrap());
    let owned_txid = Txid::from_byte_array([0x99; 32]);
    ledger
        .put_entry(
            &owned_txid,
            &LedgerEntry::new(
                3,
                false,
                vec![
                    Some(TxOutEntry::new(
                        12_345,
                        ScriptBuf::new_p2pkh(&public_key.pubkey_hash()).into_bytes(),
                    )),
                    Some(TxOutEntry::new(
                        678,
                        ScriptBuf::new_p2pk(&public_key).into_bytes(),
                    )),
                ],
            ),
        )
        .unwrap();
    assert_eq!(wallet.discover(&ledger, UtxoFilter::default()).unwrap(), 1);

    let engine = engine(
        ledger,
        wallet,
        EngineConfig {
            filter: UtxoFilter::default(),
            signing_failure: SigningFailurePolicy::FailFast,
        },
    );

    let items = engine.get_unlock_items().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.is_signed()));
    assert_eq!(items[0].amount, 12_345);
    assert_eq!(items[1].outpoint, OutPoint::new(owned_txid, 1));

    let json = unlock_items_to_json(&items).unwrap();
    assert_eq!(unlock_items_from_json(&json).unwrap(), items);

    // Owned outputs are part of the snapshot they are claimed against.
    let snapshot = engine.snapshot().unwrap();
    for item in &items {
        let leaf = synapse_snapshot::leaf_hash(
            &item.outpoint,
            &TxOutEntry::new(item.amount, item.script_pubkey.to_bytes()),
        );
        assert!(snapshot.contains(&leaf));
    }
}
