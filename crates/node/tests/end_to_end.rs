// Path: crates/node/tests/end_to_end.rs

//! Full lifecycle scenarios against the standard node stack.

use weft_api::lifecycle::ChainApplication;
use weft_api::state::CommitStore;
use weft_execution::Application;
use weft_node::replay::{self, Script, ScriptBlock};
use weft_node::{setup_application, NodeConfig};
use weft_state::memory::MemoryStore;
use weft_storage::RedbStore;
use weft_tx::model::{Msg, SendMsg, SignedTx, UpdateValidatorsMsg};
use weft_types::app::{
    Address, BlockHeader, RequestBeginBlock, RequestEndBlock, RequestInitChain, RequestQuery,
    ResponseCommit, Timestamp, ValidatorUpdate,
};
use weft_types::codec::from_bytes_canonical;
use weft_types::error::{ChainError, CODE_NONCE_MISMATCH, CODE_OK, CODE_UNAUTHORIZED};
use weft_types::keys::nonce_key;

const CHAIN: &str = "test-net-1";

fn alice() -> Address {
    Address([0xa1; 20])
}

fn bob() -> Address {
    Address([0xb0; 20])
}

fn genesis() -> RequestInitChain {
    let app_state = serde_json::json!({
        "bank": {"balances": [{"address": alice().to_string(), "amount": 1000}]},
        "validators": {"admin": alice().to_string()}
    });
    RequestInitChain {
        chain_id: CHAIN.into(),
        time: Timestamp::from_secs(1),
        validators: vec![ValidatorUpdate::new(b"genesis-val".to_vec(), 10)],
        app_state: serde_json::to_vec(&app_state).unwrap(),
    }
}

fn transfer(nonce: u64, amount: u64) -> Vec<u8> {
    SignedTx::new(
        alice(),
        nonce,
        Msg::Send(SendMsg {
            src: alice(),
            dst: bob(),
            amount,
            memo: "rent".into(),
        }),
    )
    .with_signature(vec![1])
    .encode_to_vec()
}

fn update(nonce: u64, updates: Vec<ValidatorUpdate>) -> Vec<u8> {
    SignedTx::new(alice(), nonce, Msg::UpdateValidators(UpdateValidatorsMsg { updates }))
        .with_signature(vec![1])
        .encode_to_vec()
}

fn begin<S: CommitStore>(app: &mut Application<S>, height: u64) {
    let last_commit_hash = app.info().unwrap().last_commit.hash;
    app.begin_block(RequestBeginBlock {
        header: BlockHeader {
            chain_id: CHAIN.into(),
            height,
            time: Timestamp::from_secs(10 + height),
            last_commit_hash,
        },
    })
    .unwrap();
}

fn finish<S: CommitStore>(app: &mut Application<S>, height: u64) -> ResponseCommit {
    app.end_block(RequestEndBlock { height }).unwrap();
    app.commit().unwrap()
}

fn balance<S: CommitStore>(app: &Application<S>, address: &Address) -> u64 {
    let res = app
        .query(RequestQuery {
            path: "/balances".into(),
            data: address.as_ref().to_vec(),
        })
        .unwrap();
    assert_eq!(res.code, CODE_OK, "{}", res.log);
    let values: Vec<Vec<u8>> = from_bytes_canonical(&res.value).unwrap();
    from_bytes_canonical(&values[0]).unwrap()
}

#[test]
fn transfer_across_two_blocks() {
    let mut app = setup_application(&NodeConfig::default(), MemoryStore::new()).unwrap();
    app.init_chain(genesis()).unwrap();

    begin(&mut app, 1);
    let block1 = finish(&mut app, 1);
    assert_eq!(block1.version, 1);
    assert_eq!(block1.data.len(), 32);

    let tx = transfer(0, 250);
    let checked = app.check_tx(&tx).unwrap();
    assert_eq!(checked.code, CODE_OK, "{}", checked.log);
    assert_eq!(checked.gas_wanted, 100);

    begin(&mut app, 2);
    let delivered = app.deliver_tx(&tx).unwrap();
    assert_eq!(delivered.code, CODE_OK, "{}", delivered.log);
    assert_eq!(delivered.gas_used, 100);
    assert_eq!(delivered.tags.len(), 3);
    let nonce_tag = hex::encode_upper(nonce_key(alice().as_ref()));
    assert!(delivered
        .tags
        .iter()
        .any(|t| t.key == nonce_tag.as_bytes() && t.value == b"s"));

    let block2 = finish(&mut app, 2);
    assert_eq!(block2.version, 2);
    assert_ne!(block2.data, block1.data);

    assert_eq!(balance(&app, &alice()), 750);
    assert_eq!(balance(&app, &bob()), 250);
}

#[test]
fn replayed_and_unsigned_transactions_fail_without_side_effects() {
    let mut app = setup_application(&NodeConfig::default(), MemoryStore::new()).unwrap();
    app.init_chain(genesis()).unwrap();
    begin(&mut app, 1);

    let tx = transfer(0, 100);
    assert_eq!(app.deliver_tx(&tx).unwrap().code, CODE_OK);
    let replay = app.deliver_tx(&tx).unwrap();
    assert_eq!(replay.code, CODE_NONCE_MISMATCH);
    assert!(replay.tags.is_empty());

    let unsigned = SignedTx::new(
        alice(),
        1,
        Msg::Send(SendMsg {
            src: alice(),
            dst: bob(),
            amount: 1,
            memo: String::new(),
        }),
    )
    .encode_to_vec();
    assert_eq!(app.deliver_tx(&unsigned).unwrap().code, CODE_UNAUTHORIZED);

    let broke = transfer(1, 10_000);
    let res = app.deliver_tx(&broke).unwrap();
    assert_eq!(res.code, 1004, "{}", res.log);
    assert!(res.tags.is_empty());

    finish(&mut app, 1);
    assert_eq!(balance(&app, &alice()), 900);
    assert_eq!(balance(&app, &bob()), 100);

    // The failed transfer rolled back its nonce bump, so nonce 1 is still next.
    assert_eq!(app.check_tx(&transfer(1, 1)).unwrap().code, CODE_OK);
}

#[test]
fn check_rejects_a_replay_before_it_is_delivered() {
    let mut app = setup_application(&NodeConfig::default(), MemoryStore::new()).unwrap();
    app.init_chain(genesis()).unwrap();

    // Genesis balances reach the check set only once block 1 commits.
    let tx = transfer(0, 1);
    assert_eq!(app.check_tx(&tx).unwrap().code, 1004);
    begin(&mut app, 1);
    finish(&mut app, 1);

    assert_eq!(app.check_tx(&tx).unwrap().code, CODE_OK);
    assert_eq!(app.check_tx(&tx).unwrap().code, CODE_NONCE_MISMATCH);
}

#[test]
fn validator_updates_are_deduplicated_at_end_block() {
    let mut app = setup_application(&NodeConfig::default(), MemoryStore::new()).unwrap();
    let init = app.init_chain(genesis()).unwrap();
    assert_eq!(init.validators.len(), 1);

    begin(&mut app, 1);
    let first = update(
        0,
        vec![ValidatorUpdate::new(b"A".to_vec(), 10), ValidatorUpdate::new(b"B".to_vec(), 15)],
    );
    let second = update(
        1,
        vec![ValidatorUpdate::new(b"A".to_vec(), 1), ValidatorUpdate::new(b"B".to_vec(), 2)],
    );
    assert_eq!(app.deliver_tx(&first).unwrap().code, CODE_OK);
    assert_eq!(app.deliver_tx(&second).unwrap().code, CODE_OK);

    let end = app.end_block(RequestEndBlock { height: 1 }).unwrap();
    assert_eq!(
        end.validator_updates,
        vec![ValidatorUpdate::new(b"A".to_vec(), 1), ValidatorUpdate::new(b"B".to_vec(), 2)]
    );
    app.commit().unwrap();

    let res = app
        .query(RequestQuery {
            path: "/validators".into(),
            data: Vec::new(),
        })
        .unwrap();
    let keys: Vec<Vec<u8>> = from_bytes_canonical(&res.key).unwrap();
    assert_eq!(keys, vec![b"A".to_vec(), b"B".to_vec(), b"genesis-val".to_vec()]);
}

#[test]
fn redb_node_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.redb");

    let committed = {
        let store = RedbStore::open(&path).unwrap();
        let mut app = setup_application(&NodeConfig::default(), store).unwrap();
        app.init_chain(genesis()).unwrap();
        begin(&mut app, 1);
        assert_eq!(app.deliver_tx(&transfer(0, 40)).unwrap().code, CODE_OK);
        finish(&mut app, 1)
    };

    let store = RedbStore::open(&path).unwrap();
    let mut app = setup_application(&NodeConfig::default(), store).unwrap();
    let info = app.info().unwrap();
    assert_eq!(info.last_commit.version, committed.version);
    assert_eq!(info.last_commit.hash, committed.data);
    assert_eq!(app.chain_id().map(|c| c.as_str()), Some(CHAIN));
    assert_eq!(balance(&app, &bob()), 40);

    let err = app.init_chain(genesis()).unwrap_err();
    assert!(matches!(err, ChainError::InitChain(_)));
    assert!(!app.is_halted());

    begin(&mut app, 2);
    assert_eq!(app.deliver_tx(&transfer(1, 2)).unwrap().code, CODE_OK);
    assert_eq!(finish(&mut app, 2).version, 2);
}

#[test]
fn replay_script_drives_the_lifecycle() {
    let mut app = setup_application(&NodeConfig::default(), MemoryStore::new()).unwrap();
    let script = Script {
        chain_id: CHAIN.into(),
        genesis_time: 1,
        validators: Vec::new(),
        app_state: serde_json::from_slice(&genesis().app_state).unwrap(),
        blocks: vec![
            ScriptBlock {
                time: 5,
                txs: Vec::new(),
            },
            ScriptBlock {
                time: 6,
                txs: vec![hex::encode(transfer(0, 5)), hex::encode(transfer(0, 5))],
            },
        ],
    };
    let reports = replay::run(&mut app, &script, false).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].height, 1);
    assert_ne!(reports[0].hash, reports[1].hash);
    let codes: Vec<u32> = reports[1].txs.iter().map(|t| t.code).collect();
    assert_eq!(codes, vec![CODE_OK, CODE_NONCE_MISMATCH]);
    assert_eq!(reports[1].txs[0].tags, 3);
    assert_eq!(balance(&app, &bob()), 5);
}
