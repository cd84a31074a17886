// Path: crates/node/src/replay.rs

//! Drives a harness through a scripted block sequence.
//!
//! A script stands in for the consensus engine in devnets and tests: it names
//! the chain and genesis, then lists blocks of hex-encoded transactions. Each
//! block runs `BeginBlock`, `DeliverTx` per transaction, `EndBlock` and
//! `Commit`, in that order.

use anyhow::{bail, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use weft_api::lifecycle::ChainApplication;
use weft_types::app::{
    BlockHeader, RequestBeginBlock, RequestEndBlock, RequestInitChain, Timestamp, ValidatorUpdate,
};

/// One scripted block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScriptBlock {
    /// Block time in seconds since the Unix epoch. Must be non-zero.
    pub time: u64,
    /// Hex-encoded transactions, delivered in order.
    #[serde(default)]
    pub txs: Vec<String>,
}

/// A genesis plus the blocks to run on top of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub chain_id: String,
    /// Genesis time in seconds since the Unix epoch.
    #[serde(default)]
    pub genesis_time: u64,
    #[serde(default)]
    pub validators: Vec<ValidatorUpdate>,
    /// The application state handed to the genesis initializers.
    #[serde(default)]
    pub app_state: serde_json::Value,
    #[serde(default)]
    pub blocks: Vec<ScriptBlock>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
    }
}

/// The outcome of one delivered transaction.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TxReport {
    pub code: u32,
    pub log: String,
    pub tags: usize,
}

/// The outcome of one committed block.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BlockReport {
    pub height: u64,
    /// The content hash, hex-encoded.
    pub hash: String,
    pub txs: Vec<TxReport>,
    pub validator_updates: Vec<ValidatorUpdate>,
}

/// Runs `script` against `app`. Pass `initialized` for a harness that already
/// ran `InitChain`, so a script can resume on a persistent store.
pub fn run<A: ChainApplication>(
    app: &mut A,
    script: &Script,
    initialized: bool,
) -> Result<Vec<BlockReport>> {
    if !initialized {
        let app_state = if script.app_state.is_null() {
            Vec::new()
        } else {
            serde_json::to_vec(&script.app_state)?
        };
        app.init_chain(RequestInitChain {
            chain_id: script.chain_id.clone(),
            time: Timestamp::from_secs(script.genesis_time),
            validators: script.validators.clone(),
            app_state,
        })?;
    }

    let mut reports = Vec::with_capacity(script.blocks.len());
    for block in &script.blocks {
        let last = app.info()?.last_commit;
        let height = last.version.saturating_add(1);
        app.begin_block(RequestBeginBlock {
            header: BlockHeader {
                chain_id: script.chain_id.clone(),
                height,
                time: Timestamp::from_secs(block.time),
                last_commit_hash: last.hash,
            },
        })?;

        let mut txs = Vec::with_capacity(block.txs.len());
        for (i, tx_hex) in block.txs.iter().enumerate() {
            let Ok(bytes) = hex::decode(tx_hex) else {
                bail!("block {height}: transaction {i} is not valid hex");
            };
            let res = app.deliver_tx(&bytes)?;
            txs.push(TxReport {
                code: res.code,
                log: res.log,
                tags: res.tags.len(),
            });
        }

        let end = app.end_block(RequestEndBlock { height })?;
        let commit = app.commit()?;
        tracing::info!(
            target: "replay",
            height,
            txs = txs.len(),
            hash = %hex::encode(&commit.data),
            "Replayed block"
        );
        reports.push(BlockReport {
            height: commit.version,
            hash: hex::encode(&commit.data),
            txs,
            validator_updates: end.validator_updates,
        });
    }
    Ok(reports)
}
