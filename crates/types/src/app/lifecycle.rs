// Path: crates/types/src/app/lifecycle.rs

//! Messages exchanged with the consensus engine.
//!
//! The engine drives the harness through a fixed set of calls: `Info`,
//! `Query`, `InitChain`, `BeginBlock`, `CheckTx`, `DeliverTx`, `EndBlock` and
//! `Commit`. Every response that can carry a failure does so through a numeric
//! `code` (zero on success) and a `log` line; fatal conditions never appear here.

use super::{BlockHeader, CommitId, Tag, Timestamp, ValidatorUpdate};
use crate::error::{ErrorCode, TransactionError, CODE_OK};
use serde::{Deserialize, Serialize};

/// Response to `Info`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ResponseInfo {
    /// The harness name.
    pub name: String,
    /// The harness version string.
    pub version: String,
    /// The last committed state.
    pub last_commit: CommitId,
}

/// Request for `InitChain`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct RequestInitChain {
    /// The chain identifier to persist.
    pub chain_id: String,
    /// The genesis time.
    pub time: Timestamp,
    /// The genesis validator set.
    pub validators: Vec<ValidatorUpdate>,
    /// JSON-encoded application state, keyed by genesis initializer name.
    #[serde(default)]
    pub app_state: Vec<u8>,
}

/// Response to `InitChain`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ResponseInitChain {
    /// The validator set the application starts with.
    pub validators: Vec<ValidatorUpdate>,
}

/// Request for `BeginBlock`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct RequestBeginBlock {
    /// The header of the block being opened.
    pub header: BlockHeader,
}

/// Response to `BeginBlock`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ResponseBeginBlock {}

/// Response to `CheckTx`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ResponseCheckTx {
    /// Zero on success, otherwise a response code.
    pub code: u32,
    /// The stable string code of the failure, empty on success.
    pub codespace: String,
    /// The log line.
    pub log: String,
    /// The payload.
    pub data: Vec<u8>,
    /// The estimated gas.
    pub gas_wanted: u64,
}

impl ResponseCheckTx {
    /// Maps a structured failure onto a response.
    pub fn from_error(err: &TransactionError) -> Self {
        Self {
            code: err.abci_code(),
            codespace: err.code().to_string(),
            log: err.to_string(),
            ..Default::default()
        }
    }

    /// Returns true when the code signals success.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// Response to `DeliverTx`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ResponseDeliverTx {
    /// Zero on success, otherwise a response code.
    pub code: u32,
    /// The stable string code of the failure, empty on success.
    pub codespace: String,
    /// The log line.
    pub log: String,
    /// The payload.
    pub data: Vec<u8>,
    /// The consumed gas.
    pub gas_used: u64,
    /// Index tags.
    pub tags: Vec<Tag>,
}

impl ResponseDeliverTx {
    /// Maps a structured failure onto a response.
    pub fn from_error(err: &TransactionError) -> Self {
        Self {
            code: err.abci_code(),
            codespace: err.code().to_string(),
            log: err.to_string(),
            ..Default::default()
        }
    }

    /// Returns true when the code signals success.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// Request for `EndBlock`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct RequestEndBlock {
    /// The height of the block being closed.
    pub height: u64,
}

/// Response to `EndBlock`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ResponseEndBlock {
    /// The de-duplicated validator power changes accumulated during the block.
    pub validator_updates: Vec<ValidatorUpdate>,
}

/// Response to `Commit`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ResponseCommit {
    /// The content hash of the new committed state.
    pub data: Vec<u8>,
    /// The new committed version.
    pub version: u64,
}

/// Request for `Query`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct RequestQuery {
    /// The query path, optionally suffixed with `?modifier`.
    pub path: String,
    /// The query argument, interpreted by the query handler.
    pub data: Vec<u8>,
}

/// Response to `Query`.
///
/// `key` and `value` carry the canonically encoded key set and value set.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ResponseQuery {
    /// Zero on success, otherwise a response code.
    pub code: u32,
    /// The log line.
    pub log: String,
    /// The committed version the query ran against.
    pub height: u64,
    /// The encoded `Vec<Vec<u8>>` of matched keys.
    pub key: Vec<u8>,
    /// The encoded `Vec<Vec<u8>>` of matched values.
    pub value: Vec<u8>,
}

impl ResponseQuery {
    /// Maps a structured failure onto a response.
    pub fn from_error(err: &TransactionError, height: u64) -> Self {
        Self {
            code: err.abci_code(),
            log: err.to_string(),
            height,
            ..Default::default()
        }
    }
}
