// Path: crates/types/src/app/mod.rs
//! Core application-level data structures: commit ids, block headers,
//! invocation results and the lifecycle request/response messages.

/// Addresses and chain identifiers.
pub mod identity;
/// Request and response messages of the lifecycle surface.
pub mod lifecycle;

pub use identity::{Address, ChainId, ADDRESS_LEN};
pub use lifecycle::*;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Identifies one committed state: the store version and its content hash.
///
/// Produced only by a store commit. The empty store reports version 0 and an empty hash.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct CommitId {
    /// The monotonically increasing version number.
    pub version: u64,
    /// The content hash of the committed state.
    #[serde(with = "hex::serde")]
    pub hash: Vec<u8>,
}

impl CommitId {
    /// Returns true for the commit id of a store that has never committed.
    pub fn is_empty(&self) -> bool {
        self.version == 0 && self.hash.is_empty()
    }
}

/// A block timestamp in nanoseconds since the Unix epoch, as agreed by consensus.
///
/// The zero value is reserved as "unset" and is rejected by `BeginBlock`.
#[derive(
    Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Creates a timestamp from whole seconds since the epoch.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1_000_000_000))
    }

    /// Returns true for the reserved zero value.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// The subset of a consensus block header the harness needs.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct BlockHeader {
    /// The chain the block belongs to.
    pub chain_id: String,
    /// The height of the block.
    pub height: u64,
    /// The consensus time of the block.
    pub time: Timestamp,
    /// The content hash returned by the previous `Commit`.
    #[serde(with = "hex::serde")]
    pub last_commit_hash: Vec<u8>,
}

/// A change to one validator's voting power. A power of zero removes the validator.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ValidatorUpdate {
    /// The validator's public key.
    #[serde(with = "hex::serde")]
    pub pub_key: Vec<u8>,
    /// The new voting power.
    pub power: u64,
}

impl ValidatorUpdate {
    /// Creates a new update.
    pub fn new(pub_key: impl Into<Vec<u8>>, power: u64) -> Self {
        Self {
            pub_key: pub_key.into(),
            power,
        }
    }
}

/// A `(key, value)` index tag attached to a delivered transaction.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Tag {
    /// The tag key.
    pub key: Vec<u8>,
    /// The tag value.
    pub value: Vec<u8>,
}

impl Tag {
    /// Creates a new tag.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The successful outcome of checking a transaction. Advisory only.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CheckResult {
    /// Payload returned to the submitter.
    pub data: Vec<u8>,
    /// An advisory log line.
    pub log: String,
    /// The estimated gas the transaction will consume.
    pub gas_wanted: u64,
}

/// The successful outcome of delivering a transaction.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DeliverResult {
    /// Payload returned to the submitter.
    pub data: Vec<u8>,
    /// A log line.
    pub log: String,
    /// Index tags for the transaction.
    pub tags: Vec<Tag>,
    /// Validator power changes requested by the transaction.
    pub diff: Vec<ValidatorUpdate>,
    /// The gas consumed.
    pub gas_used: u64,
}
