// Path: crates/types/src/app/identity.rs

use crate::error::TransactionError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The byte length of an [`Address`].
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address. Rendered as lower-case hex in JSON and logs.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Parses an address from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TransactionError> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw)
            .map_err(|e| TransactionError::InvalidInput(format!("address '{s}': {e}")))?;
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            TransactionError::InvalidInput(format!("address '{s}' must be {ADDRESS_LEN} bytes"))
        })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// The identifier of a chain, fixed once at genesis.
///
/// Valid identifiers are 4 to 128 characters drawn from `[A-Za-z0-9_.:-]`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug)]
#[serde(try_from = "String", into = "String")]
pub struct ChainId(String);

impl ChainId {
    /// The minimum accepted length.
    pub const MIN_LEN: usize = 4;
    /// The maximum accepted length.
    pub const MAX_LEN: usize = 128;

    /// Validates and wraps a chain identifier.
    pub fn parse(s: &str) -> Result<Self, TransactionError> {
        let len_ok = (Self::MIN_LEN..=Self::MAX_LEN).contains(&s.len());
        let chars_ok = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'));
        if !len_ok || !chars_ok {
            return Err(TransactionError::InvalidChainId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ChainId {
    type Error = TransactionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ChainId> for String {
    fn from(c: ChainId) -> Self {
        c.0
    }
}
