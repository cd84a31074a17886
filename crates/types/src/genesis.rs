// Path: crates/types/src/genesis.rs

//! The genesis document handed to genesis initializers.
//!
//! `GenesisOptions` is the application-state JSON object, keyed by initializer
//! name. Each initializer deserializes only its own section.

use crate::app::{Timestamp, ValidatorUpdate};
use crate::error::TransactionError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-initializer genesis sections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenesisOptions(pub Map<String, Value>);

impl GenesisOptions {
    /// Parses the options from raw JSON bytes. Empty input yields empty options.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(bytes)?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(TransactionError::InvalidInput(format!(
                "genesis app_state must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Deserializes the section named `name`, or `None` when it is absent.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, TransactionError> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => serde_json::from_value(v.clone())
                .map(Some)
                .map_err(|e| TransactionError::InvalidInput(format!("section '{name}': {e}"))),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Chain-level genesis parameters shared by every initializer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenesisParams {
    /// The initial validator set.
    pub validators: Vec<ValidatorUpdate>,
    /// The genesis time.
    pub time: Timestamp,
}
