// Path: crates/api/src/query/mod.rs
//! Defines the read-only query handler trait.

use crate::state::StateAccess;
use weft_types::error::TransactionError;

/// A resolved query.
#[derive(Debug, Clone, Copy)]
pub struct QueryRequest<'a> {
    /// The full request path, without the modifier.
    pub path: &'a str,
    /// The part of the path after the matched prefix, without a leading `/`.
    pub rest: &'a str,
    /// The optional `?modifier` suffix, e.g. `prefix`.
    pub modifier: Option<&'a str>,
    /// The query argument.
    pub data: &'a [u8],
    /// The committed version being queried.
    pub height: u64,
}

/// Matched keys and their values, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Matched keys.
    pub keys: Vec<Vec<u8>>,
    /// The value of each matched key.
    pub values: Vec<Vec<u8>>,
}

impl QueryResult {
    /// Appends one matched entry.
    pub fn push(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.keys.push(key);
        self.values.push(value);
    }
}

/// Serves queries under one registered path prefix.
///
/// Handlers only ever see the last committed state.
pub trait QueryHandler: Send + Sync {
    /// Answers a query.
    fn query(
        &self,
        req: &QueryRequest<'_>,
        state: &dyn StateAccess,
    ) -> Result<QueryResult, TransactionError>;
}
