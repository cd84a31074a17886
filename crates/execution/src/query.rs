// Path: crates/execution/src/query.rs

//! Path-prefix routing for read-only queries.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use weft_api::query::{QueryHandler, QueryRequest, QueryResult};
use weft_api::state::StateAccess;
use weft_types::error::{CoreError, TransactionError};

fn validate_query_path(path: &str) -> Result<(), CoreError> {
    let valid = path.len() > 1
        && path.starts_with('/')
        && path.split('/').skip(1).all(|seg| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        });
    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidQueryPath(path.to_string()))
    }
}

/// Resolves query paths to handlers by longest registered prefix.
///
/// A path has the form `/seg(/seg)*` with an optional `?modifier` suffix. A
/// prefix matches whole segments only: `/bank` matches `/bank/x` but not `/bankx`.
#[derive(Default, Clone)]
pub struct QueryRouter {
    handlers: BTreeMap<String, Arc<dyn QueryHandler>>,
}

impl fmt::Debug for QueryRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryRouter")
            .field("paths", &self.handlers.keys())
            .finish()
    }
}

impl QueryRouter {
    /// A router with no query paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under the path prefix `path`.
    pub fn register(
        &mut self,
        path: &str,
        handler: Arc<dyn QueryHandler>,
    ) -> Result<(), CoreError> {
        validate_query_path(path)?;
        if self.handlers.contains_key(path) {
            return Err(CoreError::InvalidQueryPath(format!("{path} (already registered)")));
        }
        self.handlers.insert(path.to_string(), handler);
        Ok(())
    }

    fn longest_match<'p>(&self, path: &'p str) -> Option<(&Arc<dyn QueryHandler>, &'p str)> {
        self.handlers
            .iter()
            .filter_map(|(prefix, handler)| {
                let rest = path.strip_prefix(prefix.as_str())?;
                if rest.is_empty() {
                    Some((prefix.len(), handler, rest))
                } else {
                    rest.strip_prefix('/').map(|r| (prefix.len(), handler, r))
                }
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, handler, rest)| (handler, rest))
    }

    /// Resolves `raw_path` and runs the matching handler against `state`.
    pub fn query(
        &self,
        raw_path: &str,
        data: &[u8],
        height: u64,
        state: &dyn StateAccess,
    ) -> Result<QueryResult, TransactionError> {
        let (path, modifier) = match raw_path.split_once('?') {
            Some((p, m)) => (p, Some(m)),
            None => (raw_path, None),
        };
        let (handler, rest) = self
            .longest_match(path)
            .ok_or_else(|| TransactionError::NoSuchPath(path.to_string()))?;
        let req = QueryRequest {
            path,
            rest,
            modifier,
            data,
            height,
        };
        handler.query(&req, state)
    }
}
