// Path: crates/state/src/memory.rs

//! An in-memory, hash-chained `CommitStore`.

use crate::commitment::commit_hash;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};
use weft_api::state::{ChangeSet, CommitStore, StateScanIter};
use weft_types::app::CommitId;
use weft_types::error::StateError;

/// A `CommitStore` that keeps committed state in a `BTreeMap`.
///
/// Nothing survives the process, so `load_latest_version` only drops the
/// staged batch and reports the current head.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    committed: BTreeMap<Vec<u8>, Vec<u8>>,
    staged: ChangeSet,
    head: CommitId,
}

impl MemoryStore {
    /// Creates an empty store at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of committed entries.
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Returns true when no entry is committed.
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

impl CommitStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.committed.get(key).cloned())
    }

    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s >= e {
                return Ok(Box::new(std::iter::empty()));
            }
        }
        let lo = start.map_or(Unbounded, Included);
        let hi = end.map_or(Unbounded, Excluded);
        let iter = self
            .committed
            .range::<[u8], _>((lo, hi))
            .map(|(k, v)| Ok((k.clone(), v.clone())));
        Ok(Box::new(iter))
    }

    fn write_batch(&mut self, changes: ChangeSet) -> Result<(), StateError> {
        self.staged.extend(changes);
        Ok(())
    }

    fn commit(&mut self) -> Result<CommitId, StateError> {
        let version = self
            .head
            .version
            .checked_add(1)
            .ok_or_else(|| StateError::Apply("version overflow".into()))?;
        let staged = std::mem::take(&mut self.staged);
        let hash = commit_hash(&self.head.hash, version, &staged);
        for (key, value) in staged {
            match value {
                Some(v) => {
                    self.committed.insert(key, v);
                }
                None => {
                    self.committed.remove(&key);
                }
            }
        }
        self.head = CommitId { version, hash };
        Ok(self.head.clone())
    }

    fn latest_commit_id(&self) -> CommitId {
        self.head.clone()
    }

    fn load_latest_version(&mut self) -> Result<CommitId, StateError> {
        self.staged.clear();
        Ok(self.head.clone())
    }
}
