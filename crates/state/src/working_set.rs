// Path: crates/state/src/working_set.rs

//! A mutable working copy of a `CommitStore`.
//!
//! The pending changes are owned separately from the borrowed view so the
//! working-set pair can hold two of them next to the store it reads from.

use crate::overlay::merged_range;
use weft_api::state::{ChangeSet, CommitStore, StateAccess, StateScanIter};
use weft_types::error::StateError;

/// Writes and deletes pending on top of the last commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChanges {
    writes: ChangeSet,
}

impl PendingChanges {
    /// Returns true when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// The number of distinct pending keys.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// The pending changes, in key order.
    pub fn changes(&self) -> &ChangeSet {
        &self.writes
    }

    /// Drops every pending change.
    pub fn discard(&mut self) {
        self.writes.clear();
    }

    /// Takes the pending changes, leaving the set empty.
    pub fn take(&mut self) -> ChangeSet {
        std::mem::take(&mut self.writes)
    }
}

/// A `StateAccess` view that reads through `pending` to the committed store
/// and buffers every mutation in `pending`.
pub struct WorkingSet<'a, S: CommitStore + ?Sized> {
    base: &'a S,
    pending: &'a mut PendingChanges,
}

impl<'a, S: CommitStore + ?Sized> WorkingSet<'a, S> {
    /// Opens a working copy of `base` backed by `pending`.
    pub fn new(base: &'a S, pending: &'a mut PendingChanges) -> Self {
        Self { base, pending }
    }

    /// The changes pending in this working set.
    pub fn pending(&self) -> &PendingChanges {
        self.pending
    }
}

impl<'a, S: CommitStore + ?Sized> StateAccess for WorkingSet<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.pending.writes.get(key) {
            Some(value_opt) => Ok(value_opt.clone()),
            None => self.base.get(key),
        }
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.pending.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.pending.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        let base = self.base.range(start, end)?;
        Ok(merged_range(base, &self.pending.writes, start, end))
    }
}
