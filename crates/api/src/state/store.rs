// Path: crates/api/src/state/store.rs
//! Defines the `CommitStore` trait for the durable, versioned store.

use crate::state::{StateAccess, StateScanIter};
use std::collections::BTreeMap;
use weft_types::app::CommitId;
use weft_types::error::StateError;

/// An ordered set of pending changes: `Some(value)` writes, `None` deletes.
///
/// `BTreeMap` keeps the flush order, and therefore the content hash, deterministic.
pub type ChangeSet = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// The durable store the working sets are opened on.
///
/// Reads always observe the last committed state. Batches staged with
/// [`CommitStore::write_batch`] become visible only once [`CommitStore::commit`]
/// succeeds.
pub trait CommitStore: Send + Sync {
    /// Gets a committed value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    /// Returns true when the committed state holds the key.
    fn has(&self, key: &[u8]) -> Result<bool, StateError> {
        Ok(self.get(key)?.is_some())
    }

    /// Iterates committed entries with keys in `[start, end)`.
    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError>;

    /// Stages a change set for the next commit. Later batches override earlier
    /// ones key by key.
    fn write_batch(&mut self, changes: ChangeSet) -> Result<(), StateError>;

    /// Applies the staged changes atomically and advances the version by one.
    fn commit(&mut self) -> Result<CommitId, StateError>;

    /// The id of the last successful commit.
    fn latest_commit_id(&self) -> CommitId;

    /// Reloads the last committed version from durable media, dropping anything staged.
    fn load_latest_version(&mut self) -> Result<CommitId, StateError>;
}

impl<T: CommitStore + ?Sized> CommitStore for Box<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        (**self).get(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool, StateError> {
        (**self).has(key)
    }

    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        (**self).range(start, end)
    }

    fn write_batch(&mut self, changes: ChangeSet) -> Result<(), StateError> {
        (**self).write_batch(changes)
    }

    fn commit(&mut self) -> Result<CommitId, StateError> {
        (**self).commit()
    }

    fn latest_commit_id(&self) -> CommitId {
        (**self).latest_commit_id()
    }

    fn load_latest_version(&mut self) -> Result<CommitId, StateError> {
        (**self).load_latest_version()
    }
}

/// A read-only `StateAccess` view of a store's committed state.
///
/// Used by the query path. Writes are rejected and no overlay is offered.
pub struct CommittedView<'a, S: CommitStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CommitStore + ?Sized> CommittedView<'a, S> {
    /// Wraps a store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<'a, S: CommitStore + ?Sized> StateAccess for CommittedView<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.store.get(key)
    }

    fn insert(&mut self, _key: &[u8], _value: &[u8]) -> Result<(), StateError> {
        Err(StateError::InvalidValue(
            "committed view is read-only".into(),
        ))
    }

    fn delete(&mut self, _key: &[u8]) -> Result<(), StateError> {
        Err(StateError::InvalidValue(
            "committed view is read-only".into(),
        ))
    }

    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        self.store.range(start, end)
    }

    fn supports_overlay(&self) -> bool {
        false
    }
}
