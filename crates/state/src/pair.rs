// Path: crates/state/src/pair.rs

//! The check/deliver working-set pair.

use crate::working_set::{PendingChanges, WorkingSet};
use weft_api::state::{CommitStore, CommittedView};
use weft_types::app::CommitId;
use weft_types::error::StateError;

/// Owns the durable store and exactly two working copies of it.
///
/// Between commits, `check` and `deliver` are independently mutable overlays
/// on the same committed baseline: nothing written through one is visible
/// through the other, and neither touches the store until [`WorkingSetPair::commit`].
pub struct WorkingSetPair<S: CommitStore> {
    store: S,
    check: PendingChanges,
    deliver: PendingChanges,
    last_commit: CommitId,
}

impl<S: CommitStore> WorkingSetPair<S> {
    /// Loads the last committed version of `store` and opens both working sets on it.
    pub fn load(mut store: S) -> Result<Self, StateError> {
        let last_commit = store.load_latest_version()?;
        tracing::info!(
            target: "state",
            event = "store_loaded",
            version = last_commit.version,
            hash = %hex_prefix(&last_commit.hash),
            "Loaded last committed version"
        );
        Ok(Self {
            store,
            check: PendingChanges::default(),
            deliver: PendingChanges::default(),
            last_commit,
        })
    }

    /// The check working set.
    pub fn check(&mut self) -> WorkingSet<'_, S> {
        WorkingSet::new(&self.store, &mut self.check)
    }

    /// The deliver working set.
    pub fn deliver(&mut self) -> WorkingSet<'_, S> {
        WorkingSet::new(&self.store, &mut self.deliver)
    }

    /// A read-only view of the last committed state.
    pub fn committed(&self) -> CommittedView<'_, S> {
        CommittedView::new(&self.store)
    }

    /// The id of the last commit.
    pub fn last_commit_id(&self) -> &CommitId {
        &self.last_commit
    }

    /// The changes pending in the deliver working set.
    pub fn pending_deliver(&self) -> &PendingChanges {
        &self.deliver
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flushes deliver into the store, discards check, commits the store and
    /// leaves both working sets empty on the new baseline.
    ///
    /// If the flush fails the store is not committed. Either failure leaves the
    /// pair unusable; callers must treat it as fatal.
    pub fn commit(&mut self) -> Result<CommitId, StateError> {
        let changes = self.deliver.take();
        let n_changes = changes.len();
        self.store.write_batch(changes)?;
        self.check.discard();
        let id = self.store.commit()?;
        tracing::debug!(
            target: "state",
            event = "commit",
            version = id.version,
            changes = n_changes,
            "Committed working set"
        );
        self.last_commit = id.clone();
        Ok(id)
    }
}

fn hex_prefix(hash: &[u8]) -> String {
    hash.iter().take(4).map(|b| format!("{b:02x}")).collect()
}
