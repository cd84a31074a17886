// Path: crates/state/src/recording.rs

//! A pass-through state wrapper that remembers the last operation per key.

use std::collections::BTreeMap;
use weft_api::state::{StateAccess, StateScanIter};
use weft_types::error::StateError;

/// The last operation applied to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The key was written.
    Write,
    /// The key was deleted.
    Delete,
}

impl ChangeKind {
    /// The one-byte tag marker: `s` for a write, `d` for a delete.
    pub fn marker(self) -> &'static [u8] {
        match self {
            ChangeKind::Write => b"s",
            ChangeKind::Delete => b"d",
        }
    }
}

/// Forwards every call to the wrapped state and records, per distinct key,
/// whether the last mutation was a write or a delete.
pub struct RecordingState<'a> {
    inner: &'a mut dyn StateAccess,
    touched: BTreeMap<Vec<u8>, ChangeKind>,
}

impl<'a> RecordingState<'a> {
    /// Wraps a state.
    pub fn new(inner: &'a mut dyn StateAccess) -> Self {
        Self {
            inner,
            touched: BTreeMap::new(),
        }
    }

    /// Consumes the recorder and returns the recorded keys.
    pub fn into_changes(self) -> BTreeMap<Vec<u8>, ChangeKind> {
        self.touched
    }
}

impl<'a> StateAccess for RecordingState<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.inner.get(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool, StateError> {
        self.inner.has(key)
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.inner.insert(key, value)?;
        self.touched.insert(key.to_vec(), ChangeKind::Write);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.inner.delete(key)?;
        self.touched.insert(key.to_vec(), ChangeKind::Delete);
        Ok(())
    }

    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        self.inner.range(start, end)
    }

    fn supports_overlay(&self) -> bool {
        self.inner.supports_overlay()
    }
}
