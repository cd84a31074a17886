// Path: crates/api/src/state/accessor.rs
//! Defines the `StateAccess` trait for key-value storage operations.

use crate::state::{next_prefix, StateScanIter};
use weft_types::error::StateError;

/// A dyn-safe interface for reading and writing key-value state.
///
/// Handlers and decorators receive `&mut dyn StateAccess` and never learn
/// whether they are writing into a working set, a savepoint overlay or a
/// change recorder.
pub trait StateAccess: Send + Sync {
    /// Gets a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    /// Returns true when the key holds a value.
    fn has(&self, key: &[u8]) -> Result<bool, StateError> {
        Ok(self.get(key)?.is_some())
    }

    /// Inserts a key-value pair.
    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError>;

    /// Deletes a key-value pair. Deleting a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StateError>;

    /// Iterates live entries with keys in `[start, end)`, in ascending key order.
    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError>;

    /// Iterates all live entries whose key starts with `prefix`.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let end = next_prefix(prefix);
        self.range(Some(prefix), end.as_deref())
    }

    /// Whether a nested savepoint overlay may be layered on top of this state.
    ///
    /// Read-only views return false, and the savepoint decorator then passes
    /// calls straight through.
    fn supports_overlay(&self) -> bool {
        true
    }
}

// Blanket implementation to allow `StateAccess` to be used behind a `Box` trait object.
impl<T: StateAccess + ?Sized> StateAccess for Box<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        (**self).get(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool, StateError> {
        (**self).has(key)
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        (**self).insert(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        (**self).delete(key)
    }

    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        (**self).range(start, end)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        (**self).prefix_scan(prefix)
    }

    fn supports_overlay(&self) -> bool {
        (**self).supports_overlay()
    }
}
