// Path: crates/state/src/overlay.rs

//! A copy-on-write overlay used as a nested savepoint.

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::{Fuse, Peekable};
use std::ops::Bound::{self, Excluded, Included, Unbounded};
use weft_api::state::{ChangeSet, StateAccess, StateKVPair, StateScanIter};
use weft_types::error::StateError;

type WriteRange<'a> = Peekable<btree_map::Range<'a, Vec<u8>, Option<Vec<u8>>>>;

/// Merges a base scan with a range of pending writes. Pending entries shadow
/// base entries with the same key; pending deletes hide them.
struct MergingIterator<'a> {
    base: Peekable<Fuse<StateScanIter<'a>>>,
    writes: WriteRange<'a>,
}

impl<'a> Iterator for MergingIterator<'a> {
    type Item = Result<StateKVPair, StateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if matches!(self.base.peek(), Some(Err(_))) {
                return self.base.next();
            }
            let base_key = self
                .base
                .peek()
                .and_then(|res| res.as_ref().ok())
                .map(|(k, _)| k.as_slice());
            let write_key = self.writes.peek().map(|(k, _)| k.as_slice());

            let decision = match (base_key, write_key) {
                (Some(bk), Some(wk)) => bk.cmp(wk),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => return None,
            };

            if decision == Ordering::Less {
                return self.base.next();
            }
            if decision == Ordering::Equal {
                self.base.next();
            }
            if let Some((key, Some(val))) = self.writes.next() {
                return Some(Ok((key.clone(), val.clone())));
            }
        }
    }
}

fn bounds(start: Option<&[u8]>, end: Option<&[u8]>) -> (Bound<Vec<u8>>, Bound<Vec<u8>>) {
    let lo = start.map_or(Unbounded, |s| Included(s.to_vec()));
    let hi = end.map_or(Unbounded, |e| Excluded(e.to_vec()));
    (lo, hi)
}

/// Scans `base` over `[start, end)` and shadows it with `writes`.
pub(crate) fn merged_range<'a>(
    base: StateScanIter<'a>,
    writes: &'a ChangeSet,
    start: Option<&[u8]>,
    end: Option<&[u8]>,
) -> StateScanIter<'a> {
    // BTreeMap::range panics on an inverted range.
    if let (Some(s), Some(e)) = (start, end) {
        if s >= e {
            return Box::new(std::iter::empty());
        }
    }
    Box::new(MergingIterator {
        base: base.fuse().peekable(),
        writes: writes.range(bounds(start, end)).peekable(),
    })
}

/// An in-memory, copy-on-write overlay on a mutable parent state.
///
/// Reads check the local write cache first and fall through to the parent.
/// Writes stay local until [`StateOverlay::flush`] applies them to the parent
/// in ascending key order; [`StateOverlay::discard`] drops them.
pub struct StateOverlay<'a> {
    base: &'a mut dyn StateAccess,
    writes: ChangeSet,
}

impl<'a> StateOverlay<'a> {
    /// Creates a new, empty overlay on top of a parent state.
    pub fn new(base: &'a mut dyn StateAccess) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// The pending changes, in key order.
    pub fn changes(&self) -> &ChangeSet {
        &self.writes
    }

    /// Returns true when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Applies the pending changes to the parent, one level up.
    pub fn flush(self) -> Result<(), StateError> {
        let StateOverlay { base, writes } = self;
        for (key, value) in writes {
            match value {
                Some(v) => base.insert(&key, &v)?,
                None => base.delete(&key)?,
            }
        }
        Ok(())
    }

    /// Drops the pending changes. The parent is untouched.
    pub fn discard(self) {}
}

impl<'a> StateAccess for StateOverlay<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.writes.get(key) {
            Some(value_opt) => Ok(value_opt.clone()),
            None => self.base.get(key),
        }
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        let base = self.base.range(start, end)?;
        Ok(merged_range(base, &self.writes, start, end))
    }
}
