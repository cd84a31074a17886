// Path: crates/api/src/state/mod.rs
//! Core traits for state access.
//!
//! - `StateAccess`: the mutable key-value interface handlers and decorators see.
//!   Working sets, overlays and recorders all implement it.
//! - `CommitStore`: the durable, versioned store underneath the working sets.

use weft_types::error::StateError;

/// An owned key-value pair from the state.
pub type StateKVPair = (Vec<u8>, Vec<u8>);
/// A streaming iterator over key-value pairs in ascending key order.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + Send + 'a>;

mod accessor;
mod store;

pub use accessor::*;
pub use store::*;

/// Calculates the smallest byte vector that is strictly greater than all keys
/// starting with the given prefix. Returns None if the prefix is empty or all 0xFF bytes.
pub fn next_prefix(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut ub = prefix.to_vec();
    while let Some(last) = ub.pop() {
        if last != 0xFF {
            ub.push(last + 1);
            return Some(ub);
        }
    }
    None
}

/// Returns true when `key` lies in the half-open range `[start, end)`.
/// A missing bound is unbounded.
pub fn in_range(key: &[u8], start: Option<&[u8]>, end: Option<&[u8]>) -> bool {
    start.map_or(true, |s| key >= s) && end.map_or(true, |e| key < e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_prefix_increments_last_non_ff_byte() {
        assert_eq!(next_prefix(b"ab"), Some(b"ac".to_vec()));
        assert_eq!(next_prefix(&[0x01, 0xFF]), Some(vec![0x02]));
        assert_eq!(next_prefix(&[0xFF, 0xFF]), None);
        assert_eq!(next_prefix(b""), None);
    }

    #[test]
    fn range_bounds_are_half_open() {
        assert!(in_range(b"b", Some(&b"b"[..]), Some(&b"c"[..])));
        assert!(!in_range(b"c", Some(&b"b"[..]), Some(&b"c"[..])));
        assert!(in_range(b"zzz", None, None));
        assert!(!in_range(b"a", Some(&b"b"[..]), None));
    }
}
