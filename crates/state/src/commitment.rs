// Path: crates/state/src/commitment.rs
//! The content hash chain.
//!
//! `hash_n = SHA256(DOMAIN ‖ hash_{n-1} ‖ be64(version_n) ‖ changes)`, where
//! each change in ascending key order is `op ‖ be32(len key) ‖ key ‖ be32(len value) ‖ value`.
//! A delete carries an empty value. Every store backend uses this function, so
//! identical block sequences hash identically regardless of backend.

use sha2::{Digest, Sha256};
use weft_api::state::ChangeSet;

/// Domain separator for commit hashes.
pub const COMMIT_HASH_DOMAIN: &[u8] = b"weft/commit/v1";

const OP_WRITE: u8 = 0x01;
const OP_DELETE: u8 = 0x02;

fn be32_len(bytes: &[u8]) -> [u8; 4] {
    u32::try_from(bytes.len()).unwrap_or(u32::MAX).to_be_bytes()
}

/// Computes the content hash of a new version from its predecessor and the
/// change set applied on top of it.
pub fn commit_hash(prev: &[u8], version: u64, changes: &ChangeSet) -> Vec<u8> {
    let mut h = Sha256::new();
    h.update(COMMIT_HASH_DOMAIN);
    h.update(prev);
    h.update(version.to_be_bytes());
    for (key, value) in changes {
        let (op, value): (u8, &[u8]) = match value {
            Some(v) => (OP_WRITE, v),
            None => (OP_DELETE, &[]),
        };
        h.update([op]);
        h.update(be32_len(key));
        h.update(key);
        h.update(be32_len(value));
        h.update(value);
    }
    h.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_commits_still_chain() {
        let h1 = commit_hash(&[], 1, &ChangeSet::new());
        let h2 = commit_hash(&h1, 2, &ChangeSet::new());
        assert_eq!(h1.len(), 32);
        assert_ne!(h1, h2);
    }

    #[test]
    fn write_and_delete_hash_differently() {
        let mut w = ChangeSet::new();
        w.insert(b"k".to_vec(), Some(Vec::new()));
        let mut d = ChangeSet::new();
        d.insert(b"k".to_vec(), None);
        assert_ne!(commit_hash(&[], 1, &w), commit_hash(&[], 1, &d));
    }

    #[test]
    fn length_prefixes_prevent_boundary_ambiguity() {
        let mut a = ChangeSet::new();
        a.insert(b"ab".to_vec(), Some(b"c".to_vec()));
        let mut b = ChangeSet::new();
        b.insert(b"a".to_vec(), Some(b"bc".to_vec()));
        assert_ne!(commit_hash(&[], 1, &a), commit_hash(&[], 1, &b));
    }
}
