// Path: crates/storage/src/redb_store.rs
use crate::metrics::metrics;
use redb::{Database, ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::path::Path;
use weft_api::state::{ChangeSet, CommitStore, StateScanIter};
use weft_state::commitment::commit_hash;
use weft_types::app::CommitId;
use weft_types::error::StateError;

/// ---- Table definitions (single DB) ----
const STATE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("STATE");
const HEAD: TableDefinition<&str, &[u8]> = TableDefinition::new("HEAD"); // value = [version_be(8)][hash]

const HEAD_KEY: &str = "HEAD";

fn backend<E: std::fmt::Display>(e: E) -> StateError {
    StateError::Backend(e.to_string())
}

fn enc_head(id: &CommitId) -> Vec<u8> {
    [id.version.to_be_bytes().as_slice(), id.hash.as_slice()].concat()
}

fn dec_head(bytes: &[u8]) -> Result<CommitId, StateError> {
    let (v, hash) = (bytes.get(..8), bytes.get(8..));
    match (v, hash) {
        (Some(v), Some(hash)) => {
            let mut a = [0u8; 8];
            a.copy_from_slice(v);
            Ok(CommitId {
                version: u64::from_be_bytes(a),
                hash: hash.to_vec(),
            })
        }
        _ => Err(StateError::Decode(format!(
            "HEAD record is {} bytes, expected at least 8",
            bytes.len()
        ))),
    }
}

/// A persistent `CommitStore` backed by redb.
///
/// Staged batches live in memory until `commit`, which applies them together
/// with the new head in one write transaction. A crash therefore leaves either
/// the previous version or the new one, never half a block.
pub struct RedbStore {
    db: Database,
    staged: ChangeSet,
    head: CommitId,
}

impl RedbStore {
    /// Opens (or creates) the database at `path` and reads the committed head.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let db = Database::create(path.as_ref()).map_err(backend)?;

        // Ensure tables exist
        {
            let w = db.begin_write().map_err(backend)?;
            {
                w.open_table(STATE).map_err(backend)?;
                w.open_table(HEAD).map_err(backend)?;
            }
            w.commit().map_err(backend)?;
        }

        let mut store = Self {
            db,
            staged: ChangeSet::new(),
            head: CommitId::default(),
        };
        store.head = store.read_head()?;
        tracing::info!(
            target: "storage",
            event = "opened",
            path = %path.as_ref().display(),
            version = store.head.version,
            "Opened redb store"
        );
        Ok(store)
    }

    fn read_txn(&self) -> Result<ReadTransaction<'_>, StateError> {
        self.db.begin_read().map_err(backend)
    }

    fn write_txn(&self) -> Result<WriteTransaction<'_>, StateError> {
        self.db.begin_write().map_err(backend)
    }

    fn read_head(&self) -> Result<CommitId, StateError> {
        let r = self.read_txn()?;
        let t = r.open_table(HEAD).map_err(backend)?;
        let head = t.get(HEAD_KEY).map_err(backend)?;
        match head {
            Some(v) => dec_head(v.value()),
            None => Ok(CommitId::default()),
        }
    }
}

impl CommitStore for RedbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let r = self.read_txn()?;
        let t = r.open_table(STATE).map_err(backend)?;
        let value = t.get(key).map_err(backend)?.map(|v| v.value().to_vec());
        Ok(value)
    }

    /// Materializes the range before returning: redb iterators borrow their
    /// read transaction, which cannot outlive this call.
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
        let r = self.read_txn()?;
        let t = r.open_table(STATE).map_err(backend)?;
        let lo = start.map_or(Unbounded, Included);
        let hi = end.map_or(Unbounded, Excluded);
        let mut out = Vec::new();
        for entry in t.range::<&[u8]>((lo, hi)).map_err(backend)? {
            let (k, v) = entry.map_err(backend)?;
            out.push(Ok((k.value().to_vec(), v.value().to_vec())));
        }
        Ok(Box::new(out.into_iter()))
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
        let hash = commit_hash(&self.head.hash, version, &self.staged);
        let next = CommitId { version, hash };

        let mut bytes_written = 0u64;
        let mut deleted = 0u64;
        let w = self.write_txn()?;
        {
            let mut state = w.open_table(STATE).map_err(backend)?;
            for (key, value) in &self.staged {
                match value {
                    Some(v) => {
                        state.insert(key.as_slice(), v.as_slice()).map_err(backend)?;
                        bytes_written += (key.len() + v.len()) as u64;
                    }
                    None => {
                        state.remove(key.as_slice()).map_err(backend)?;
                        deleted += 1;
                    }
                }
            }
            let mut head = w.open_table(HEAD).map_err(backend)?;
            head.insert(HEAD_KEY, enc_head(&next).as_slice())
                .map_err(backend)?;
        }
        w.commit().map_err(backend)?;

        self.staged.clear();
        self.head = next.clone();
        metrics().inc_bytes_written_total(bytes_written);
        metrics().inc_keys_deleted_total(deleted);
        tracing::debug!(
            target: "storage",
            event = "commit",
            version,
            bytes_written,
            deleted,
            "Committed block to redb"
        );
        Ok(next)
    }

    fn latest_commit_id(&self) -> CommitId {
        self.head.clone()
    }

    fn load_latest_version(&mut self) -> Result<CommitId, StateError> {
        self.staged.clear();
        self.head = self.read_head()?;
        Ok(self.head.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use weft_state::memory::MemoryStore;

    fn batch(entries: &[(&str, Option<&str>)]) -> ChangeSet {
        entries
            .iter()
            .map(|(k, v)| (k.as_bytes().to_vec(), v.map(|v| v.as_bytes().to_vec())))
            .collect()
    }

    #[test]
    fn reopen_restores_head_and_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.redb");

        let id = {
            let mut store = RedbStore::open(&path).unwrap();
            assert!(store.latest_commit_id().is_empty());
            store
                .write_batch(batch(&[("a", Some("1")), ("b", Some("2"))]))
                .unwrap();
            store.commit().unwrap();
            store.write_batch(batch(&[("a", None)])).unwrap();
            let id = store.commit().unwrap();
            // Staged but never committed.
            store.write_batch(batch(&[("c", Some("3"))])).unwrap();
            id
        };

        let mut store = RedbStore::open(&path).unwrap();
        assert_eq!(store.latest_commit_id(), id);
        assert_eq!(store.load_latest_version().unwrap(), id);
        assert_eq!(store.get(b"a").unwrap(), None);
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.get(b"c").unwrap(), None);
    }

    #[test]
    fn hashes_match_the_memory_store() {
        let dir = tempdir().unwrap();
        let mut redb = RedbStore::open(dir.path().join("state.redb")).unwrap();
        let mut mem = MemoryStore::new();

        let blocks = [
            batch(&[("k1", Some("v1")), ("k2", Some("v2"))]),
            batch(&[]),
            batch(&[("k1", None), ("k3", Some(""))]),
        ];
        for b in blocks {
            redb.write_batch(b.clone()).unwrap();
            mem.write_batch(b).unwrap();
            assert_eq!(redb.commit().unwrap(), mem.commit().unwrap());
        }
    }

    #[test]
    fn range_scans_committed_entries_in_order() {
        let dir = tempdir().unwrap();
        let mut store = RedbStore::open(dir.path().join("state.redb")).unwrap();
        store
            .write_batch(batch(&[
                ("p::b", Some("2")),
                ("p::a", Some("1")),
                ("q", Some("3")),
            ]))
            .unwrap();
        store.commit().unwrap();

        let got: Vec<_> = store
            .range(Some(&b"p::"[..]), Some(&b"p:;"[..]))
            .unwrap()
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(got, vec![b"p::a".to_vec(), b"p::b".to_vec()]);
    }

    #[test]
    fn truncated_head_is_a_decode_error() {
        assert!(matches!(dec_head(&[1, 2, 3]), Err(StateError::Decode(_))));
        let id = dec_head(&enc_head(&CommitId {
            version: 9,
            hash: vec![7; 32],
        }))
        .unwrap();
        assert_eq!(id.version, 9);
    }
}
