// Path: crates/state/src/tests/mod.rs

use crate::memory::MemoryStore;
use crate::overlay::StateOverlay;
use crate::pair::WorkingSetPair;
use crate::working_set::{PendingChanges, WorkingSet};
use proptest::prelude::*;
use std::collections::BTreeMap;
use weft_api::state::{ChangeSet, CommitStore, StateAccess};
use weft_types::error::StateError;

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(64);
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

#[derive(Debug, Clone)]
enum Op {
    Insert(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

fn arb_key() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 1..3)
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (arb_key(), prop::collection::vec(any::<u8>(), 0..3)).prop_map(|(k, v)| Op::Insert(k, v)),
        arb_key().prop_map(Op::Delete),
    ]
}

fn apply_model(model: &mut BTreeMap<Vec<u8>, Vec<u8>>, op: &Op) {
    match op {
        Op::Insert(k, v) => {
            model.insert(k.clone(), v.clone());
        }
        Op::Delete(k) => {
            model.remove(k);
        }
    }
}

fn apply_state(state: &mut dyn StateAccess, op: &Op) {
    match op {
        Op::Insert(k, v) => state.insert(k, v).unwrap(),
        Op::Delete(k) => state.delete(k).unwrap(),
    }
}

fn scan(state: &dyn StateAccess) -> Vec<(Vec<u8>, Vec<u8>)> {
    state.range(None, None).unwrap().map(|r| r.unwrap()).collect()
}

fn store_with(entries: &[(Vec<u8>, Vec<u8>)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    let batch: ChangeSet = entries
        .iter()
        .map(|(k, v)| (k.clone(), Some(v.clone())))
        .collect();
    store.write_batch(batch).unwrap();
    store.commit().unwrap();
    store
}

proptest! {
    #![proptest_config(proptest_config())]
    #[test]
    fn nested_overlays_match_btreemap_model(
        base in prop::collection::vec((arb_key(), prop::collection::vec(any::<u8>(), 0..3)), 0..6),
        outer_ops in prop::collection::vec(arb_op(), 0..8),
        inner_ops in prop::collection::vec(arb_op(), 0..8),
        keep_inner in any::<bool>(),
    ) {
        let store = store_with(&base);
        let mut model: BTreeMap<Vec<u8>, Vec<u8>> = base.into_iter().collect();

        let mut pending = PendingChanges::default();
        let mut ws = WorkingSet::new(&store, &mut pending);
        let mut outer = StateOverlay::new(&mut ws);
        for op in &outer_ops {
            apply_state(&mut outer, op);
            apply_model(&mut model, op);
        }

        let before_inner = model.clone();
        {
            let mut inner = StateOverlay::new(&mut outer);
            for op in &inner_ops {
                apply_state(&mut inner, op);
                apply_model(&mut model, op);
            }
            prop_assert_eq!(scan(&inner), model.clone().into_iter().collect::<Vec<_>>());
            for (k, v) in &model {
                prop_assert_eq!(inner.get(k).unwrap(), Some(v.clone()));
            }
            if keep_inner {
                inner.flush().unwrap();
            } else {
                inner.discard();
                model = before_inner;
            }
        }

        prop_assert_eq!(scan(&outer), model.clone().into_iter().collect::<Vec<_>>());
        outer.flush().unwrap();
        prop_assert_eq!(scan(&ws), model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prefix_scan_agrees_with_filter(
        base in prop::collection::vec((arb_key(), prop::collection::vec(any::<u8>(), 0..3)), 0..6),
        ops in prop::collection::vec(arb_op(), 0..8),
        prefix in prop::collection::vec(0u8..4, 0..2),
    ) {
        let store = store_with(&base);
        let mut model: BTreeMap<Vec<u8>, Vec<u8>> = base.into_iter().collect();
        let mut pending = PendingChanges::default();
        let mut ws = WorkingSet::new(&store, &mut pending);
        for op in &ops {
            apply_state(&mut ws, op);
            apply_model(&mut model, op);
        }
        let got: Vec<_> = ws.prefix_scan(&prefix).unwrap().map(|r| r.unwrap()).collect();
        let want: Vec<_> = model.into_iter().filter(|(k, _)| k.starts_with(&prefix)).collect();
        prop_assert_eq!(got, want);
    }
}

#[test]
fn check_writes_never_reach_deliver_or_store() {
    let mut pair = WorkingSetPair::load(MemoryStore::new()).unwrap();
    pair.check().insert(b"check-only", b"check").unwrap();

    assert_eq!(pair.deliver().get(b"check-only").unwrap(), None);
    assert_eq!(pair.committed().get(b"check-only").unwrap(), None);

    pair.deliver().insert(b"other", b"deliver").unwrap();
    assert_eq!(pair.check().get(b"other").unwrap(), None);

    let id = pair.commit().unwrap();
    assert_eq!(id.version, 1);
    assert_eq!(pair.committed().get(b"check-only").unwrap(), None);
    assert_eq!(pair.committed().get(b"other").unwrap(), Some(b"deliver".to_vec()));
    // Both working sets start over on the new baseline.
    assert_eq!(pair.check().get(b"check-only").unwrap(), None);
    assert_eq!(pair.check().get(b"other").unwrap(), Some(b"deliver".to_vec()));
    assert!(pair.pending_deliver().is_empty());
}

#[test]
fn every_commit_yields_a_fresh_hash() {
    let mut pair = WorkingSetPair::load(MemoryStore::new()).unwrap();
    let first = pair.commit().unwrap();
    let second = pair.commit().unwrap();
    assert_eq!((first.version, second.version), (1, 2));
    assert_ne!(first.hash, second.hash);
    assert_eq!(pair.last_commit_id(), &second);
}

#[test]
fn committed_view_rejects_writes_and_overlays() {
    let mut pair = WorkingSetPair::load(MemoryStore::new()).unwrap();
    pair.deliver().insert(b"k", b"v").unwrap();
    pair.commit().unwrap();
    let mut view = pair.committed();
    assert!(!view.supports_overlay());
    assert!(matches!(
        view.insert(b"k", b"x"),
        Err(StateError::InvalidValue(_))
    ));
}

/// A store whose batch staging always fails.
struct BrokenStore(MemoryStore);

impl CommitStore for BrokenStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.0.get(key)
    }
    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<weft_api::state::StateScanIter<'_>, StateError> {
        self.0.range(start, end)
    }
    fn write_batch(&mut self, _changes: ChangeSet) -> Result<(), StateError> {
        Err(StateError::Backend("disk full".into()))
    }
    fn commit(&mut self) -> Result<weft_types::app::CommitId, StateError> {
        self.0.commit()
    }
    fn latest_commit_id(&self) -> weft_types::app::CommitId {
        self.0.latest_commit_id()
    }
    fn load_latest_version(&mut self) -> Result<weft_types::app::CommitId, StateError> {
        self.0.load_latest_version()
    }
}

#[test]
fn failed_flush_skips_store_commit() {
    let mut pair = WorkingSetPair::load(BrokenStore(MemoryStore::new())).unwrap();
    pair.deliver().insert(b"k", b"v").unwrap();
    assert!(pair.commit().is_err());
    assert_eq!(pair.store().latest_commit_id().version, 0);
}
