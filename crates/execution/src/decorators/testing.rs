// Path: crates/execution/src/decorators/testing.rs

//! Shared fixtures for the execution tests.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::{Arc, Mutex};
use weft_api::state::{StateAccess, StateScanIter};
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::{Decorator, Handler};
use weft_api::transaction::{Tx, TxDecoder};
use weft_state::memory::MemoryStore;
use weft_state::working_set::PendingChanges;
use weft_types::app::{CheckResult, ChainId, DeliverResult, Tag, Timestamp, ValidatorUpdate};
use weft_types::error::{StateError, TransactionError};

pub fn ctx() -> Context {
    Context::new(
        ChainId::parse("test-chain").unwrap(),
        1,
        Timestamp::from_secs(1),
        Vec::new(),
    )
}

pub fn scratch() -> (MemoryStore, PendingChanges) {
    (MemoryStore::new(), PendingChanges::default())
}

/// A scriptable transaction: writes, deletes, then fails or faults if asked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestTx {
    pub route: String,
    pub writes: Vec<(Vec<u8>, Vec<u8>)>,
    pub deletes: Vec<Vec<u8>>,
    pub diff: Vec<ValidatorUpdate>,
    pub tags: Vec<(String, String)>,
    pub fail: bool,
    pub fault: bool,
}

impl TestTx {
    pub fn new(route: &str) -> Self {
        Self {
            route: route.to_string(),
            ..Default::default()
        }
    }

    pub fn write(mut self, key: &[u8], value: &[u8]) -> Self {
        self.writes.push((key.to_vec(), value.to_vec()));
        self
    }

    pub fn delete(mut self, key: &[u8]) -> Self {
        self.deletes.push(key.to_vec());
        self
    }

    pub fn diff(mut self, updates: Vec<ValidatorUpdate>) -> Self {
        self.diff = updates;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn faulting(mut self) -> Self {
        self.fault = true;
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap()
    }
}

impl Tx for TestTx {
    fn route(&self) -> &str {
        &self.route
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Decodes JSON-encoded [`TestTx`]. The bytes `fault` make the decoder panic.
pub struct TestDecoder;

impl TxDecoder for TestDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn Tx>, TransactionError> {
        if bytes == b"fault" {
            panic!("decoder blew up");
        }
        let tx: TestTx = serde_json::from_slice(bytes)
            .map_err(|e| TransactionError::Decoding(e.to_string()))?;
        Ok(Box::new(tx))
    }
}

/// Runs a [`TestTx`] script against the given state.
pub struct ScriptHandler;

fn run_script<'a>(state: &mut dyn StateAccess, tx: &'a dyn Tx) -> Result<&'a TestTx, TransactionError> {
    let tx = tx
        .downcast_ref::<TestTx>()
        .ok_or_else(|| TransactionError::InvalidInput("not a test tx".into()))?;
    for (k, v) in &tx.writes {
        state.insert(k, v)?;
    }
    for k in &tx.deletes {
        state.delete(k)?;
    }
    if tx.fault {
        panic!("handler exploded");
    }
    if tx.fail {
        return Err(TransactionError::module("test", 1, "scripted failure"));
    }
    Ok(tx)
}

impl Handler for ScriptHandler {
    fn check(
        &self,
        _ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        run_script(state, tx)?;
        Ok(CheckResult {
            gas_wanted: 1,
            ..Default::default()
        })
    }

    fn deliver(
        &self,
        _ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        let tx = run_script(state, tx)?;
        Ok(DeliverResult {
            diff: tx.diff.clone(),
            tags: tx
                .tags
                .iter()
                .map(|(k, v)| Tag::new(k.as_bytes(), v.as_bytes()))
                .collect(),
            gas_used: 1,
            ..Default::default()
        })
    }
}

pub struct NoopHandler;

impl Handler for NoopHandler {
    fn check(
        &self,
        _ctx: &Context,
        _state: &mut dyn StateAccess,
        _tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        Ok(CheckResult::default())
    }

    fn deliver(
        &self,
        _ctx: &Context,
        _state: &mut dyn StateAccess,
        _tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        Ok(DeliverResult::default())
    }
}

pub struct FailingHandler;

impl Handler for FailingHandler {
    fn check(
        &self,
        _ctx: &Context,
        _state: &mut dyn StateAccess,
        _tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        Err(TransactionError::module("test", 1, "always fails"))
    }

    fn deliver(
        &self,
        _ctx: &Context,
        _state: &mut dyn StateAccess,
        _tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        Err(TransactionError::module("test", 1, "always fails"))
    }
}

/// Records entry and exit into a shared log.
pub struct Tracer {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Tracer {
    pub fn new(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { label, log }
    }

    fn record(&self, what: &str) {
        self.log.lock().unwrap().push(format!("{what} {}", self.label));
    }
}

impl Decorator for Tracer {
    fn name(&self) -> &'static str {
        "tracer"
    }

    fn on_check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TransactionError> {
        self.record("enter");
        let res = next.check(ctx, state, tx);
        self.record("exit");
        res
    }

    fn on_deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TransactionError> {
        self.record("enter");
        let res = next.deliver(ctx, state, tx);
        self.record("exit");
        res
    }
}

/// A working set that refuses nested overlays.
pub struct Flat<'a>(pub &'a mut dyn StateAccess);

impl StateAccess for Flat<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.0.get(key)
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.0.insert(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.0.delete(key)
    }

    fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<StateScanIter<'_>, StateError> {
        self.0.range(start, end)
    }

    fn supports_overlay(&self) -> bool {
        false
    }
}
