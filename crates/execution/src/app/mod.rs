// Path: crates/execution/src/app/mod.rs
mod end_block;
mod state_machine;


pub use end_block::ValidatorUpdates;

use crate::query::QueryRouter;
use crate::util::fault_message;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use weft_api::genesis::GenesisInitializer;
use weft_api::state::{CommitStore, StateAccess};
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::Handler;
use weft_api::transaction::{Tx, TxDecoder};
use weft_state::pair::WorkingSetPair;
use weft_telemetry::error_metrics;
use weft_types::app::{ChainId, Timestamp};
use weft_types::error::{ChainError, CoreError, ErrorCode, StateError, TransactionError};
use weft_types::codec::decode_record;
use weft_types::keys::{CHAIN_ID_KEY, LAST_BLOCK_TIME_KEY};
use weft_types::MAX_TX_BYTES;

/// Collects the parts of an [`Application`] and wires them together.
pub struct ApplicationBuilder {
    name: String,
    version: String,
    decoder: Arc<dyn TxDecoder>,
    handler: Arc<dyn Handler>,
    initializers: Vec<Arc<dyn GenesisInitializer>>,
    queries: QueryRouter,
}

impl Debug for ApplicationBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationBuilder")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("initializers", &self.initializers.iter().map(|i| i.name()).collect::<Vec<_>>())
            .field("queries", &self.queries)
            .finish_non_exhaustive()
    }
}

impl ApplicationBuilder {
    /// Starts a builder. `handler` is usually a [`crate::Chain`] resolved onto a
    /// [`crate::Router`].
    pub fn new(name: impl Into<String>, decoder: Arc<dyn TxDecoder>, handler: Arc<dyn Handler>) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            decoder,
            handler,
            initializers: Vec::new(),
            queries: QueryRouter::new(),
        }
    }

    /// Overrides the version string `Info` reports. Defaults to this crate's.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Appends a genesis initializer. Initializers run in the order added.
    pub fn initializer(mut self, init: Arc<dyn GenesisInitializer>) -> Result<Self, CoreError> {
        if self.initializers.iter().any(|i| i.name() == init.name()) {
            return Err(CoreError::DuplicateInitializer(init.name().to_string()));
        }
        self.initializers.push(init);
        Ok(self)
    }

    /// Replaces the query router.
    pub fn queries(mut self, queries: QueryRouter) -> Self {
        self.queries = queries;
        self
    }

    /// Loads the last committed version of `store` and builds the harness.
    ///
    /// A store that cannot be loaded, or holds an unreadable chain id or block
    /// time, is a fatal [`ChainError::Store`].
    pub fn build<S: CommitStore>(self, store: S) -> Result<Application<S>, ChainError> {
        let pair = WorkingSetPair::load(store)?;
        let chain_id = read_chain_id(&pair.committed())?;
        let last_block_time = read_last_block_time(&pair.committed())?;
        tracing::info!(
            target: "app",
            event = "startup",
            name = %self.name,
            version = pair.last_commit_id().version,
            chain_id = chain_id.as_ref().map(|c| c.as_str()).unwrap_or("<unset>"),
            "Application loaded"
        );
        Ok(Application {
            name: self.name,
            version: self.version,
            pair,
            handler: self.handler,
            decoder: self.decoder,
            initializers: self.initializers,
            queries: self.queries,
            chain_id,
            block: None,
            last_block_time,
            validator_updates: ValidatorUpdates::new(),
            halted: false,
        })
    }
}

fn read_chain_id(state: &dyn StateAccess) -> Result<Option<ChainId>, StateError> {
    let Some(bytes) = state.get(CHAIN_ID_KEY)? else {
        return Ok(None);
    };
    let s = String::from_utf8(bytes).map_err(|e| StateError::Decode(e.to_string()))?;
    ChainId::parse(&s)
        .map(Some)
        .map_err(|e| StateError::Decode(e.to_string()))
}

fn read_last_block_time(state: &dyn StateAccess) -> Result<Timestamp, StateError> {
    match state.get(LAST_BLOCK_TIME_KEY)? {
        Some(bytes) => decode_record(&bytes),
        None => Ok(Timestamp::default()),
    }
}

/// The transaction-processing harness.
///
/// Owns the check/deliver working-set pair, the resolved decorator chain, the
/// chain id, the open block's [`Context`] and the validator-update accumulator,
/// and drives them through the lifecycle of [`weft_api::lifecycle::ChainApplication`].
///
/// Any fatal [`ChainError`] halts the harness: every later call returns
/// [`ChainError::Halted`] and the embedding process is expected to exit.
pub struct Application<S: CommitStore> {
    name: String,
    version: String,
    pair: WorkingSetPair<S>,
    handler: Arc<dyn Handler>,
    decoder: Arc<dyn TxDecoder>,
    initializers: Vec<Arc<dyn GenesisInitializer>>,
    queries: QueryRouter,
    chain_id: Option<ChainId>,
    block: Option<Context>,
    last_block_time: Timestamp,
    validator_updates: ValidatorUpdates,
    halted: bool,
}

impl<S: CommitStore> Debug for Application<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("last_commit", self.pair.last_commit_id())
            .field("chain_id", &self.chain_id)
            .field("block", &self.block)
            .field("initializers", &self.initializers.iter().map(|i| i.name()).collect::<Vec<_>>())
            .field("queries", &self.queries)
            .field("halted", &self.halted)
            .finish_non_exhaustive()
    }
}

impl<S: CommitStore> Application<S> {
    /// Returns true once a fatal error has halted the harness.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// The chain id fixed at genesis, if any.
    pub fn chain_id(&self) -> Option<&ChainId> {
        self.chain_id.as_ref()
    }

    /// The validator changes accumulated so far in the open block.
    pub fn pending_validator_updates(&self) -> &ValidatorUpdates {
        &self.validator_updates
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        self.pair.store()
    }

    fn ensure_running(&self) -> Result<(), ChainError> {
        if self.halted {
            Err(ChainError::Halted)
        } else {
            Ok(())
        }
    }

    /// Latches the halted state on fatal errors.
    fn latch<T>(&mut self, res: Result<T, ChainError>) -> Result<T, ChainError> {
        if let Err(e) = &res {
            error_metrics().inc_error("chain", e.code());
            if e.is_fatal() {
                self.halted = true;
                tracing::error!(
                    target: "app",
                    event = "halted",
                    code = e.code(),
                    error = %e,
                    "Fatal lifecycle error; harness halted"
                );
            } else {
                tracing::warn!(target: "app", code = e.code(), error = %e, "Lifecycle call rejected");
            }
        }
        res
    }

    /// Decodes `bytes`, converting an oversize input or a fault inside the
    /// decoder into a [`TransactionError::Decoding`] failure.
    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn Tx>, TransactionError> {
        if bytes.len() > MAX_TX_BYTES {
            return Err(TransactionError::Decoding(format!(
                "transaction of {} bytes exceeds the {MAX_TX_BYTES}-byte limit",
                bytes.len()
            )));
        }
        let decoder = &self.decoder;
        match panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(bytes))) {
            Ok(res) => res,
            Err(payload) => {
                let msg = fault_message(payload.as_ref());
                tracing::error!(target: "app", event = "decoder_fault", error = %msg);
                Err(TransactionError::Decoding(format!("decoder fault: {msg}")))
            }
        }
    }

    /// The context `CheckTx` runs under: the open block's, or one derived from
    /// the last commit between blocks. Its time is the last block header's,
    /// restored from state after a restart, and zero before the first block.
    fn check_context(&self) -> Option<Context> {
        if let Some(ctx) = &self.block {
            return Some(ctx.clone());
        }
        let chain_id = self.chain_id.clone()?;
        let last = self.pair.last_commit_id();
        Some(Context::new(
            chain_id,
            last.version.saturating_add(1),
            self.last_block_time,
            last.hash.clone(),
        ))
    }
}
