// Path: crates/execution/src/app/state_machine.rs

use super::Application;
use weft_api::lifecycle::ChainApplication;
use weft_api::state::{CommitStore, StateAccess};
use weft_state::overlay::StateOverlay;
use weft_telemetry::execution_metrics;
use weft_telemetry::time::CommitTimer;
use weft_types::app::{
    ChainId, RequestBeginBlock, RequestEndBlock, RequestInitChain, RequestQuery,
    ResponseBeginBlock, ResponseCheckTx, ResponseCommit, ResponseDeliverTx, ResponseEndBlock,
    ResponseInfo, ResponseInitChain, ResponseQuery,
};
use weft_types::codec::to_bytes_canonical;
use weft_types::error::{ChainError, ErrorCode, TransactionError};
use weft_types::genesis::{GenesisOptions, GenesisParams};
use weft_types::keys::{CHAIN_ID_KEY, LAST_BLOCK_TIME_KEY};

fn not_initialized() -> TransactionError {
    TransactionError::NotFound("chain id is not set; InitChain has not run".into())
}

impl<S: CommitStore> Application<S> {
    fn run_init_chain(&mut self, req: RequestInitChain) -> Result<ResponseInitChain, ChainError> {
        if let Some(existing) = &self.chain_id {
            return Err(TransactionError::Duplicate(format!(
                "chain id is already set to '{existing}'"
            ))
            .into());
        }
        let chain_id = ChainId::parse(&req.chain_id)?;
        let options = GenesisOptions::from_json_bytes(&req.app_state)?;
        let params = GenesisParams {
            validators: req.validators.clone(),
            time: req.time,
        };

        // Genesis runs in a savepoint on deliver: a failing initializer leaves
        // nothing behind and InitChain may be retried.
        let mut deliver = self.pair.deliver();
        let mut overlay = StateOverlay::new(&mut deliver);
        overlay
            .insert(CHAIN_ID_KEY, chain_id.as_str().as_bytes())
            .map_err(TransactionError::from)?;
        for init in &self.initializers {
            tracing::debug!(target: "genesis", initializer = init.name(), "Running genesis initializer");
            init.from_genesis(&options, &params, &mut overlay)
                .map_err(|e| TransactionError::Genesis {
                    initializer: init.name().to_string(),
                    source: Box::new(e),
                })?;
        }
        let written = overlay.changes().len();
        overlay.flush().map_err(TransactionError::from)?;

        tracing::info!(
            target: "genesis",
            event = "init_chain",
            chain_id = %chain_id,
            initializers = self.initializers.len(),
            keys_written = written,
            validators = req.validators.len(),
            "Chain initialized"
        );
        self.chain_id = Some(chain_id);
        Ok(ResponseInitChain {
            validators: req.validators,
        })
    }

    fn run_begin_block(&mut self, req: RequestBeginBlock) -> Result<ResponseBeginBlock, ChainError> {
        let header = req.header;
        if header.time.is_zero() {
            return Err(ChainError::MalformedHeader(format!(
                "block {} has the zero timestamp",
                header.height
            )));
        }
        let chain_id = match &self.chain_id {
            Some(c) if c.as_str() == header.chain_id => c.clone(),
            Some(c) => {
                return Err(ChainError::ChainIdMismatch {
                    expected: c.to_string(),
                    got: header.chain_id,
                })
            }
            None => {
                return Err(ChainError::MalformedHeader(format!(
                    "block {} for chain '{}' arrived before InitChain",
                    header.height, header.chain_id
                )))
            }
        };
        let expected = self.pair.last_commit_id().version.saturating_add(1);
        if header.height != expected {
            tracing::warn!(
                target: "app",
                event = "height_gap",
                expected,
                got = header.height,
                "Block height does not follow the last commit"
            );
        }
        tracing::debug!(target: "app", event = "begin_block", height = header.height);
        self.pair
            .deliver()
            .insert(LAST_BLOCK_TIME_KEY, &to_bytes_canonical(&header.time))?;
        self.last_block_time = header.time;
        self.block = Some(weft_api::transaction::context::Context::new(
            chain_id,
            header.height,
            header.time,
            header.last_commit_hash,
        ));
        Ok(ResponseBeginBlock {})
    }

    fn run_commit(&mut self) -> Result<ResponseCommit, ChainError> {
        let _timer = CommitTimer::new(execution_metrics());
        let pending = self.pair.pending_deliver().len();
        let id = self.pair.commit()?;
        execution_metrics().set_block_height(id.version);
        tracing::info!(
            target: "app",
            event = "commit",
            version = id.version,
            hash = %hex::encode(&id.hash),
            changes = pending,
            "Block committed"
        );
        self.block = None;
        Ok(ResponseCommit {
            data: id.hash,
            version: id.version,
        })
    }
}

impl<S: CommitStore> ChainApplication for Application<S> {
    fn info(&self) -> Result<ResponseInfo, ChainError> {
        self.ensure_running()?;
        Ok(ResponseInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            last_commit: self.pair.last_commit_id().clone(),
        })
    }

    fn query(&self, req: RequestQuery) -> Result<ResponseQuery, ChainError> {
        self.ensure_running()?;
        let height = self.pair.last_commit_id().version;
        let view = self.pair.committed();
        let res = self.queries.query(&req.path, &req.data, height, &view);
        Ok(match res {
            Ok(out) => ResponseQuery {
                code: 0,
                log: String::new(),
                height,
                key: to_bytes_canonical(&out.keys),
                value: to_bytes_canonical(&out.values),
            },
            Err(e) => {
                tracing::debug!(target: "query", path = %req.path, error = %e, "Query failed");
                ResponseQuery::from_error(&e, height)
            }
        })
    }

    fn init_chain(&mut self, req: RequestInitChain) -> Result<ResponseInitChain, ChainError> {
        self.ensure_running()?;
        let res = self.run_init_chain(req);
        self.latch(res)
    }

    fn begin_block(&mut self, req: RequestBeginBlock) -> Result<ResponseBeginBlock, ChainError> {
        self.ensure_running()?;
        let res = self.run_begin_block(req);
        self.latch(res)
    }

    fn check_tx(&mut self, bytes: &[u8]) -> Result<ResponseCheckTx, ChainError> {
        self.ensure_running()?;
        let Some(ctx) = self.check_context() else {
            return Ok(ResponseCheckTx::from_error(&not_initialized()));
        };
        let tx = match self.decode(bytes) {
            Ok(tx) => tx,
            Err(e) => return Ok(ResponseCheckTx::from_error(&e)),
        };
        let mut state = self.pair.check();
        let res = self.handler.check(&ctx, &mut state, tx.as_ref());
        Ok(match res {
            Ok(out) => ResponseCheckTx {
                code: 0,
                codespace: String::new(),
                log: out.log,
                data: out.data,
                gas_wanted: out.gas_wanted,
            },
            Err(e) => ResponseCheckTx::from_error(&e),
        })
    }

    fn deliver_tx(&mut self, bytes: &[u8]) -> Result<ResponseDeliverTx, ChainError> {
        self.ensure_running()?;
        let Some(block) = &self.block else {
            let err = TransactionError::NotFound("no open block; DeliverTx needs BeginBlock".into());
            return Ok(ResponseDeliverTx::from_error(&err));
        };
        let ctx = block.with_pending_validator_updates(self.validator_updates.snapshot());
        let tx = match self.decode(bytes) {
            Ok(tx) => tx,
            Err(e) => return Ok(ResponseDeliverTx::from_error(&e)),
        };
        let mut state = self.pair.deliver();
        let res = self.handler.deliver(&ctx, &mut state, tx.as_ref());
        drop(state);
        Ok(match res {
            Ok(out) => {
                if !out.diff.is_empty() {
                    tracing::debug!(
                        target: "app",
                        event = "validator_updates",
                        route = tx.route(),
                        count = out.diff.len()
                    );
                    self.validator_updates.merge(out.diff);
                }
                ResponseDeliverTx {
                    code: 0,
                    codespace: String::new(),
                    log: out.log,
                    data: out.data,
                    gas_used: out.gas_used,
                    tags: out.tags,
                }
            }
            Err(e) => {
                tracing::debug!(target: "app", route = tx.route(), code = e.code(), "DeliverTx failed");
                ResponseDeliverTx::from_error(&e)
            }
        })
    }

    fn end_block(&mut self, req: RequestEndBlock) -> Result<ResponseEndBlock, ChainError> {
        self.ensure_running()?;
        if self.block.take().is_none() {
            tracing::warn!(
                target: "app",
                event = "end_block",
                height = req.height,
                "EndBlock without an open block"
            );
        }
        let validator_updates = self.validator_updates.take();
        tracing::debug!(
            target: "app",
            event = "end_block",
            height = req.height,
            validator_updates = validator_updates.len()
        );
        Ok(ResponseEndBlock { validator_updates })
    }

    fn commit(&mut self) -> Result<ResponseCommit, ChainError> {
        self.ensure_running()?;
        let res = self.run_commit();
        self.latch(res)
    }
}
