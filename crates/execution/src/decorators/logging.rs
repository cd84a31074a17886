// Path: crates/execution/src/decorators/logging.rs

//! Per-transaction structured logging and latency metrics.

use std::time::Instant;
use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::{Decorator, Handler};
use weft_api::transaction::Tx;
use weft_telemetry::{error_metrics, execution_metrics};
use weft_types::app::{CheckResult, DeliverResult};
use weft_types::error::{ErrorCode, TransactionError};

/// Opens a `tx` span under the block span, times the rest of the chain and
/// emits one event with the outcome. Never alters the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDecorator;

fn observe<R>(
    phase: &'static str,
    route: &str,
    started: Instant,
    res: &Result<R, TransactionError>,
    gas: impl Fn(&R) -> u64,
) {
    let elapsed = started.elapsed();
    execution_metrics().observe_tx_duration(phase, elapsed.as_secs_f64());
    let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    match res {
        Ok(out) => {
            execution_metrics().inc_tx(phase, "ok");
            tracing::info!(
                target: "tx",
                event = "processed",
                phase,
                route,
                code = 0u32,
                gas = gas(out),
                elapsed_us
            );
        }
        Err(e) => {
            execution_metrics().inc_tx(phase, "error");
            error_metrics().inc_error("transaction", e.code());
            tracing::info!(
                target: "tx",
                event = "rejected",
                phase,
                route,
                code = e.abci_code(),
                error_code = e.code(),
                error = %e,
                elapsed_us
            );
        }
    }
}

impl Decorator for LoggingDecorator {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn on_check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TransactionError> {
        let span = tracing::info_span!(parent: ctx.span(), "tx", phase = "check", route = tx.route());
        let _guard = span.enter();
        let ctx = ctx.with_span(span.clone());
        let started = Instant::now();
        let res = next.check(&ctx, state, tx);
        observe("check", tx.route(), started, &res, |r| r.gas_wanted);
        res
    }

    fn on_deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TransactionError> {
        let span =
            tracing::info_span!(parent: ctx.span(), "tx", phase = "deliver", route = tx.route());
        let _guard = span.enter();
        let ctx = ctx.with_span(span.clone());
        let started = Instant::now();
        let res = next.deliver(&ctx, state, tx);
        observe("deliver", tx.route(), started, &res, |r| r.gas_used);
        res
    }
}
