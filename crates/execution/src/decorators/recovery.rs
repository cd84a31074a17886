// Path: crates/execution/src/decorators/recovery.rs

//! Crash containment.

use crate::util::fault_to_error;
use std::panic::{self, AssertUnwindSafe};
use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::{Decorator, Handler};
use weft_api::transaction::Tx;
use weft_telemetry::execution_metrics;
use weft_types::app::{CheckResult, DeliverResult};
use weft_types::error::{ErrorCode, TransactionError};

/// Converts a runtime fault (an unwinding panic) raised anywhere below it into
/// a structured failure, so one malformed transaction cannot take the node down.
///
/// A fault whose payload is already a [`TransactionError`] is returned as-is;
/// anything else becomes [`TransactionError::Internal`] carrying the panic message.
///
/// Place it at or near the outside of any chain that handles untrusted input.
/// Writes made below it are only rolled back if a savepoint sits between it
/// and the faulting code.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryDecorator;

fn contain<R>(
    phase: &'static str,
    tx: &dyn Tx,
    f: impl FnOnce() -> Result<R, TransactionError>,
) -> Result<R, TransactionError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(res) => res,
        Err(payload) => {
            let err = fault_to_error(payload);
            execution_metrics().inc_panics_recovered(phase);
            tracing::error!(
                target: "recovery",
                event = "fault_contained",
                phase,
                route = tx.route(),
                code = err.code(),
                error = %err,
                "Contained runtime fault"
            );
            Err(err)
        }
    }
}

impl Decorator for RecoveryDecorator {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn on_check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TransactionError> {
        contain("check", tx, || next.check(ctx, state, tx))
    }

    fn on_deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TransactionError> {
        contain("deliver", tx, || next.deliver(ctx, state, tx))
    }
}
