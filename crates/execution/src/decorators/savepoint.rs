// Path: crates/execution/src/decorators/savepoint.rs

//! Atomic rollback of a single invocation.

use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::{Decorator, Handler};
use weft_api::transaction::Tx;
use weft_state::overlay::StateOverlay;
use weft_types::app::{CheckResult, DeliverResult};
use weft_types::config::SavepointConfig;
use weft_types::error::TransactionError;

/// Runs `f` against a nested overlay of `state`. The overlay is flushed one
/// level up on success and discarded on failure. A working set without overlay
/// support is handed to `f` directly.
pub(crate) fn with_savepoint<R>(
    state: &mut dyn StateAccess,
    f: impl FnOnce(&mut dyn StateAccess) -> Result<R, TransactionError>,
) -> Result<R, TransactionError> {
    if !state.supports_overlay() {
        return f(state);
    }
    let mut overlay = StateOverlay::new(state);
    match f(&mut overlay) {
        Ok(out) => {
            overlay.flush()?;
            Ok(out)
        }
        Err(e) => {
            tracing::trace!(
                target: "savepoint",
                event = "rollback",
                discarded = overlay.changes().len(),
                error = %e
            );
            overlay.discard();
            Err(e)
        }
    }
}

/// Makes each invocation all-or-nothing: a failing transaction leaves no
/// writes behind, even ones it made before failing.
///
/// The check and deliver phases are configured independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavepointDecorator {
    check: bool,
    deliver: bool,
}

impl SavepointDecorator {
    pub fn new(check: bool, deliver: bool) -> Self {
        Self { check, deliver }
    }

    /// Savepoints in both phases.
    pub fn both() -> Self {
        Self::new(true, true)
    }

    pub fn from_config(config: &SavepointConfig) -> Self {
        Self::new(config.check, config.deliver)
    }
}

impl Default for SavepointDecorator {
    fn default() -> Self {
        Self::both()
    }
}

impl Decorator for SavepointDecorator {
    fn name(&self) -> &'static str {
        "savepoint"
    }

    fn on_check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TransactionError> {
        if !self.check {
            return next.check(ctx, state, tx);
        }
        with_savepoint(state, |s| next.check(ctx, s, tx))
    }

    fn on_deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TransactionError> {
        if !self.deliver {
            return next.deliver(ctx, state, tx);
        }
        with_savepoint(state, |s| next.deliver(ctx, s, tx))
    }
}
