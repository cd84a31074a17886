// Path: crates/api/src/transaction/decorator.rs
//! Defines the terminal handler and middleware traits of the transaction pipeline.

use crate::state::StateAccess;
use crate::transaction::context::Context;
use crate::transaction::Tx;
use std::sync::Arc;
use weft_types::app::{CheckResult, DeliverResult};
use weft_types::error::TransactionError;

/// Processes a transaction in one of two phases.
///
/// `check` validates a candidate against the check working set; its writes
/// are discarded at the next commit. `deliver` executes against the deliver
/// working set; its writes become durable at commit.
pub trait Handler: Send + Sync {
    /// Validates a transaction.
    fn check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError>;

    /// Executes a transaction.
    fn deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError>;
}

/// Middleware wrapped around a [`Handler`].
///
/// Each call invokes `next`'s matching method zero times (to short-circuit) or
/// exactly once (to delegate, optionally post-processing the result).
pub trait Decorator: Send + Sync {
    /// A short name for logs.
    fn name(&self) -> &'static str;

    /// Wraps `next.check`.
    fn on_check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TransactionError>;

    /// Wraps `next.deliver`.
    fn on_deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TransactionError>;
}

impl<T: Handler + ?Sized> Handler for Box<T> {
    fn check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        (**self).check(ctx, state, tx)
    }

    fn deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        (**self).deliver(ctx, state, tx)
    }
}

impl<T: Handler + ?Sized> Handler for Arc<T> {
    fn check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        (**self).check(ctx, state, tx)
    }

    fn deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        (**self).deliver(ctx, state, tx)
    }
}
