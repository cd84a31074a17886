// Path: crates/execution/src/decorators/tagging.rs

//! Per-key change tagging.

use super::savepoint::with_savepoint;
use std::collections::BTreeMap;
use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::{Decorator, Handler};
use weft_api::transaction::Tx;
use weft_state::recording::{ChangeKind, RecordingState};
use weft_types::app::{CheckResult, DeliverResult, Tag};
use weft_types::config::SavepointConfig;
use weft_types::error::TransactionError;

/// One tag per touched key: upper-case hex of the key, valued `s` or `d`
/// after the last operation on it.
fn change_tags(changes: BTreeMap<Vec<u8>, ChangeKind>) -> impl Iterator<Item = Tag> {
    changes
        .into_iter()
        .map(|(key, kind)| Tag::new(hex::encode_upper(key), kind.marker()))
}

fn tagged_deliver(
    ctx: &Context,
    state: &mut dyn StateAccess,
    tx: &dyn Tx,
    next: &dyn Handler,
) -> Result<DeliverResult, TransactionError> {
    let mut recorder = RecordingState::new(state);
    let mut res = next.deliver(ctx, &mut recorder, tx)?;
    res.tags.extend(change_tags(recorder.into_changes()));
    Ok(res)
}

/// Appends one index tag per distinct key written or deleted during a
/// successful delivery. Failed deliveries get no tags. Check is untouched.
///
/// On its own this does not roll anything back; place a
/// [`super::SavepointDecorator`] outside it, or use [`AtomicTaggingDecorator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTaggingDecorator;

impl Decorator for KeyTaggingDecorator {
    fn name(&self) -> &'static str {
        "key_tagging"
    }

    fn on_check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TransactionError> {
        next.check(ctx, state, tx)
    }

    fn on_deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TransactionError> {
        tagged_deliver(ctx, state, tx, next)
    }
}

/// A savepoint with change tagging inside it, so a rolled-back delivery
/// reports no tags and a successful one reports exactly what it flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomicTaggingDecorator {
    check: bool,
    deliver: bool,
}

impl AtomicTaggingDecorator {
    /// `check` and `deliver` enable the savepoint per phase. Tagging always
    /// applies to deliver.
    pub fn new(check: bool, deliver: bool) -> Self {
        Self { check, deliver }
    }

    pub fn from_config(config: &SavepointConfig) -> Self {
        Self::new(config.check, config.deliver)
    }
}

impl Default for AtomicTaggingDecorator {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Decorator for AtomicTaggingDecorator {
    fn name(&self) -> &'static str {
        "atomic_tagging"
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
            return tagged_deliver(ctx, state, tx, next);
        }
        with_savepoint(state, |s| tagged_deliver(ctx, s, tx, next))
    }
}
