// Path: crates/execution/src/chain.rs

//! Composes decorators around a terminal handler.

use std::sync::Arc;
use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::{Decorator, Handler};
use weft_api::transaction::Tx;
use weft_types::app::{CheckResult, DeliverResult};
use weft_types::error::TransactionError;

/// An ordered list of decorators, outermost first.
///
/// `[d1, d2, .., dn]` resolved onto `h` yields `d1(d2(..dn(h)))`: `d1` sees a
/// transaction first on the way in and last on the way out.
#[derive(Clone, Default)]
pub struct Chain {
    decorators: Vec<Arc<dyn Decorator>>,
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Chain {
    /// Builds a chain. `None` entries are dropped, so optional middleware can be
    /// listed inline.
    pub fn new<I>(decorators: I) -> Self
    where
        I: IntoIterator<Item = Option<Arc<dyn Decorator>>>,
    {
        Self {
            decorators: decorators.into_iter().flatten().collect(),
        }
    }

    /// Number of decorators in the chain.
    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    /// True when the chain has no decorators.
    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Decorator names, outermost first.
    pub fn names(&self) -> Vec<&'static str> {
        self.decorators.iter().map(|d| d.name()).collect()
    }

    /// Wraps `terminal` back to front and returns the single resulting handler.
    pub fn resolve(self, terminal: Arc<dyn Handler>) -> Arc<dyn Handler> {
        tracing::debug!(
            target: "chain",
            event = "resolve",
            decorators = ?self.names(),
            "Resolved decorator chain"
        );
        self.decorators
            .into_iter()
            .rev()
            .fold(terminal, |next, decorator| {
                Arc::new(Decorated { decorator, next }) as Arc<dyn Handler>
            })
    }
}

/// One decorator bound to the handler it delegates to.
struct Decorated {
    decorator: Arc<dyn Decorator>,
    next: Arc<dyn Handler>,
}

impl Handler for Decorated {
    fn check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        self.decorator.on_check(ctx, state, tx, self.next.as_ref())
    }

    fn deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        self.decorator.on_deliver(ctx, state, tx, self.next.as_ref())
    }
}
