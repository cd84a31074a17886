// Path: crates/execution/src/router.rs

//! Maps routing keys to terminal handlers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::Handler;
use weft_api::transaction::Tx;
use weft_types::app::{CheckResult, DeliverResult};
use weft_types::error::{CoreError, TransactionError};

/// Validates the `token(/token)*` syntax of a routing key, where every token
/// is a non-empty run of `[A-Za-z0-9_]`.
pub fn validate_route(route: &str) -> Result<(), CoreError> {
    let valid = !route.is_empty()
        && route.split('/').all(|token| {
            !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidRoute(route.to_string()))
    }
}

/// The terminal handler of the decorator chain.
///
/// Keys are validated once, at registration. Dispatching a transaction whose
/// route is not registered yields [`TransactionError::NoSuchPath`].
#[derive(Default)]
pub struct Router {
    routes: BTreeMap<String, Arc<dyn Handler>>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.keys())
            .finish()
    }
}

impl Router {
    /// An empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `route`.
    pub fn register(&mut self, route: &str, handler: Arc<dyn Handler>) -> Result<(), CoreError> {
        validate_route(route)?;
        if self.routes.contains_key(route) {
            return Err(CoreError::DuplicateRoute(route.to_string()));
        }
        tracing::debug!(target: "router", event = "register", route, "Registered route");
        self.routes.insert(route.to_string(), handler);
        Ok(())
    }

    /// Chainable form of [`Router::register`].
    pub fn with_route(mut self, route: &str, handler: Arc<dyn Handler>) -> Result<Self, CoreError> {
        self.register(route, handler)?;
        Ok(self)
    }

    /// Returns the handler registered under `route`, if any.
    pub fn resolve(&self, route: &str) -> Option<&dyn Handler> {
        self.routes.get(route).map(|h| h.as_ref())
    }

    /// Registered routes, in ascending order.
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    fn dispatch(&self, tx: &dyn Tx) -> Result<&dyn Handler, TransactionError> {
        self.resolve(tx.route())
            .ok_or_else(|| TransactionError::NoSuchPath(tx.route().to_string()))
    }
}

impl Handler for Router {
    fn check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        self.dispatch(tx)?.check(ctx, state, tx)
    }

    fn deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        self.dispatch(tx)?.deliver(ctx, state, tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorators::testing::{ctx, scratch, NoopHandler, TestTx};

    #[test]
    fn rejects_malformed_routes() {
        for bad in ["", "/", "bank/", "/bank", "bank//send", "bank-send", "bank send", "bänk"] {
            assert!(
                matches!(validate_route(bad), Err(CoreError::InvalidRoute(_))),
                "{bad:?} should be rejected"
            );
        }
        for good in ["bank", "bank/send", "a_b/C1/x"] {
            assert!(validate_route(good).is_ok(), "{good:?} should be accepted");
        }
    }

    #[test]
    fn rejects_duplicate_routes() {
        let mut router = Router::new();
        router.register("bank/send", Arc::new(NoopHandler)).unwrap();
        assert_eq!(
            router.register("bank/send", Arc::new(NoopHandler)),
            Err(CoreError::DuplicateRoute("bank/send".into()))
        );
        assert_eq!(router.routes().collect::<Vec<_>>(), vec!["bank/send"]);
    }

    #[test]
    fn unknown_route_is_no_such_path() {
        let router = Router::new()
            .with_route("bank/send", Arc::new(NoopHandler))
            .unwrap();
        assert!(router.resolve("bank/burn").is_none());

        let (store, mut pending) = scratch();
        let mut ws = weft_state::working_set::WorkingSet::new(&store, &mut pending);
        let tx = TestTx::new("bank/burn");
        let err = router.deliver(&ctx(), &mut ws, &tx).unwrap_err();
        assert_eq!(err, TransactionError::NoSuchPath("bank/burn".into()));
        assert!(router
            .check(&ctx(), &mut ws, &TestTx::new("bank/send"))
            .is_ok());
    }
}
