// Path: crates/node/src/setup.rs

//! Wires the standard node: decorator stack, router, genesis and queries.

use crate::store::open_store;
use anyhow::Result;
use std::sync::Arc;
use weft_api::state::CommitStore;
use weft_api::transaction::decorator::{Decorator, Handler};
use weft_api::transaction::SignatureVerifier;
use weft_execution::decorators::{AtomicTaggingDecorator, LoggingDecorator, RecoveryDecorator};
use weft_execution::{Application, ApplicationBuilder, Chain, QueryRouter, Router};
use weft_services::bank::{BalancesQuery, BankGenesis, BankHandler};
use weft_services::validators::{ValidatorsGenesis, ValidatorsHandler, ValidatorsQuery};
use weft_tx::model::{BANK_SEND_ROUTE, VALIDATORS_UPDATE_ROUTE};
use weft_tx::{NonceDecorator, SigVerificationDecorator, SignedTxDecoder, TrustedSigners};
use weft_types::config::{NodeConfig, SavepointConfig};
use weft_types::error::CoreError;

/// The harness type a configured node runs.
pub type NodeApplication = Application<Box<dyn CommitStore>>;

/// The standard decorator order, outermost first:
/// logging, crash containment, savepoint with per-key tagging, signature
/// verification, replay protection.
///
/// Recovery sits inside logging so a contained fault is still logged as a
/// failed invocation, and the savepoint wraps authentication so a rejected
/// transaction leaves neither a nonce bump nor tags behind.
pub fn standard_chain(savepoint: &SavepointConfig, verifier: Arc<dyn SignatureVerifier>) -> Chain {
    let decorators: [Option<Arc<dyn Decorator>>; 5] = [
        Some(Arc::new(LoggingDecorator)),
        Some(Arc::new(RecoveryDecorator)),
        Some(Arc::new(AtomicTaggingDecorator::from_config(savepoint))),
        Some(Arc::new(SigVerificationDecorator::new(verifier))),
        Some(Arc::new(NonceDecorator::new())),
    ];
    Chain::new(decorators)
}

/// The business router: `bank/send` and `validators/update`.
pub fn standard_router() -> Result<Router, CoreError> {
    Router::new()
        .with_route(BANK_SEND_ROUTE, Arc::new(BankHandler))?
        .with_route(VALIDATORS_UPDATE_ROUTE, Arc::new(ValidatorsHandler))
}

/// The query router: `/balances` and `/validators`.
pub fn standard_queries() -> Result<QueryRouter, CoreError> {
    let mut queries = QueryRouter::new();
    queries.register("/balances", Arc::new(BalancesQuery))?;
    queries.register("/validators", Arc::new(ValidatorsQuery))?;
    Ok(queries)
}

/// Builds the standard harness over `store`.
pub fn setup_application<S: CommitStore>(config: &NodeConfig, store: S) -> Result<Application<S>> {
    config.validate()?;
    let chain = standard_chain(&config.savepoint, Arc::new(TrustedSigners));
    tracing::info!(target: "node", decorators = ?chain.names(), "Resolving decorator chain");
    let handler: Arc<dyn Handler> = chain.resolve(Arc::new(standard_router()?));

    let app = ApplicationBuilder::new(config.app_name.clone(), Arc::new(SignedTxDecoder), handler)
        .version(env!("CARGO_PKG_VERSION"))
        .initializer(Arc::new(BankGenesis))?
        .initializer(Arc::new(ValidatorsGenesis))?
        .queries(standard_queries()?)
        .build(store)?;
    Ok(app)
}

/// Opens the configured store and builds the harness over it.
pub fn open_node(config: &NodeConfig) -> Result<NodeApplication> {
    let store = open_store(&config.store)?;
    setup_application(config, store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_chain_has_the_documented_order() {
        let chain = standard_chain(&SavepointConfig::default(), Arc::new(TrustedSigners));
        assert_eq!(
            chain.names(),
            vec!["logging", "recovery", "atomic_tagging", "sig_verification", "nonce"]
        );
    }

    #[test]
    fn standard_routes_and_queries_register() {
        let router = standard_router().unwrap();
        assert_eq!(router.routes().collect::<Vec<_>>(), vec!["bank/send", "validators/update"]);
        standard_queries().unwrap();
    }

    #[test]
    fn info_reports_the_node_name_and_version() {
        use weft_api::lifecycle::ChainApplication;
        let config = NodeConfig::default();
        let app = setup_application(&config, weft_state::memory::MemoryStore::new()).unwrap();
        let info = app.info().unwrap();
        assert_eq!(info.name, config.app_name);
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = NodeConfig {
            app_name: " ".into(),
            ..Default::default()
        };
        assert!(setup_application(&config, weft_state::memory::MemoryStore::new()).is_err());
    }
}
