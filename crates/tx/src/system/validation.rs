// Path: crates/tx/src/system/validation.rs

//! Core, non-optional system logic for transaction signature validation.

use std::sync::Arc;
use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::{Decorator, Handler};
use weft_api::transaction::{SignatureVerifier, SignedTx, Tx};
use weft_types::app::{Address, ChainId, CheckResult, DeliverResult};
use weft_types::error::TransactionError;

/// A verifier that takes each declared signer at its word, provided a
/// non-empty signature was attached for it.
///
/// Suitable for devnets and tests only: the signature bytes are never checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustedSigners;

impl SignatureVerifier for TrustedSigners {
    fn verify(
        &self,
        _chain_id: &ChainId,
        tx: &dyn SignedTx,
    ) -> Result<Vec<Address>, TransactionError> {
        let declared = tx.declared_signers();
        let sigs = tx.signatures();
        if sigs.len() < declared.len() || sigs.iter().any(|s| s.is_empty()) {
            return Ok(Vec::new());
        }
        Ok(declared)
    }
}

/// Authenticates the transaction's signers and exposes them to everything
/// behind it through [`Context::signers`].
#[derive(Clone)]
pub struct SigVerificationDecorator {
    verifier: Arc<dyn SignatureVerifier>,
}

impl std::fmt::Debug for SigVerificationDecorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigVerificationDecorator").finish_non_exhaustive()
    }
}

impl SigVerificationDecorator {
    pub fn new(verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { verifier }
    }

    fn authenticate(&self, ctx: &Context, tx: &dyn Tx) -> Result<Context, TransactionError> {
        let signed = tx.as_signed().ok_or_else(|| {
            TransactionError::Unauthorized(format!("route '{}' carries no signatures", tx.route()))
        })?;
        let signers = self.verifier.verify(ctx.chain_id(), signed)?;
        if signers.is_empty() {
            tracing::debug!(
                target: "ante",
                route = tx.route(),
                declared = signed.declared_signers().len(),
                "no signer verified"
            );
            return Err(TransactionError::Unauthorized(
                "no valid signature for any declared signer".into(),
            ));
        }
        Ok(ctx.with_signers(signers))
    }
}

impl Decorator for SigVerificationDecorator {
    fn name(&self) -> &'static str {
        "sig_verification"
    }

    fn on_check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TransactionError> {
        let ctx = self.authenticate(ctx, tx)?;
        next.check(&ctx, state, tx)
    }

    fn on_deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TransactionError> {
        let ctx = self.authenticate(ctx, tx)?;
        next.deliver(&ctx, state, tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{alice, ctx, transfer, SignerRecorder, Unsigned};
    use weft_state::memory::MemoryStore;
    use weft_state::working_set::{PendingChanges, WorkingSet};

    fn run_check(tx: &dyn Tx, recorder: &SignerRecorder) -> Result<CheckResult, TransactionError> {
        let store = MemoryStore::new();
        let mut pending = PendingChanges::default();
        let mut ws = WorkingSet::new(&store, &mut pending);
        SigVerificationDecorator::new(Arc::new(TrustedSigners)).on_check(&ctx(), &mut ws, tx, recorder)
    }

    #[test]
    fn verified_signers_reach_the_next_handler() {
        let recorder = SignerRecorder::default();
        run_check(&transfer(0), &recorder).unwrap();

        let store = MemoryStore::new();
        let mut pending = PendingChanges::default();
        let mut ws = WorkingSet::new(&store, &mut pending);
        SigVerificationDecorator::new(Arc::new(TrustedSigners))
            .on_deliver(&ctx(), &mut ws, &transfer(0), &recorder)
            .unwrap();

        assert_eq!(*recorder.seen.lock().unwrap(), vec![vec![alice()], vec![alice()]]);
    }

    #[test]
    fn missing_signature_is_unauthorized() {
        let recorder = SignerRecorder::default();
        let mut tx = transfer(0);
        tx.signatures.clear();
        assert!(matches!(run_check(&tx, &recorder), Err(TransactionError::Unauthorized(_))));

        let empty = transfer(0);
        let empty = crate::model::SignedTx {
            signatures: vec![Vec::new()],
            ..empty
        };
        assert!(matches!(run_check(&empty, &recorder), Err(TransactionError::Unauthorized(_))));
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn unsigned_transactions_are_rejected() {
        let recorder = SignerRecorder::default();
        let err = run_check(&Unsigned, &recorder).unwrap_err();
        assert_eq!(err.abci_code(), weft_types::error::CODE_UNAUTHORIZED);
    }
}
