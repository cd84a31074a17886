// Path: crates/tx/src/system/nonce.rs

//! Core, non-optional system logic for transaction nonce management.

use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::{Decorator, Handler};
use weft_api::transaction::Tx;
use weft_types::app::{Address, CheckResult, DeliverResult};
use weft_types::codec::{decode_record, to_bytes_canonical};
use weft_types::error::TransactionError::{self, NonceMismatch};
use weft_types::keys::nonce_key;

/// The next nonce expected from `signer`. A missing record means 0.
pub fn next_nonce<S: StateAccess + ?Sized>(
    state: &S,
    signer: &Address,
) -> Result<u64, TransactionError> {
    match state.get(&nonce_key(signer.as_ref()))? {
        Some(b) => Ok(decode_record::<u64>(&b)?),
        None => Ok(0),
    }
}

/// Strictly asserts that `nonce` is exactly the next expected value for
/// each signer, then bumps every signer's record to `nonce + 1`.
pub fn consume_nonce<S: StateAccess + ?Sized>(
    state: &mut S,
    signers: &[Address],
    nonce: u64,
) -> Result<(), TransactionError> {
    for signer in signers {
        let expected = next_nonce(state, signer)?;
        if nonce != expected {
            return Err(NonceMismatch {
                expected,
                got: nonce,
            });
        }
    }
    let bumped = nonce
        .checked_add(1)
        .ok_or_else(|| TransactionError::InvalidInput("nonce overflow".into()))?;
    for signer in signers {
        state.insert(&nonce_key(signer.as_ref()), &to_bytes_canonical(&bumped))?;
    }
    Ok(())
}

/// Replay protection for the authenticated signers of a transaction.
///
/// Must sit behind [`crate::SigVerificationDecorator`]; it runs in both phases,
/// so a replay inside one block is already rejected by `CheckTx`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonceDecorator;

impl NonceDecorator {
    pub fn new() -> Self {
        Self
    }

    fn consume(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<(), TransactionError> {
        let signed = tx.as_signed().ok_or_else(|| {
            TransactionError::Unauthorized(format!("route '{}' carries no nonce", tx.route()))
        })?;
        if ctx.signers().is_empty() {
            return Err(TransactionError::Unauthorized(
                "no authenticated signer to charge the nonce to".into(),
            ));
        }
        let res = consume_nonce(state, ctx.signers(), signed.nonce());
        if let Err(e) = &res {
            tracing::debug!(target: "ante", route = tx.route(), error = %e, "nonce rejected");
        }
        res
    }
}

impl Decorator for NonceDecorator {
    fn name(&self) -> &'static str {
        "nonce"
    }

    fn on_check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TransactionError> {
        self.consume(ctx, state, tx)?;
        next.check(ctx, state, tx)
    }

    fn on_deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TransactionError> {
        self.consume(ctx, state, tx)?;
        next.deliver(ctx, state, tx)
    }
}
