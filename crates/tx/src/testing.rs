// Path: crates/tx/src/testing.rs

//! Fixtures shared by the decorator tests.

use crate::model::{Msg, SendMsg, SignedTx};
use std::any::Any;
use std::sync::Mutex;
use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::Handler;
use weft_api::transaction::Tx;
use weft_types::app::{Address, CheckResult, ChainId, DeliverResult, Timestamp};
use weft_types::error::TransactionError;

pub fn ctx() -> Context {
    Context::new(
        ChainId::parse("test-chain").unwrap(),
        1,
        Timestamp::from_secs(1),
        Vec::new(),
    )
}

pub fn alice() -> Address {
    Address([0xa1; 20])
}

pub fn transfer(nonce: u64) -> SignedTx {
    SignedTx::new(
        alice(),
        nonce,
        Msg::Send(SendMsg {
            src: alice(),
            dst: Address([0xb0; 20]),
            amount: 5,
            memo: String::new(),
        }),
    )
    .with_signature(vec![1, 2, 3])
}

/// A transaction without a signing surface.
#[derive(Debug)]
pub struct Unsigned;

impl Tx for Unsigned {
    fn route(&self) -> &str {
        "bank/send"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Records the signers each call saw.
#[derive(Default)]
pub struct SignerRecorder {
    pub seen: Mutex<Vec<Vec<Address>>>,
}

impl Handler for SignerRecorder {
    fn check(
        &self,
        ctx: &Context,
        _state: &mut dyn StateAccess,
        _tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        self.seen.lock().unwrap().push(ctx.signers().to_vec());
        Ok(CheckResult::default())
    }

    fn deliver(
        &self,
        ctx: &Context,
        _state: &mut dyn StateAccess,
        _tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        self.seen.lock().unwrap().push(ctx.signers().to_vec());
        Ok(DeliverResult::default())
    }
}
