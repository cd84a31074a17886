// Path: crates/services/src/bank/mod.rs
//! The bank module: account balances and transfers between them.
//!
//! Balances are SCALE-encoded `u64` records under `bank::balance::<address>`.
//! An account with no record holds zero, and a balance that drops to zero is
//! deleted rather than stored.

mod genesis;
mod query;

pub use genesis::{BankGenesis, GenesisBalance};
pub use query::BalancesQuery;

use crate::util::{read, signed_msg, write, wrong_message};
use thiserror::Error;
use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::Handler;
use weft_api::transaction::Tx;
use weft_tx::model::{Msg, SendMsg, BANK_SEND_ROUTE};
use weft_types::app::{Address, CheckResult, DeliverResult};
use weft_types::error::TransactionError;
use weft_types::keys::{prefixed, BANK_BALANCE_PREFIX};

/// The module name used for error codes and the genesis section.
pub const MODULE: &str = "bank";
/// The longest memo a transfer may carry, in bytes.
pub const MAX_MEMO_BYTES: usize = 128;
/// The flat gas charge of one transfer.
pub const SEND_GAS: u64 = 100;

/// Business failures of the bank module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("transfer amount must be non-zero")]
    ZeroAmount,
    #[error("memo is {0} bytes; at most 128 are allowed")]
    MemoTooLong(usize),
    #[error("source and destination are the same address")]
    SelfTransfer,
    #[error("insufficient funds: balance {balance}, needed {needed}")]
    InsufficientFunds { balance: u64, needed: u64 },
    #[error("balance of {0} would overflow")]
    BalanceOverflow(Address),
}

impl BankError {
    /// The module-local code; the response code is offset by the module base.
    pub fn local_code(&self) -> u32 {
        match self {
            Self::ZeroAmount => 1,
            Self::MemoTooLong(_) => 2,
            Self::SelfTransfer => 3,
            Self::InsufficientFunds { .. } => 4,
            Self::BalanceOverflow(_) => 5,
        }
    }
}

impl From<BankError> for TransactionError {
    fn from(e: BankError) -> Self {
        TransactionError::module(MODULE, e.local_code(), e.to_string())
    }
}

/// The state key of `address`'s balance.
pub fn balance_key(address: &Address) -> Vec<u8> {
    prefixed(BANK_BALANCE_PREFIX, address.as_ref())
}

/// Reads the balance of `address`. A missing record is zero.
pub fn balance_of<S: StateAccess + ?Sized>(
    state: &S,
    address: &Address,
) -> Result<u64, TransactionError> {
    Ok(read::<u64, _>(state, &balance_key(address))?.unwrap_or(0))
}

pub(crate) fn set_balance<S: StateAccess + ?Sized>(
    state: &mut S,
    address: &Address,
    amount: u64,
) -> Result<(), TransactionError> {
    if amount == 0 {
        state.delete(&balance_key(address))?;
        Ok(())
    } else {
        write(state, &balance_key(address), &amount)
    }
}

fn validate(msg: &SendMsg) -> Result<(), BankError> {
    if msg.amount == 0 {
        return Err(BankError::ZeroAmount);
    }
    if msg.memo.len() > MAX_MEMO_BYTES {
        return Err(BankError::MemoTooLong(msg.memo.len()));
    }
    if msg.src == msg.dst {
        return Err(BankError::SelfTransfer);
    }
    Ok(())
}

fn send_msg(tx: &dyn Tx) -> Result<&SendMsg, TransactionError> {
    match signed_msg(tx)? {
        Msg::Send(m) => Ok(m),
        _ => Err(wrong_message(BANK_SEND_ROUTE)),
    }
}

/// Validates `msg` and moves the funds in `state`.
fn transfer(
    ctx: &Context,
    state: &mut dyn StateAccess,
    msg: &SendMsg,
) -> Result<(), TransactionError> {
    validate(msg)?;
    if !ctx.is_signer(&msg.src) {
        return Err(TransactionError::Unauthorized(format!(
            "source {} did not sign the transfer",
            msg.src
        )));
    }
    let src_balance = balance_of(&*state, &msg.src)?;
    let remaining = src_balance
        .checked_sub(msg.amount)
        .ok_or(BankError::InsufficientFunds {
            balance: src_balance,
            needed: msg.amount,
        })?;
    let dst_balance = balance_of(&*state, &msg.dst)?
        .checked_add(msg.amount)
        .ok_or(BankError::BalanceOverflow(msg.dst))?;
    set_balance(state, &msg.src, remaining)?;
    set_balance(state, &msg.dst, dst_balance)?;
    Ok(())
}

/// The terminal handler of `bank/send`.
///
/// Both phases run the full transfer, so consecutive checks within a block
/// see the funds spent by earlier ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct BankHandler;

impl Handler for BankHandler {
    fn check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        transfer(ctx, state, send_msg(tx)?)?;
        Ok(CheckResult {
            gas_wanted: SEND_GAS,
            ..Default::default()
        })
    }

    fn deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        let msg = send_msg(tx)?;
        transfer(ctx, state, msg)?;
        tracing::debug!(
            target: "bank",
            src = %msg.src,
            dst = %msg.dst,
            amount = msg.amount,
            "transfer delivered"
        );
        Ok(DeliverResult {
            log: format!("sent {} from {} to {}", msg.amount, msg.src, msg.dst),
            gas_used: SEND_GAS,
            ..Default::default()
        })
    }
}
