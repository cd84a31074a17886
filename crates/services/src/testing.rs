// Path: crates/services/src/testing.rs

//! Fixtures shared by the module tests.

use weft_api::transaction::context::Context;
use weft_state::memory::MemoryStore;
use weft_state::working_set::{PendingChanges, WorkingSet};
use weft_tx::model::{Msg, SendMsg, SignedTx, UpdateValidatorsMsg};
use weft_types::app::{Address, ChainId, Timestamp, ValidatorUpdate};

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

pub fn bob() -> Address {
    Address([0xb0; 20])
}

pub fn send(src: Address, dst: Address, amount: u64, memo: &str) -> SignedTx {
    SignedTx::new(
        src,
        0,
        Msg::Send(SendMsg {
            src,
            dst,
            amount,
            memo: memo.to_string(),
        }),
    )
}

pub fn update(signer: Address, updates: Vec<ValidatorUpdate>) -> SignedTx {
    SignedTx::new(
        signer,
        0,
        Msg::UpdateValidators(UpdateValidatorsMsg { updates }),
    )
}

/// A committed store plus one set of pending changes on top of it.
#[derive(Default)]
pub struct Scratch {
    store: MemoryStore,
    pending: PendingChanges,
}

impl Scratch {
    pub fn ws(&mut self) -> WorkingSet<'_, MemoryStore> {
        WorkingSet::new(&self.store, &mut self.pending)
    }
}
