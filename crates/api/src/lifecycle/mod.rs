// Path: crates/api/src/lifecycle/mod.rs
//! Defines the lifecycle surface the consensus-engine adapter drives.

use weft_types::app::{
    RequestBeginBlock, RequestEndBlock, RequestInitChain, RequestQuery, ResponseBeginBlock,
    ResponseCheckTx, ResponseCommit, ResponseDeliverTx, ResponseEndBlock, ResponseInfo,
    ResponseInitChain, ResponseQuery,
};
use weft_types::error::ChainError;

/// The full request/response contract with the consensus engine.
///
/// Calls arrive one at a time, in the order
/// `BeginBlock → {CheckTx | DeliverTx}* → EndBlock → Commit`, with `CheckTx`,
/// `Info` and `Query` also allowed between blocks. Structured transaction
/// failures travel inside the responses; an `Err` is returned only for
/// conditions that have no response channel.
pub trait ChainApplication {
    /// Reports the harness name, version and last commit.
    fn info(&self) -> Result<ResponseInfo, ChainError>;

    /// Runs a read-only query against the last committed state.
    fn query(&self, req: RequestQuery) -> Result<ResponseQuery, ChainError>;

    /// Persists the chain id and runs the genesis initializers.
    fn init_chain(&mut self, req: RequestInitChain) -> Result<ResponseInitChain, ChainError>;

    /// Opens a block.
    fn begin_block(&mut self, req: RequestBeginBlock) -> Result<ResponseBeginBlock, ChainError>;

    /// Validates a candidate transaction against the check working set.
    fn check_tx(&mut self, tx: &[u8]) -> Result<ResponseCheckTx, ChainError>;

    /// Executes a transaction against the deliver working set.
    fn deliver_tx(&mut self, tx: &[u8]) -> Result<ResponseDeliverTx, ChainError>;

    /// Closes a block, returning the de-duplicated validator changes. A later
    /// `DeliverTx` fails softly until the next `BeginBlock`.
    fn end_block(&mut self, req: RequestEndBlock) -> Result<ResponseEndBlock, ChainError>;

    /// Makes the block's deliveries durable and returns the new content hash.
    fn commit(&mut self) -> Result<ResponseCommit, ChainError>;
}
