// Path: crates/api/src/transaction/mod.rs
//! Defines the decoded transaction traits and the decoder seam.

use std::any::Any;
use std::fmt::Debug;
use weft_types::app::{Address, ChainId};
use weft_types::error::TransactionError;

pub mod context;
pub mod decorator;

/// A decoded transaction.
///
/// The harness only needs the routing key; handlers downcast through
/// [`Tx::as_any`] to reach their concrete message type.
pub trait Tx: Any + Debug + Send + Sync {
    /// The routing key used to select the terminal handler, e.g. `bank/send`.
    fn route(&self) -> &str;

    /// Upcasts to `Any` for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Exposes the signing surface, if the transaction carries one.
    fn as_signed(&self) -> Option<&dyn SignedTx> {
        None
    }
}

impl dyn Tx {
    /// Downcasts to a concrete transaction type.
    pub fn downcast_ref<T: Tx>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// The authentication surface of a signed transaction.
pub trait SignedTx {
    /// The addresses the transaction claims to be signed by.
    fn declared_signers(&self) -> Vec<Address>;

    /// The replay-protection nonce.
    fn nonce(&self) -> u64;

    /// The canonical bytes the signatures commit to.
    fn sign_bytes(&self, chain_id: &ChainId) -> Vec<u8>;

    /// The raw signatures, one per declared signer.
    fn signatures(&self) -> &[Vec<u8>];
}

/// Turns wire bytes into a transaction.
pub trait TxDecoder: Send + Sync {
    /// Decodes `bytes`. Malformed input is a [`TransactionError::Decoding`] failure.
    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn Tx>, TransactionError>;
}

/// Authenticates the signers of a transaction.
pub trait SignatureVerifier: Send + Sync {
    /// Returns the addresses whose signatures verified. An empty list is
    /// treated as unauthorized by the caller.
    fn verify(
        &self,
        chain_id: &ChainId,
        tx: &dyn SignedTx,
    ) -> Result<Vec<Address>, TransactionError>;
}
