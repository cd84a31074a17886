// Path: crates/tx/src/model.rs

//! The canonical signed transaction and its wire decoder.
//!
//! A transaction is a single SCALE-encoded [`SignedTx`]: the signer, its
//! replay nonce, one business message and the signatures over
//! [`SignedTx::sign_bytes`]. The message variant selects the route.

use parity_scale_codec::{Decode, Encode};
use std::any::Any;
use weft_api::transaction::{self as api, Tx, TxDecoder};
use weft_types::app::{Address, ChainId, ValidatorUpdate};
use weft_types::codec::{from_bytes_canonical, to_bytes_canonical};
use weft_types::error::TransactionError;

/// The route served by the bank module's transfer handler.
pub const BANK_SEND_ROUTE: &str = "bank/send";
/// The route served by the validators module's update handler.
pub const VALIDATORS_UPDATE_ROUTE: &str = "validators/update";

/// Domain separator mixed into every signing payload.
const SIGN_DOMAIN: &[u8] = b"weft/tx/v1";

/// Moves `amount` from `src` to `dst`.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug)]
pub struct SendMsg {
    pub src: Address,
    pub dst: Address,
    pub amount: u64,
    pub memo: String,
}

/// Replaces the power of each listed validator. Power 0 removes it.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, Default)]
pub struct UpdateValidatorsMsg {
    pub updates: Vec<ValidatorUpdate>,
}

/// The business message carried by a transaction.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug)]
pub enum Msg {
    /// A bank transfer.
    #[codec(index = 0)]
    Send(SendMsg),
    /// A validator power update.
    #[codec(index = 1)]
    UpdateValidators(UpdateValidatorsMsg),
}

impl Msg {
    /// The routing key of the handler that executes this message.
    pub fn route(&self) -> &'static str {
        match self {
            Msg::Send(_) => BANK_SEND_ROUTE,
            Msg::UpdateValidators(_) => VALIDATORS_UPDATE_ROUTE,
        }
    }
}

/// A transaction signed by a single account.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug)]
pub struct SignedTx {
    pub signer: Address,
    pub nonce: u64,
    pub msg: Msg,
    pub signatures: Vec<Vec<u8>>,
}

#[derive(Encode)]
struct SignPayload<'a> {
    domain: &'a [u8],
    chain_id: &'a str,
    signer: &'a Address,
    nonce: u64,
    msg: &'a Msg,
}

impl SignedTx {
    /// Builds an unsigned transaction.
    pub fn new(signer: Address, nonce: u64, msg: Msg) -> Self {
        Self {
            signer,
            nonce,
            msg,
            signatures: Vec::new(),
        }
    }

    /// Attaches a signature.
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signatures.push(signature);
        self
    }

    /// The canonical wire encoding.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        to_bytes_canonical(self)
    }
}

impl Tx for SignedTx {
    fn route(&self) -> &str {
        self.msg.route()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_signed(&self) -> Option<&dyn api::SignedTx> {
        Some(self)
    }
}

impl api::SignedTx for SignedTx {
    fn declared_signers(&self) -> Vec<Address> {
        vec![self.signer]
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    /// SCALE encoding of the domain tag, chain id, signer, nonce and message.
    /// Binding the chain id keeps a transaction from being replayed on another chain.
    fn sign_bytes(&self, chain_id: &ChainId) -> Vec<u8> {
        to_bytes_canonical(&SignPayload {
            domain: SIGN_DOMAIN,
            chain_id: chain_id.as_str(),
            signer: &self.signer,
            nonce: self.nonce,
            msg: &self.msg,
        })
    }

    fn signatures(&self) -> &[Vec<u8>] {
        &self.signatures
    }
}

/// Decodes wire bytes into a [`SignedTx`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SignedTxDecoder;

impl TxDecoder for SignedTxDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn Tx>, TransactionError> {
        let tx: SignedTx = from_bytes_canonical(bytes).map_err(TransactionError::Decoding)?;
        Ok(Box::new(tx))
    }
}
