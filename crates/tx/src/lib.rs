// Path: crates/tx/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]
//! # Weft Transactions
//!
//! The canonical signed transaction, its SCALE wire decoder, and the two
//! authentication decorators that sit in front of the business router:
//! signature verification and replay protection.

pub mod model;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

pub use model::{Msg, SendMsg, SignedTx, SignedTxDecoder, UpdateValidatorsMsg};
pub use system::nonce::NonceDecorator;
pub use system::validation::{SigVerificationDecorator, TrustedSigners};
