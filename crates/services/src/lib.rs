// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
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
//! Business modules plugged into the Weft router.
//!
//! Each module contributes a terminal [`weft_api::transaction::decorator::Handler`]
//! for its route, a [`weft_api::genesis::GenesisInitializer`] named after its
//! genesis section, and optionally a query handler.

pub mod bank;
pub mod validators;

mod util;

#[cfg(test)]
pub(crate) mod testing;
