// Path: crates/execution/src/lib.rs
//! # Weft Execution Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote robust
//! error handling.
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
//! # Weft Execution
//!
//! The transaction-processing harness: the message [`Router`], the decorator
//! [`Chain`], the standard decorators, the [`QueryRouter`] and the
//! [`Application`] that drives the block lifecycle over a check/deliver
//! working-set pair.

pub mod app;
pub mod chain;
pub mod decorators;
pub mod query;
pub mod router;
mod util;

pub use app::{Application, ApplicationBuilder, ValidatorUpdates};
pub use chain::Chain;
pub use query::QueryRouter;
pub use router::Router;
