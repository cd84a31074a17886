// Path: crates/api/src/lib.rs

//! # Weft API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]
//! # Weft API
//!
//! Core traits and interfaces for the Weft harness. This crate defines the
//! stable contract between the harness, its durable stores, its middleware
//! and the business modules plugged into it.

/// Re-exports all core error types from the central `weft-types` crate.
pub mod error;
/// Defines the `GenesisInitializer` trait.
pub mod genesis;
/// Defines the `ChainApplication` lifecycle surface.
pub mod lifecycle;
/// Defines the `QueryHandler` trait and its request/result types.
pub mod query;
/// Core traits for state access, including `StateAccess` and `CommitStore`.
pub mod state;
/// Transactions, the decoder seam, the request `Context`, `Handler` and `Decorator`.
pub mod transaction;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::error::{ChainError, CoreError, ErrorCode, StateError, TransactionError};
    pub use crate::genesis::GenesisInitializer;
    pub use crate::lifecycle::ChainApplication;
    pub use crate::query::{QueryHandler, QueryRequest, QueryResult};
    pub use crate::state::{ChangeSet, CommitStore, CommittedView, StateAccess, StateScanIter};
    pub use crate::transaction::context::Context;
    pub use crate::transaction::decorator::{Decorator, Handler};
    pub use crate::transaction::{SignatureVerifier, SignedTx, Tx, TxDecoder};
}
