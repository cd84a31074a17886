// Path: crates/storage/src/lib.rs
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

//! Pure-Rust persistent storage for the Weft harness.
//!
//! `RedbStore` implements `CommitStore` on a single redb database with two
//! tables: `STATE` (key → value) and `HEAD` (version ‖ content hash). A commit
//! writes both in one redb write transaction.

mod metrics;
pub mod redb_store;

pub use redb_store::RedbStore;
