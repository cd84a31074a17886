// Path: crates/state/src/lib.rs
//! # Weft State Crate Lints
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
//! # Weft State
//!
//! Everything between the durable store and the handlers: the check/deliver
//! working-set pair, nested savepoint overlays, the per-key change recorder,
//! the content hash chain and an in-memory `CommitStore`.

pub mod commitment;
pub mod memory;
pub mod overlay;
pub mod pair;
pub mod recording;
pub mod working_set;

#[cfg(test)]
mod tests;

/// A prelude for easily importing the most common types.
pub mod prelude {
    pub use crate::commitment::commit_hash;
    pub use crate::memory::MemoryStore;
    pub use crate::overlay::StateOverlay;
    pub use crate::pair::WorkingSetPair;
    pub use crate::recording::{ChangeKind, RecordingState};
    pub use crate::working_set::{PendingChanges, WorkingSet};
}
