// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
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

//! # Weft Types
//!
//! The foundational crate of the Weft workspace: lifecycle request/response
//! types, error enums and their response codes, the canonical codec, reserved
//! state keys and the configuration schema.
//!
//! ## Architectural Role
//!
//! Every other crate depends on `weft-types`, and it depends on nothing else in
//! the workspace. Keeping the shared vocabulary here prevents circular
//! dependencies between the harness, the stores and the business modules.

/// The maximum size in bytes of a single serialized transaction accepted by the harness.
pub const MAX_TX_BYTES: usize = 64 * 1024;

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::CoreError> = std::result::Result<T, E>;

/// Application-level data structures: commit ids, headers, results and lifecycle messages.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical data.
pub mod codec;
/// Node configuration loaded from TOML.
pub mod config;
/// All error types and the numeric response-code band.
pub mod error;
/// Genesis options and parameters handed to genesis initializers.
pub mod genesis;
/// Constants for reserved state keys.
pub mod keys;
