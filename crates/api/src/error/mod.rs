// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use weft_types::error::{
    ChainError, CoreError, ErrorCode, StateError, TransactionError, MODULE_CODE_BASE,
};
pub use weft_types::Result;
