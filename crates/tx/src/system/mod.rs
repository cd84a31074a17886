// Path: crates/tx/src/system/mod.rs

//! Core, non-optional authentication logic run ahead of every business handler.

pub mod nonce;
pub mod validation;
