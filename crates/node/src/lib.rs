// Path: crates/node/src/lib.rs
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
//! # Weft Node
//!
//! Assembles a runnable harness from a [`NodeConfig`]: telemetry, the durable
//! store, the standard decorator stack in front of the business router, the
//! genesis initializers and the query handlers.

pub mod replay;
pub mod setup;
pub mod store;
pub mod telemetry;

pub use setup::{open_node, setup_application, standard_chain, NodeApplication};
pub use store::open_store;
pub use telemetry::init_telemetry;
pub use weft_types::config::NodeConfig;
