// Path: crates/execution/src/decorators/mod.rs

//! The standard decorators.
//!
//! A typical stack, outermost first: [`LoggingDecorator`], [`RecoveryDecorator`],
//! then [`AtomicTaggingDecorator`] (or [`SavepointDecorator`] and
//! [`KeyTaggingDecorator`] in that order), then authentication.

pub mod logging;
pub mod recovery;
pub mod savepoint;
pub mod tagging;

#[cfg(test)]
pub(crate) mod testing;

pub use logging::LoggingDecorator;
pub use recovery::RecoveryDecorator;
pub use savepoint::SavepointDecorator;
pub use tagging::{AtomicTaggingDecorator, KeyTaggingDecorator};
