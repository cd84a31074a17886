// Path: crates/api/src/genesis/mod.rs
//! Defines the `GenesisInitializer` trait.

use crate::state::StateAccess;
use weft_types::error::TransactionError;
use weft_types::genesis::{GenesisOptions, GenesisParams};

/// Seeds module state during `InitChain`.
///
/// Initializers run in registration order against the deliver working set.
/// The first failure aborts `InitChain` and is annotated with [`GenesisInitializer::name`].
pub trait GenesisInitializer: Send + Sync {
    /// The initializer's name. It is also the key of its section in the genesis options.
    fn name(&self) -> &str;

    /// Writes the initial state for this initializer.
    fn from_genesis(
        &self,
        options: &GenesisOptions,
        params: &GenesisParams,
        state: &mut dyn StateAccess,
    ) -> Result<(), TransactionError>;
}
