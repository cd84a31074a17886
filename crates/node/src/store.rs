// Path: crates/node/src/store.rs

//! Durable store selection.

use anyhow::{anyhow, Context as _, Result};
use weft_api::state::CommitStore;
use weft_state::memory::MemoryStore;
use weft_storage::RedbStore;
use weft_types::config::{StoreBackend, StoreConfig};

/// Opens the store named by `[store]`.
///
/// The in-memory store starts empty on every call; the redb store reloads its
/// last committed version.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn CommitStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!(target: "node", "Using the in-memory store; state is lost on exit");
            Ok(Box::new(MemoryStore::new()))
        }
        StoreBackend::Redb => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| anyhow!("store.path is required for the redb backend"))?;
            let store = RedbStore::open(path)
                .with_context(|| format!("opening redb store at {}", path.display()))?;
            tracing::info!(target: "node", path = %path.display(), "Opened redb store");
            Ok(Box::new(store))
        }
    }
}
